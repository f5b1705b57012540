//! Job domain types
//!
//! Jobs are declared in the orchestrator's plan schema: an ordered list of
//! steps that fetch resources, run tasks and publish resources.

use serde::Serialize;
use serde_json::{Map, Value};

/// Step parameters, passed through to the resource or task untouched
pub type Params = Map<String, Value>;

/// A job in the assembled pipeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Job {
    pub name: String,
    pub public: bool,
    pub plan: Vec<Step>,
}

impl Job {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            public: false,
            plan: Vec::new(),
        }
    }

    pub fn public(mut self) -> Self {
        self.public = true;
        self
    }

    pub fn step(mut self, step: Step) -> Self {
        self.plan.push(step);
        self
    }

    /// Names of every resource this job fetches or publishes, in plan order
    pub fn resource_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        for step in &self.plan {
            step.collect_resources(&mut names);
        }
        names
    }
}

/// A single plan step
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Step {
    Get(GetStep),
    Put(PutStep),
    Task(TaskStep),
    InParallel { in_parallel: Vec<Step> },
}

impl Step {
    pub fn in_parallel(steps: Vec<Step>) -> Self {
        Step::InParallel { in_parallel: steps }
    }

    fn collect_resources<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Step::Get(get) => names.push(get.resource.as_deref().unwrap_or(&get.get)),
            Step::Put(put) => names.push(put.resource.as_deref().unwrap_or(&put.put)),
            Step::Task(_) => {}
            Step::InParallel { in_parallel } => {
                for step in in_parallel {
                    step.collect_resources(names);
                }
            }
        }
    }
}

/// Fetch a resource into the build
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GetStep {
    pub get: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub passed: Vec<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub trigger: bool,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub params: Params,
}

impl GetStep {
    pub fn new(get: impl Into<String>) -> Self {
        Self {
            get: get.into(),
            ..Default::default()
        }
    }

    /// Fetch `resource` under the local name `get`
    pub fn from_resource(get: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            get: get.into(),
            resource: Some(resource.into()),
            ..Default::default()
        }
    }

    pub fn passed(mut self, job: impl Into<String>) -> Self {
        self.passed.push(job.into());
        self
    }

    pub fn trigger(mut self) -> Self {
        self.trigger = true;
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

impl From<GetStep> for Step {
    fn from(step: GetStep) -> Self {
        Step::Get(step)
    }
}

/// Publish a new version of a resource
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PutStep {
    pub put: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub params: Params,
}

impl PutStep {
    pub fn new(put: impl Into<String>) -> Self {
        Self {
            put: put.into(),
            ..Default::default()
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

impl From<PutStep> for Step {
    fn from(step: PutStep) -> Self {
        Step::Put(step)
    }
}

/// Run a task from a task file in one of the fetched inputs
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskStep {
    pub task: String,
    pub file: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub privileged: bool,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub params: Params,
}

impl TaskStep {
    pub fn new(task: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            file: file.into(),
            ..Default::default()
        }
    }

    pub fn privileged(mut self) -> Self {
        self.privileged = true;
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

impl From<TaskStep> for Step {
    fn from(step: TaskStep) -> Self {
        Step::Task(step)
    }
}
