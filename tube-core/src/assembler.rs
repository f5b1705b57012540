//! Pipeline assembly
//!
//! Folds an ordered list of contributors into a single [`Pipeline`]. Each
//! contributor declares one job, the group it belongs to, and the resources
//! the job needs. Resource types are looked up in a registry of known types.

use std::collections::HashMap;
use tracing::{debug, info};

use crate::domain::job::Job;
use crate::domain::pipeline::Pipeline;
use crate::domain::resource::{Resource, ResourceType};
use crate::error::{PipelineError, Result};

/// A unit that declares one job plus the resources it needs
pub trait Contributor {
    /// Group the job is listed under
    fn group(&self) -> String;

    /// The fully formed job
    fn job(&self) -> Job;

    /// Resources referenced by the job
    fn resources(&self) -> Vec<Resource>;
}

/// Resource types a contributed resource may name
#[derive(Debug, Clone, Default)]
pub struct KnownResourceTypes(HashMap<String, ResourceType>);

impl KnownResourceTypes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, resource_type: ResourceType) -> Self {
        self.0.insert(resource_type.name.clone(), resource_type);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ResourceType> {
        self.0.get(name)
    }
}

/// Builds one pipeline from contributors, in contributor order
///
/// Resource types and resources are deduplicated by name with the first
/// registration kept. Groups are listed in the order they are first used.
/// A resource whose type is not in `known` aborts assembly.
pub fn assemble(
    name: impl Into<String>,
    contributors: &[Box<dyn Contributor>],
    known: &KnownResourceTypes,
) -> Result<Pipeline> {
    let mut pipeline = Pipeline::new(name);
    info!("Assembling pipeline {}", pipeline.name);

    for contributor in contributors {
        let job = contributor.job();
        info!("  {}", job.name);

        for resource in contributor.resources() {
            let resource_type =
                known
                    .get(&resource.kind)
                    .ok_or_else(|| PipelineError::UnknownResourceType {
                        resource: resource.name.clone(),
                        kind: resource.kind.clone(),
                    })?;

            if pipeline.resource_types.add(resource_type.clone()) {
                debug!("    resource type {}", resource_type.name);
            }
            let resource_name = resource.name.clone();
            if pipeline.resources.add(resource) {
                debug!("    resource {}", resource_name);
            }
        }

        pipeline.groups.add(contributor.group(), job.name.clone());
        pipeline.jobs.push(job);
    }

    Ok(pipeline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::job::{GetStep, PutStep};

    struct Fixed {
        group: &'static str,
        job: &'static str,
        resources: Vec<Resource>,
    }

    impl Contributor for Fixed {
        fn group(&self) -> String {
            self.group.to_string()
        }

        fn job(&self) -> Job {
            let mut job = Job::new(self.job);
            for resource in &self.resources {
                job = job.step(GetStep::new(resource.name.clone()).into());
            }
            job
        }

        fn resources(&self) -> Vec<Resource> {
            self.resources.clone()
        }
    }

    fn known() -> KnownResourceTypes {
        KnownResourceTypes::new()
            .register(ResourceType::registry_image("git", "concourse/git-resource"))
            .register(ResourceType::registry_image("semver", "concourse/semver-resource"))
    }

    fn contributor(
        group: &'static str,
        job: &'static str,
        resources: Vec<Resource>,
    ) -> Box<dyn Contributor> {
        Box::new(Fixed {
            group,
            job,
            resources,
        })
    }

    #[test]
    fn test_shared_resource_type_appears_once() {
        let contributors = vec![
            contributor("build", "a", vec![Resource::new("source", "git")]),
            contributor("build", "b", vec![Resource::new("other-source", "git")]),
        ];

        let pipeline = assemble("widget", &contributors, &known()).unwrap();

        assert_eq!(pipeline.resource_types.len(), 1);
        assert_eq!(pipeline.resources.len(), 2);
        assert!(pipeline.validate().is_ok());
    }

    #[test]
    fn test_shared_resource_first_registration_wins() {
        let contributors = vec![
            contributor(
                "build",
                "a",
                vec![Resource::new("source", "git").with_source("branch", "main")],
            ),
            contributor(
                "test",
                "b",
                vec![Resource::new("source", "git").with_source("branch", "other")],
            ),
        ];

        let pipeline = assemble("widget", &contributors, &known()).unwrap();

        assert_eq!(pipeline.resources.len(), 1);
        assert_eq!(
            pipeline.resources.get("source").unwrap().source["branch"],
            "main"
        );
    }

    #[test]
    fn test_unknown_resource_type_fails() {
        let contributors = vec![
            contributor("build", "a", vec![Resource::new("source", "git")]),
            contributor("build", "b", vec![Resource::new("dep", "maven")]),
        ];

        let err = assemble("widget", &contributors, &known()).unwrap_err();
        assert_eq!(
            err,
            PipelineError::UnknownResourceType {
                resource: "dep".to_string(),
                kind: "maven".to_string(),
            }
        );
    }

    #[test]
    fn test_groups_in_first_discovery_order() {
        let contributors = vec![
            contributor("build", "a", vec![]),
            contributor("test", "b", vec![]),
            contributor("build", "c", vec![]),
        ];

        let pipeline = assemble("widget", &contributors, &known()).unwrap();

        assert_eq!(
            pipeline.groups.names().collect::<Vec<_>>(),
            vec!["build", "test"]
        );
        assert_eq!(pipeline.groups.jobs("build").unwrap(), ["a", "c"]);
        assert_eq!(pipeline.groups.jobs("test").unwrap(), ["b"]);

        let jobs: Vec<_> = pipeline.jobs.iter().map(|j| j.name.as_str()).collect();
        assert_eq!(jobs, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_put_references_are_declared() {
        struct Publisher;

        impl Contributor for Publisher {
            fn group(&self) -> String {
                "build".to_string()
            }

            fn job(&self) -> Job {
                Job::new("release").step(PutStep::new("version").into())
            }

            fn resources(&self) -> Vec<Resource> {
                vec![Resource::new("version", "semver")]
            }
        }

        let contributors: Vec<Box<dyn Contributor>> = vec![Box::new(Publisher)];
        let pipeline = assemble("widget", &contributors, &known()).unwrap();

        assert!(pipeline.validate().is_ok());
        assert_eq!(
            pipeline.resource_types.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
            vec!["semver"]
        );
    }
}
