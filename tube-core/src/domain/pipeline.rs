//! Pipeline domain types
//!
//! The pipeline is the root aggregate written out for the orchestrator. Its
//! collections deduplicate by name and keep insertion order so the emitted
//! document is stable between runs.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::collections::HashSet;

use super::job::Job;
use super::resource::{Resource, ResourceType};
use crate::error::{PipelineError, Result};

/// Assembled pipeline definition
#[derive(Debug, Clone, Default, Serialize)]
pub struct Pipeline {
    /// Name the pipeline is registered under; not part of the document
    #[serde(skip)]
    pub name: String,
    pub resource_types: ResourceTypes,
    pub resources: Resources,
    pub jobs: Vec<Job>,
    pub groups: Groups,
}

impl Pipeline {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Checks that every reference in the pipeline resolves
    ///
    /// Each resource's type must be declared, job names must be unique, and
    /// each resource a job fetches or publishes must be declared.
    pub fn validate(&self) -> Result<()> {
        for resource in self.resources.iter() {
            if !self.resource_types.contains(&resource.kind) {
                return Err(PipelineError::UnknownResourceType {
                    resource: resource.name.clone(),
                    kind: resource.kind.clone(),
                });
            }
        }

        let mut job_names = HashSet::new();
        for job in &self.jobs {
            if !job_names.insert(job.name.as_str()) {
                return Err(PipelineError::DuplicateJob(job.name.clone()));
            }

            for name in job.resource_names() {
                if !self.resources.contains(name) {
                    return Err(PipelineError::UnknownResource {
                        job: job.name.clone(),
                        resource: name.to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}

/// Resource types keyed by name, first registration wins
#[derive(Debug, Clone, Default)]
pub struct ResourceTypes(IndexMap<String, ResourceType>);

impl ResourceTypes {
    /// Adds a resource type unless one with the same name exists
    ///
    /// Returns `true` if the type was inserted.
    pub fn add(&mut self, resource_type: ResourceType) -> bool {
        if self.0.contains_key(&resource_type.name) {
            return false;
        }
        self.0.insert(resource_type.name.clone(), resource_type);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&ResourceType> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceType> {
        self.0.values()
    }
}

impl Serialize for ResourceTypes {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.values())
    }
}

/// Resources keyed by name, first registration wins
#[derive(Debug, Clone, Default)]
pub struct Resources(IndexMap<String, Resource>);

impl Resources {
    /// Adds a resource unless one with the same name exists
    ///
    /// Returns `true` if the resource was inserted.
    pub fn add(&mut self, resource: Resource) -> bool {
        if self.0.contains_key(&resource.name) {
            return false;
        }
        self.0.insert(resource.name.clone(), resource);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Resource> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.0.values()
    }
}

impl Serialize for Resources {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.values())
    }
}

/// Group name to ordered job names, in first-use order
#[derive(Debug, Clone, Default)]
pub struct Groups(IndexMap<String, Vec<String>>);

#[derive(Serialize)]
struct Group<'a> {
    name: &'a str,
    jobs: &'a [String],
}

impl Groups {
    /// Appends a job to a group, creating the group on first use
    pub fn add(&mut self, group: impl Into<String>, job: impl Into<String>) {
        self.0.entry(group.into()).or_default().push(job.into());
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn jobs(&self, group: &str) -> Option<&[String]> {
        self.0.get(group).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Groups {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter().map(|(name, jobs)| Group { name, jobs }))
    }
}
