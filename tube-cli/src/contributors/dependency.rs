//! Dependency update jobs, one per declared dependency

use tube_core::assembler::Contributor;
use tube_core::domain::job::{GetStep, Job, PutStep, Step, TaskStep};
use tube_core::domain::resource::Resource;

use super::resources::{dependency_resource, source_resource};
use crate::descriptor::{Dependency, Descriptor};

pub struct DependencyContributor {
    descriptor: Descriptor,
    dependency: Dependency,
    salt: String,
}

impl DependencyContributor {
    pub fn new(descriptor: Descriptor, dependency: Dependency, salt: impl Into<String>) -> Self {
        Self {
            descriptor,
            dependency,
            salt: salt.into(),
        }
    }
}

impl Contributor for DependencyContributor {
    fn group(&self) -> String {
        "dependencies".to_string()
    }

    fn job(&self) -> Job {
        let resource = self.dependency.resource_name();

        Job::new(format!("update-{}", self.dependency.name))
            .step(Step::in_parallel(vec![
                GetStep::from_resource("dependency", resource).trigger().into(),
                GetStep::new("source").into(),
            ]))
            .step(
                TaskStep::new("update-dependency", "source/ci/update-dependency.yml")
                    .param("DEPENDENCY", self.dependency.name.clone())
                    .into(),
            )
            .step(
                PutStep::new("source")
                    .param("repository", "source")
                    .param("rebase", true)
                    .into(),
            )
    }

    fn resources(&self) -> Vec<Resource> {
        vec![
            dependency_resource(&self.dependency),
            source_resource(&self.descriptor, &self.salt),
        ]
    }
}
