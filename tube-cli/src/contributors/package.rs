//! Package job, contributed only when the descriptor declares a package

use tube_core::assembler::Contributor;
use tube_core::domain::job::{GetStep, Job, Step, TaskStep};
use tube_core::domain::resource::Resource;

use super::resources::{source_resource, version_resource};
use crate::descriptor::{Descriptor, Package};

pub struct PackageContributor {
    descriptor: Descriptor,
    package: Package,
    salt: String,
}

impl PackageContributor {
    pub fn new(descriptor: Descriptor, package: Package, salt: impl Into<String>) -> Self {
        Self {
            descriptor,
            package,
            salt: salt.into(),
        }
    }
}

impl Contributor for PackageContributor {
    fn group(&self) -> String {
        "build".to_string()
    }

    fn job(&self) -> Job {
        Job::new("package")
            .public()
            .step(Step::in_parallel(vec![
                GetStep::new("source").passed("test").trigger().into(),
                GetStep::new("version").into(),
            ]))
            .step(
                TaskStep::new("package", "source/ci/package.yml")
                    .privileged()
                    .param("REPOSITORY", self.package.repository.clone())
                    .into(),
            )
    }

    fn resources(&self) -> Vec<Resource> {
        vec![
            source_resource(&self.descriptor, &self.salt),
            version_resource(&self.descriptor),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_job_passes_repository() {
        let descriptor =
            Descriptor::parse("name: github.com/acme/widget\npackage:\n  repository: ghcr.io/acme/widget")
                .unwrap();
        let package = descriptor.package.clone().unwrap();
        let job = PackageContributor::new(descriptor, package, "salt").job();

        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value["plan"][1]["params"]["REPOSITORY"], "ghcr.io/acme/widget");
        assert_eq!(value["plan"][1]["privileged"], true);
        assert_eq!(job.resource_names(), vec!["source", "version"]);
    }
}
