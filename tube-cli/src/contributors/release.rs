//! Release jobs: tag the tested source and bump the version

use std::fmt;
use tube_core::assembler::Contributor;
use tube_core::domain::job::{GetStep, Job, PutStep, Step};
use tube_core::domain::resource::Resource;

use super::resources::{source_resource, version_resource};
use crate::descriptor::Descriptor;

/// Semantic-version component a release bumps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bump {
    Major,
    Minor,
    Patch,
}

impl fmt::Display for Bump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bump::Major => write!(f, "major"),
            Bump::Minor => write!(f, "minor"),
            Bump::Patch => write!(f, "patch"),
        }
    }
}

pub struct ReleaseContributor {
    descriptor: Descriptor,
    salt: String,
    bump: Bump,
}

impl ReleaseContributor {
    pub fn new(descriptor: Descriptor, salt: impl Into<String>, bump: Bump) -> Self {
        Self {
            descriptor,
            salt: salt.into(),
            bump,
        }
    }
}

impl Contributor for ReleaseContributor {
    fn group(&self) -> String {
        "build".to_string()
    }

    fn job(&self) -> Job {
        let source = source_resource(&self.descriptor, &self.salt);
        let version = version_resource(&self.descriptor);
        let bump = self.bump.to_string();

        Job::new(format!("release-{}", self.bump))
            .public()
            .step(Step::in_parallel(vec![
                GetStep::from_resource("source", source.name.clone())
                    .passed("test")
                    .into(),
                GetStep::from_resource("version", version.name.clone())
                    .param("bump", bump.clone())
                    .into(),
            ]))
            .step(Step::in_parallel(vec![
                PutStep::new(source.name)
                    .param("repository", "source")
                    .param("only_tag", true)
                    .param("tag", "version/version")
                    .param("tag_prefix", "v")
                    .into(),
                PutStep::new(version.name).param("bump", bump).into(),
            ]))
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
    fn test_release_minor_job() {
        let descriptor = Descriptor::parse("name: github.com/acme/widget").unwrap();
        let contributor = ReleaseContributor::new(descriptor, "salt", Bump::Minor);

        let job = contributor.job();
        assert_eq!(job.name, "release-minor");
        assert!(job.public);
        assert_eq!(contributor.group(), "build");
        assert_eq!(
            job.resource_names(),
            vec!["source", "version", "source", "version"]
        );

        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value["plan"][0]["in_parallel"][1]["params"]["bump"], "minor");
        assert_eq!(value["plan"][1]["in_parallel"][0]["params"]["only_tag"], true);
    }

    #[test]
    fn test_release_names_per_bump() {
        let descriptor = Descriptor::parse("name: github.com/acme/widget").unwrap();
        for (bump, name) in [
            (Bump::Major, "release-major"),
            (Bump::Minor, "release-minor"),
            (Bump::Patch, "release-patch"),
        ] {
            let contributor = ReleaseContributor::new(descriptor.clone(), "salt", bump);
            assert_eq!(contributor.job().name, name);
        }
    }
}
