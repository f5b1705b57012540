//! Pipeline contributors derived from a project descriptor

mod dependency;
mod package;
mod release;
mod resources;

pub use dependency::DependencyContributor;
pub use package::PackageContributor;
pub use release::{Bump, ReleaseContributor};
pub use resources::known_resource_types;
pub use test::TestContributor;

use tube_core::assembler::Contributor;

use crate::descriptor::Descriptor;

/// Every contributor the descriptor asks for, in the order jobs are listed
pub fn contributors(descriptor: &Descriptor, salt: &str) -> Vec<Box<dyn Contributor>> {
    let mut contributors: Vec<Box<dyn Contributor>> = vec![
        Box::new(ReleaseContributor::new(descriptor.clone(), salt, Bump::Major)),
        Box::new(ReleaseContributor::new(descriptor.clone(), salt, Bump::Minor)),
        Box::new(ReleaseContributor::new(descriptor.clone(), salt, Bump::Patch)),
        Box::new(TestContributor::new(descriptor.clone(), salt)),
    ];

    if let Some(package) = &descriptor.package {
        contributors.push(Box::new(PackageContributor::new(
            descriptor.clone(),
            package.clone(),
            salt,
        )));
    }

    for dependency in &descriptor.dependencies {
        contributors.push(Box::new(DependencyContributor::new(
            descriptor.clone(),
            dependency.clone(),
            salt,
        )));
    }

    contributors
}

#[cfg(test)]
mod tests {
    use super::*;
    use tube_core::assembler::assemble;

    const DESCRIPTOR: &str = r#"
name: github.com/acme/widget
package:
  repository: ghcr.io/acme/widget
dependencies:
  - name: jdk
    uses: github-release
    with:
      owner: adoptium
      repository: temurin17-binaries
  - name: gradle
    uses: index
    with:
      uri: https://example.com/gradle.json
"#;

    #[test]
    fn test_minimal_descriptor_contributors() {
        let descriptor = Descriptor::parse("name: github.com/acme/widget").unwrap();
        let jobs: Vec<String> = contributors(&descriptor, "salt")
            .iter()
            .map(|c| c.job().name)
            .collect();

        assert_eq!(
            jobs,
            vec!["release-major", "release-minor", "release-patch", "test"]
        );
    }

    #[test]
    fn test_assembled_pipeline() {
        let descriptor = Descriptor::parse(DESCRIPTOR).unwrap();
        let pipeline = assemble(
            descriptor.short_name(),
            &contributors(&descriptor, "salt"),
            &known_resource_types(),
        )
        .unwrap();

        assert_eq!(pipeline.name, "widget");
        assert_eq!(pipeline.jobs.len(), 7);

        let resources: Vec<&str> = pipeline.resources.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            resources,
            vec!["source", "version", "dependency-jdk", "dependency-gradle"]
        );

        let types: Vec<&str> = pipeline
            .resource_types
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(types, vec!["git", "semver", "github-release", "index"]);

        assert_eq!(
            pipeline.groups.names().collect::<Vec<_>>(),
            vec!["build", "test", "dependencies"]
        );
        assert_eq!(
            pipeline.groups.jobs("build").unwrap(),
            &["release-major", "release-minor", "release-patch", "package"]
        );
        assert!(pipeline.validate().is_ok());
    }

    #[test]
    fn test_unknown_dependency_type_fails() {
        let descriptor = Descriptor::parse(
            "name: github.com/acme/widget\ndependencies:\n  - name: maven\n    uses: maven",
        )
        .unwrap();

        let result = assemble(
            "widget",
            &contributors(&descriptor, "salt"),
            &known_resource_types(),
        );
        assert!(result.is_err());
    }
}
