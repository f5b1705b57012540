//! Resources and resource types shared by the contributors

use sha2::{Digest, Sha256};
use tube_core::assembler::KnownResourceTypes;
use tube_core::domain::resource::{Resource, ResourceType};
use tube_core::domain::webhook::WebHook;

use crate::descriptor::{Dependency, Descriptor};

/// Image the tube resource families are published under
const TUBE_RESOURCE_IMAGE: &str = "ghcr.io/tube-ci/tube-resource";

/// Every resource type a contributor may use
pub fn known_resource_types() -> KnownResourceTypes {
    KnownResourceTypes::new()
        .register(ResourceType::registry_image("git", "concourse/git-resource").with_tag("1"))
        .register(
            ResourceType::registry_image("semver", "concourse/semver-resource").with_tag("1"),
        )
        .register(
            ResourceType::registry_image("github-release", TUBE_RESOURCE_IMAGE)
                .with_tag("github-release"),
        )
        .register(ResourceType::registry_image("index", TUBE_RESOURCE_IMAGE).with_tag("index"))
}

/// Deterministic webhook token for a repository
pub fn webhook_token(salt: &str, owner: &str, repository: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{}/{}/{}", salt, owner, repository).as_bytes());
    format!("{:x}", hasher.finalize())
}

/// The project's own repository, triggered by webhook
pub fn source_resource(descriptor: &Descriptor, salt: &str) -> Resource {
    let owner = descriptor.owner();
    let repository = descriptor.repository();

    Resource::new("source", "git")
        .with_icon("github")
        .with_source("uri", format!("https://github.com/{}/{}", owner, repository))
        .with_source("branch", descriptor.branch.clone())
        .with_source("username", "((github-username))")
        .with_source("password", "((github-access-token))")
        .with_webhook(WebHook::new(
            owner,
            repository,
            webhook_token(salt, owner, repository),
        ))
}

/// The project's version number, stored on a branch of its repository
pub fn version_resource(descriptor: &Descriptor) -> Resource {
    Resource::new("version", "semver")
        .with_icon("tag-outline")
        .with_source("driver", "git")
        .with_source(
            "uri",
            format!(
                "https://github.com/{}/{}",
                descriptor.owner(),
                descriptor.repository()
            ),
        )
        .with_source("branch", "version")
        .with_source("file", "version")
        .with_source("initial_version", "0.0.0")
        .with_source("username", "((github-username))")
        .with_source("password", "((github-access-token))")
}

/// An upstream dependency, polled through its own resource type
pub fn dependency_resource(dependency: &Dependency) -> Resource {
    let mut resource = Resource::new(dependency.resource_name(), dependency.uses.clone())
        .with_icon("package-variant-closed");
    resource.source = dependency.with.clone();
    resource
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> Descriptor {
        Descriptor::parse("name: github.com/acme/widget").unwrap()
    }

    #[test]
    fn test_webhook_token_is_deterministic() {
        let a = webhook_token("salt", "acme", "widget");
        let b = webhook_token("salt", "acme", "widget");
        let c = webhook_token("other", "acme", "widget");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_source_resource_carries_webhook() {
        let source = source_resource(&descriptor(), "salt");

        assert_eq!(source.name, "source");
        assert_eq!(source.kind, "git");
        assert_eq!(source.webhook.owner, "acme");
        assert_eq!(source.webhook.repository, "widget");
        assert_eq!(source.webhook.token, webhook_token("salt", "acme", "widget"));
        assert_eq!(source.source["uri"], "https://github.com/acme/widget");
    }

    #[test]
    fn test_version_resource_has_no_webhook() {
        assert!(!version_resource(&descriptor()).has_webhook());
    }

    #[test]
    fn test_known_types_cover_resources() {
        let known = known_resource_types();
        for kind in ["git", "semver", "github-release", "index"] {
            assert!(known.get(kind).is_some(), "missing {}", kind);
        }
        assert!(known.get("maven").is_none());
    }
}
