//! Webhook descriptor domain types

use serde::{Deserialize, Serialize};

/// Webhook intent attached to a resource
///
/// Names the source-control repository whose pushes should trigger a check
/// of the resource, and the secret token the orchestrator expects on the
/// callback. The all-empty value means "no webhook".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebHook {
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub repository: String,
    #[serde(default)]
    pub token: String,
}

impl WebHook {
    pub fn new(
        owner: impl Into<String>,
        repository: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            repository: repository.into(),
            token: token.into(),
        }
    }

    /// Returns `true` when no field is set
    pub fn is_empty(&self) -> bool {
        self == &WebHook::default()
    }

    /// Sort key used when reconciling hooks: owner and repository joined
    pub fn slug(&self) -> String {
        format!("{}{}", self.owner, self.repository)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        assert!(WebHook::default().is_empty());
    }

    #[test]
    fn test_token_only_is_not_empty() {
        let hook = WebHook {
            token: "secret".to_string(),
            ..Default::default()
        };
        assert!(!hook.is_empty());
        assert_eq!(hook.slug(), "");
    }

    #[test]
    fn test_slug() {
        let hook = WebHook::new("acme", "widget", "t");
        assert_eq!(hook.slug(), "acmewidget");
    }
}
