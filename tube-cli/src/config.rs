//! Configuration module
//!
//! Handles CLI configuration: where the descriptor and pipeline live, and
//! how to reach the orchestrator and GitHub when reconciling webhooks.

use anyhow::Result;
use std::path::PathBuf;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Project descriptor to read
    pub descriptor_path: PathBuf,

    /// Where to write the pipeline; stdout when unset
    pub pipeline_path: Option<PathBuf>,

    /// Salt mixed into every generated webhook token
    pub webhook_salt: String,
}

/// Settings needed only when webhooks are reconciled
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// GitHub API base URL
    pub github_api_url: String,

    /// GitHub user the access token belongs to
    pub github_username: String,

    /// GitHub personal access token with `admin:repo_hook`
    pub github_access_token: String,

    /// Orchestrator base URL (e.g., "https://ci.example.com")
    pub concourse_uri: String,

    /// Orchestrator team owning the pipeline
    pub concourse_team: String,
}

impl WebhookConfig {
    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("github_api_url", &self.github_api_url),
            ("concourse_uri", &self.concourse_uri),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                anyhow::bail!("{} must start with http:// or https://, got {:?}", name, url);
            }
        }

        if self.github_username.trim().is_empty() || self.github_access_token.trim().is_empty() {
            anyhow::bail!("GitHub username and access token are required to manage webhooks");
        }

        if self.concourse_team.trim().is_empty() {
            anyhow::bail!("concourse_team cannot be empty");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn webhook_config() -> WebhookConfig {
        WebhookConfig {
            github_api_url: "https://api.github.com".to_string(),
            github_username: "bot".to_string(),
            github_access_token: "token".to_string(),
            concourse_uri: "https://ci.example.com".to_string(),
            concourse_team: "main".to_string(),
        }
    }

    #[test]
    fn test_webhook_config_validation() {
        let mut config = webhook_config();

        // Valid config should pass
        assert!(config.validate().is_ok());

        // Missing token should fail
        config.github_access_token = String::new();
        assert!(config.validate().is_err());

        config.github_access_token = "token".to_string();

        // Invalid URL should fail
        config.concourse_uri = "ci.example.com".to_string();
        assert!(config.validate().is_err());

        config.concourse_uri = "https://ci.example.com".to_string();
        config.concourse_team = " ".to_string();
        assert!(config.validate().is_err());
    }
}
