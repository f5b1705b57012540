//! Configuration module
//!
//! Settings that do not travel in the protocol request itself.

use tube_resource::ResourceKind;

/// Resource binary configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Family served by this process
    pub kind: ResourceKind,

    /// GitHub API base URL used by the github-release family
    pub github_api_url: String,
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.github_api_url.starts_with("http://")
            && !self.github_api_url.starts_with("https://")
        {
            anyhow::bail!(
                "github_api_url must start with http:// or https://, got {}",
                self.github_api_url
            );
        }

        Ok(())
    }
}
