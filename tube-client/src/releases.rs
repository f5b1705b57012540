//! Repository release endpoints

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::{GitHubClient, PER_PAGE, Page};

/// A published release of a repository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
    pub id: u64,
    pub tag_name: String,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub prerelease: bool,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// A downloadable file attached to a release
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseAsset {
    pub name: String,
    pub browser_download_url: String,
}

impl GitHubClient {
    // =============================================================================
    // Releases
    // =============================================================================

    /// List one page of a repository's releases, newest first
    pub async fn list_releases(
        &self,
        owner: &str,
        repository: &str,
        page: u32,
    ) -> Result<Page<Release>> {
        let url = format!("{}/repos/{}/{}/releases", self.base_url, owner, repository);
        debug!("GET {} page {}", url, page);

        let response = self
            .prepare(self.client.get(&url))
            .query(&[("per_page", PER_PAGE), ("page", page)])
            .send()
            .await?;

        self.handle_page(response).await
    }
}
