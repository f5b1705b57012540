//! Artifact download and checksum

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use tube_core::dto::resource::Version;

/// Retrieves an artifact into a directory and reports its checksum
#[async_trait]
pub trait ArtifactFetcher: Send + Sync {
    /// Downloads `uri` into `destination`
    ///
    /// # Returns
    /// The lowercase hex SHA-256 of the downloaded bytes
    async fn download(&self, uri: &str, version: &Version, destination: &Path) -> Result<String>;
}

/// Downloads artifacts over HTTP
///
/// Besides the artifact itself (named after the last path segment of its
/// URI), writes `version` and `uri` files holding the resolved version and
/// the source location.
pub struct HttpArtifactFetcher {
    client: Client,
}

impl HttpArtifactFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ArtifactFetcher for HttpArtifactFetcher {
    async fn download(&self, uri: &str, version: &Version, destination: &Path) -> Result<String> {
        let url = Url::parse(uri).with_context(|| format!("Invalid artifact URI: {}", uri))?;
        let file_name = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|segment| !segment.is_empty())
            .unwrap_or("artifact")
            .to_string();

        tokio::fs::create_dir_all(destination)
            .await
            .with_context(|| format!("Failed to create {}", destination.display()))?;

        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to request artifact")?
            .error_for_status()
            .context("Artifact request was rejected")?;

        let path = destination.join(&file_name);
        let mut file = tokio::fs::File::create(&path)
            .await
            .with_context(|| format!("Failed to create {}", path.display()))?;

        let mut hasher = Sha256::new();
        let mut size = 0usize;
        while let Some(chunk) = response.chunk().await.context("Failed to read artifact")? {
            hasher.update(&chunk);
            size += chunk.len();
            file.write_all(&chunk)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        file.flush().await?;

        tokio::fs::write(destination.join("version"), version.as_str()).await?;
        tokio::fs::write(destination.join("uri"), uri).await?;

        debug!("downloaded {} bytes to {}", size, path.display());
        Ok(format!("{:x}", hasher.finalize()))
    }
}
