//! Versions listed in a JSON index document

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

use tube_core::domain::resource::Source;
use tube_core::dto::resource::{OutRequest, OutResult, Version, VersionCatalog};

use crate::protocol::Resource;

#[derive(Debug, Deserialize)]
struct IndexSource {
    uri: String,
}

/// Reads `{"<version>": "<download uri>", ...}` from `source.uri`
pub struct IndexResource {
    client: Client,
}

impl IndexResource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for IndexResource {
    async fn versions(&self, source: &Source) -> Result<VersionCatalog> {
        let config: IndexSource = serde_json::from_value(Value::Object(source.clone()))
            .context("Invalid index source")?;

        let index: BTreeMap<String, String> = self
            .client
            .get(&config.uri)
            .send()
            .await
            .with_context(|| format!("Failed to request {}", config.uri))?
            .error_for_status()
            .with_context(|| format!("Index {} was rejected", config.uri))?
            .json()
            .await
            .with_context(|| format!("Failed to parse index {}", config.uri))?;

        Ok(index
            .into_iter()
            .map(|(version, uri)| (Version::new(version), uri))
            .collect())
    }

    async fn out(&self, _request: &OutRequest, _source_path: &Path) -> Result<OutResult> {
        bail!("index resources do not support out")
    }
}
