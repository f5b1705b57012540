//! Resource protocol runtime
//!
//! Implements `check`, `in` and `out` on top of a [`Resource`] capability.
//! Each operation reads exactly one JSON request and, only once the whole
//! operation has succeeded, writes exactly one JSON response.

use async_trait::async_trait;
use regex::Regex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use tube_core::domain::resource::Source;
use tube_core::dto::resource::{
    CheckRequest, CheckResult, InRequest, InResult, Metadata, OutRequest, OutResult,
    VersionCatalog,
};

use crate::artifact::ArtifactFetcher;
use crate::error::{ProtocolError, Result};
use crate::version_set::{VersionSet, parse_semver};

/// `source` key holding an optional regular expression versions must match
pub const VERSION_PATTERN: &str = "version_pattern";

/// Capability every concrete resource family provides
#[async_trait]
pub trait Resource: Send + Sync {
    /// Every version currently known upstream, with its download location
    async fn versions(&self, source: &Source) -> anyhow::Result<VersionCatalog>;

    /// Publishes from `source_path` and reports the resulting version
    async fn out(&self, request: &OutRequest, source_path: &Path) -> anyhow::Result<OutResult>;
}

/// One protocol invocation, with its out-of-band path argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Check,
    In { destination: PathBuf },
    Out { source: PathBuf },
}

/// Runs protocol operations against one resource
pub struct ResourceRuntime {
    resource: Box<dyn Resource>,
    fetcher: Box<dyn ArtifactFetcher>,
}

impl ResourceRuntime {
    pub fn new(resource: Box<dyn Resource>, fetcher: Box<dyn ArtifactFetcher>) -> Self {
        Self { resource, fetcher }
    }

    /// Decodes a request from `input`, runs `operation` and encodes the
    /// result to `output`
    pub async fn run<R: Read, W: Write>(
        &self,
        operation: &Operation,
        input: R,
        output: W,
    ) -> Result<()> {
        match operation {
            Operation::Check => {
                let result = self.check(decode(input)?).await?;
                encode(output, &result)
            }
            Operation::In { destination } => {
                let result = self.fetch(decode(input)?, destination).await?;
                encode(output, &result)
            }
            Operation::Out { source } => {
                let result = self.publish(decode(input)?, source).await?;
                encode(output, &result)
            }
        }
    }

    /// Lists versions newer than or equal to the request's baseline
    ///
    /// Without a baseline only the newest version is returned, and an empty
    /// catalog is an error.
    pub async fn check(&self, request: CheckRequest) -> Result<CheckResult> {
        let catalog = self
            .resource
            .versions(&request.source)
            .await
            .map_err(ProtocolError::Catalog)?;

        let pattern = version_pattern(&request.source)?;
        let versions = VersionSet::from_catalog(&catalog, pattern.as_ref());
        debug!(
            "{} of {} versions match the pattern",
            versions.len(),
            catalog.len()
        );

        let result = match request.baseline() {
            None => {
                let latest = versions.latest().ok_or(ProtocolError::NoVersions)?;
                vec![latest.clone()]
            }
            Some(baseline) => {
                let since = parse_semver(baseline.as_str())
                    .ok_or_else(|| ProtocolError::InvalidVersion(baseline.to_string()))?;
                versions.since(&since)
            }
        };

        info!("check found {} version(s)", result.len());
        Ok(result)
    }

    /// Downloads the requested version into `destination`
    pub async fn fetch(&self, request: InRequest, destination: &Path) -> Result<InResult> {
        let catalog = self
            .resource
            .versions(&request.source)
            .await
            .map_err(ProtocolError::Catalog)?;

        let uri = catalog
            .get(&request.version)
            .filter(|uri| !uri.is_empty())
            .ok_or_else(|| ProtocolError::VersionNotFound(request.version.clone()))?;

        info!("fetching {} from {}", request.version, uri);
        let sha256 = self
            .fetcher
            .download(uri, &request.version, destination)
            .await
            .map_err(|error| ProtocolError::Artifact {
                uri: uri.clone(),
                error,
            })?;

        Ok(InResult {
            version: request.version,
            metadata: Metadata::new().with("uri", uri.as_str()).with("sha256", sha256),
        })
    }

    /// Delegates to the resource's own `out`
    pub async fn publish(&self, request: OutRequest, source: &Path) -> Result<OutResult> {
        let result = self
            .resource
            .out(&request, source)
            .await
            .map_err(ProtocolError::Out)?;

        info!("published {}", result.version);
        Ok(result)
    }
}

fn version_pattern(source: &Source) -> Result<Option<Regex>> {
    match source.get(VERSION_PATTERN) {
        Some(Value::String(pattern)) => Regex::new(pattern)
            .map(Some)
            .map_err(|source| ProtocolError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            }),
        _ => Ok(None),
    }
}

fn decode<T: DeserializeOwned, R: Read>(input: R) -> Result<T> {
    serde_json::from_reader(input).map_err(ProtocolError::InvalidRequest)
}

fn encode<T: Serialize, W: Write>(mut output: W, value: &T) -> Result<()> {
    serde_json::to_writer(&mut output, value).map_err(ProtocolError::Encode)?;
    writeln!(output).map_err(|e| ProtocolError::Encode(serde_json::Error::io(e)))
}
