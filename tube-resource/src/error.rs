//! Error types for the resource protocol runtime

use thiserror::Error;
use tube_core::dto::resource::Version;

/// Result type alias for protocol operations
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Everything that can abort a `check`, `in` or `out` invocation
///
/// None of these are recoverable inside the runtime. The binary reports the
/// first one and exits non-zero without writing a response.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("unable to decode request: {0}")]
    InvalidRequest(#[source] serde_json::Error),

    #[error("unable to fetch versions: {0:#}")]
    Catalog(anyhow::Error),

    #[error("unable to compile version pattern {pattern}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("no versions available")]
    NoVersions,

    #[error("unable to parse version {0}")]
    InvalidVersion(String),

    #[error("version {0} not found")]
    VersionNotFound(Version),

    #[error("unable to download artifact {uri}: {error:#}")]
    Artifact { uri: String, error: anyhow::Error },

    #[error("unable to publish: {0:#}")]
    Out(anyhow::Error),

    #[error("unable to encode response: {0}")]
    Encode(#[source] serde_json::Error),
}
