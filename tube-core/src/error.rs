//! Error types for pipeline assembly and validation

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors raised while assembling or validating a pipeline
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    /// A contributed resource names a type nobody registered
    #[error("unable to find resource type {kind} (required by resource {resource})")]
    UnknownResourceType { resource: String, kind: String },

    /// A job step references a resource missing from the pipeline
    #[error("job {job} references unknown resource {resource}")]
    UnknownResource { job: String, resource: String },

    /// Two jobs share a name
    #[error("job {0} is defined more than once")]
    DuplicateJob(String),
}
