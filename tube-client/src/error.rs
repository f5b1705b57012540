//! GitHub client errors

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Failure of one GitHub API call
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response
    #[error("request to GitHub failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// GitHub answered with a non-success status
    #[error("GitHub returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body did not have the expected shape
    #[error("unexpected GitHub response body: {0}")]
    Decode(#[source] reqwest::Error),
}

impl ClientError {
    /// HTTP status of a rejected call
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// GitHub hides repositories the credentials cannot see behind a 404
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Missing or insufficient credentials
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }
}
