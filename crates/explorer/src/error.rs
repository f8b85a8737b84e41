//! Error types for explorer queries.

use thiserror::Error;

/// Errors that can occur while querying the explorer.
#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error("Request failed: {0}")]
    Http(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Explorer returned HTTP {0}")]
    Status(u16),

    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for ExplorerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ExplorerError::Timeout(err.to_string())
        } else if err.is_decode() {
            ExplorerError::Malformed(err.to_string())
        } else {
            ExplorerError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ExplorerError {
    fn from(err: serde_json::Error) -> Self {
        ExplorerError::Malformed(err.to_string())
    }
}

impl ExplorerError {
    /// Returns true for network-level failures that the next poll cycle
    /// will most likely get past.
    pub fn is_transient(&self) -> bool {
        match self {
            ExplorerError::Http(_) | ExplorerError::Timeout(_) => true,
            ExplorerError::Status(code) => *code == 429 || *code >= 500,
            ExplorerError::Malformed(_) => false,
        }
    }
}
