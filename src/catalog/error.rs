//! Error types for catalog operations
//!
//! These never leave the client: every operation logs them and degrades
//! to an empty or absent result.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("upstream returned HTTP {status}")]
    Status { status: u16 },

    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid upstream response: {0}")]
    Decode(String),
}

impl CatalogError {
    /// Short label for structured log fields
    pub fn kind(&self) -> &'static str {
        match self {
            CatalogError::Status { .. } => "http_status",
            CatalogError::Timeout => "timeout",
            CatalogError::Transport(_) => "transport",
            CatalogError::Decode(_) => "decode",
        }
    }

    /// Network-level failures (connect, DNS, timeout) are logged at higher severity
    pub fn is_transport(&self) -> bool {
        matches!(self, CatalogError::Timeout | CatalogError::Transport(_))
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CatalogError::Timeout
        } else if err.is_decode() {
            CatalogError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            CatalogError::Status {
                status: status.as_u16(),
            }
        } else {
            CatalogError::Transport(err.to_string())
        }
    }
}
