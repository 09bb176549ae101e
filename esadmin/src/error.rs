use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Node index {idx} out of range ({len} servers configured)")]
    NodeOutOfRange { idx: usize, len: usize },

    #[error("Invalid index name '{name}': {reason}")]
    InvalidIndexName { name: String, reason: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Could not build request: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Request to {url} failed after {attempts} attempt(s): {source}")]
    Transport {
        url: String,
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Timed out after {timeout:?} waiting for {url}")]
    Timeout { url: String, timeout: Duration },

    #[error("could not {operation}: {url} (status {status})")]
    Status {
        operation: &'static str,
        url: String,
        status: u16,
    },

    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl AdminError {
    /// Coarse failure class, stable enough for log fields and exit codes
    pub fn error_type(&self) -> &'static str {
        match self {
            AdminError::Config(_)
            | AdminError::NodeOutOfRange { .. }
            | AdminError::InvalidIndexName { .. }
            | AdminError::InvalidUrl(_)
            | AdminError::Request(_) => "construction",
            AdminError::Transport { .. } | AdminError::Body { .. } => "transport",
            AdminError::Timeout { .. } => "timeout",
            AdminError::Status { .. } => "protocol",
            AdminError::Decode { .. } => "decode",
        }
    }

    /// HTTP status of a protocol failure
    pub fn status(&self) -> Option<u16> {
        match self {
            AdminError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AdminError>;
