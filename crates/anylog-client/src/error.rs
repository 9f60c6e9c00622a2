//! Error types for the AnyLog client

use std::path::PathBuf;

use thiserror::Error;

use crate::status::{CallType, format_error};

/// Errors that can occur when talking to an AnyLog node
#[derive(Error, Debug)]
pub enum ClientError {
    /// The connection registry was read before `configure` was called
    #[error("connection not configured")]
    NotConfigured,

    /// Transport failure: connection refused, DNS failure, timeout
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The node answered with anything other than 200
    #[error("unexpected HTTP status {status}")]
    Status {
        /// HTTP status code
        status: u16,
    },

    /// The node answered 200 but the payload could not be read
    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),

    /// Config file could not be read
    #[error("failed to read config file {}: {source}", .path.display())]
    ConfigRead {
        /// Path that was read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`ClientConfig`](crate::ClientConfig)
    #[error("invalid config file {}: {source}", .path.display())]
    ConfigParse {
        /// Path that was parsed
        path: PathBuf,
        /// Underlying parse error
        #[source]
        source: toml::de::Error,
    },
}

impl ClientError {
    /// Which stage of the call failed
    #[must_use]
    pub fn call_type(&self) -> CallType {
        match self {
            ClientError::Body(_) => CallType::Output,
            _ => CallType::Get,
        }
    }

    /// Status code reported in the diagnostic
    ///
    /// Only [`ClientError::Status`] carries a real code; every other failure is
    /// reported against 200 so the diagnostic shows the error description.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            ClientError::Status { status } => *status,
            _ => 200,
        }
    }

    /// Operator-facing message for a failed `command`
    #[must_use]
    pub fn diagnostic(&self, command: &str) -> String {
        let detail = match self {
            ClientError::Http(err) | ClientError::Body(err) => err.to_string(),
            other => other.to_string(),
        };
        format_error(
            self.call_type().as_str(),
            command,
            self.status_code(),
            Some(detail.as_str()),
        )
    }
}

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
