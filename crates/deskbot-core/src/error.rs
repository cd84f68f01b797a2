//! Error types for the Deskbot client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for every Deskbot crate.
///
/// Transport and backend failures are kept apart so controllers can pick the
/// right user-facing message: a backend that answered with a non-success
/// status may carry its own `message`, a transport failure never does.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum DeskError {
    /// The request never produced an HTTP response (connect, TLS, body read).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("Backend error ({status}): {}", message.as_deref().unwrap_or("no message"))]
    Backend {
        status: u16,
        /// The `message` field of the response body, when the backend sent one.
        message: Option<String>,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input rejected before any request was issued
    #[error("Validation error: {0}")]
    Validation(String),

    /// IO error (reading attachments, config files)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DeskError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn backend(status: u16, message: Option<String>) -> Self {
        Self::Backend { status, message }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub fn is_backend(&self) -> bool {
        matches!(self, Self::Backend { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// The message the backend attached to a logical failure, if any.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Backend { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DeskError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for DeskError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for DeskError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<anyhow::Error> for DeskError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, DeskError>`.
pub type Result<T> = std::result::Result<T, DeskError>;
