//! Error types for the Chunk Scout application.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Chunk Scout application.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum ChunkScoutError {
    /// Input validation failure. Never reaches the network; surfaced to the
    /// user verbatim with the phase left unchanged.
    #[error("{0}")]
    Validation(String),

    /// Collaborator rejected the request due to rate limiting.
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// Collaborator call failed (network, 5xx, malformed response).
    #[error("Collaborator error: {message}")]
    Collaborator {
        status: Option<u16>,
        message: String,
    },

    /// Collaborator call exceeded its deadline.
    #[error("Request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ChunkScoutError {
    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a RateLimited error
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited(message.into())
    }

    /// Creates a Collaborator error with an optional HTTP status
    pub fn collaborator(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Collaborator {
            status,
            message: message.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this failure should get the rate-limit-tailored message.
    ///
    /// Returns true for:
    /// - `RateLimited` errors
    /// - `Collaborator` errors with HTTP 429 or "throttling" in the detail
    pub fn is_rate_limited(&self) -> bool {
        match self {
            Self::RateLimited(_) => true,
            Self::Collaborator { status, message } => {
                *status == Some(429) || message.to_lowercase().contains("throttling")
            }
            _ => false,
        }
    }

    /// Check if this is a Timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

impl From<std::io::Error> for ChunkScoutError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for ChunkScoutError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ChunkScoutError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for ChunkScoutError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, ChunkScoutError>`.
pub type Result<T> = std::result::Result<T, ChunkScoutError>;
