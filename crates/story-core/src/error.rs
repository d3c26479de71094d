//! Error types for the Story Share application.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Story Share application.
///
/// The variants follow the failure taxonomy the presenters branch on:
/// a missing session, a structured error returned by the remote API,
/// a transport fault, and a local resource (map widget) that failed
/// to initialize. Storage and configuration failures share the same
/// type so every layer can propagate with `?`.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum StoryError {
    /// An operation requires a signed-in user and no session exists
    #[error("Missing authentication: {0}")]
    Unauthorized(String),

    /// The remote API answered with an error envelope
    #[error("{message}")]
    Remote { message: String },

    /// Network failure or an unparseable response
    #[error("Transport error: {0}")]
    Transport(String),

    /// A local resource (e.g. a map widget) could not be acquired
    #[error("Resource error: {0}")]
    Resource(String),

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StoryError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an Unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    /// Creates a Remote error carrying the envelope message verbatim
    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote {
            message: message.into(),
        }
    }

    /// Creates a Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a Resource error
    pub fn resource(message: impl Into<String>) -> Self {
        Self::Resource(message.into())
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is an Unauthorized error
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// Check if this is a Remote error
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }

    /// Check if this is a Transport error
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns the text shown to the user for this error.
    ///
    /// Remote envelope messages are surfaced verbatim; everything else
    /// uses the display form.
    pub fn user_message(&self) -> String {
        match self {
            Self::Remote { message } => message.clone(),
            Self::Unauthorized(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for StoryError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for StoryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for StoryError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for StoryError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for StoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Transport(format!("invalid response body: {}", err))
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Conversion from anyhow::Error (used by binaries and ad-hoc helpers)
impl From<anyhow::Error> for StoryError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, StoryError>`.
pub type Result<T> = std::result::Result<T, StoryError>;
