//! Error types for the CRM admin client.
//!
//! Three boundary taxonomies (`AuthError`, `FetchError`, `MutationError`) describe what
//! can go wrong at the authentication and repository boundaries. `ErrorDescriptor` is the
//! render-facing summary a list screen keeps in its state. `CrmError` covers everything
//! local to the process: files, configuration, serialization.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::SessionStatus;

/// Failures of the authentication boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Email or password was empty; no transition happened.
    #[error("email and password are both required")]
    EmptyCredentials,

    /// The backend rejected the email/password pair.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The call could not complete (network failure, timeout, server fault).
    #[error("authentication service unreachable: {0}")]
    Unreachable(String),

    /// The stored token is no longer accepted.
    #[error("session expired")]
    Expired,

    /// The backend answered with a body that does not match the expected schema.
    #[error("malformed authentication response: {0}")]
    MalformedResponse(String),

    /// The operation is not allowed from the current session status.
    #[error("cannot authenticate while the session is {from}")]
    IllegalTransition { from: SessionStatus },
}

impl AuthError {
    /// Creates an Unreachable error
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::Unreachable(message.into())
    }

    /// Creates a MalformedResponse error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    /// Returns true when the error proves the token is no longer valid.
    pub fn is_expired(&self) -> bool {
        matches!(self, Self::Expired)
    }

    /// Check if this is an Unreachable error
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Unreachable(_))
    }
}

/// Failures of read calls against a resource repository.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("resource service unreachable: {0}")]
    Unreachable(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("not authorized")]
    Unauthorized,

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl FetchError {
    /// Creates an Unreachable error
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::Unreachable(message.into())
    }

    /// Creates a NotFound error
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Creates a MalformedResponse error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    /// Check if this error must be escalated to the session.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

/// Failures of create/update/remove calls against a resource repository.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MutationError {
    #[error("resource service unreachable: {0}")]
    Unreachable(String),

    /// The server refused the change (duplicate, validation, state conflict).
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("not authorized")]
    Unauthorized,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl MutationError {
    /// Creates an Unreachable error
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::Unreachable(message.into())
    }

    /// Creates a Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// Creates a NotFound error
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Creates a MalformedResponse error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    /// Check if this error must be escalated to the session.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

/// Category of a failure as shown to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Unreachable,
    NotFound,
    Unauthorized,
    Conflict,
    MalformedResponse,
}

/// Render-facing description of a failed call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDescriptor {
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorDescriptor {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ErrorDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<&FetchError> for ErrorDescriptor {
    fn from(err: &FetchError) -> Self {
        let kind = match err {
            FetchError::Unreachable(_) => ErrorKind::Unreachable,
            FetchError::NotFound(_) => ErrorKind::NotFound,
            FetchError::Unauthorized => ErrorKind::Unauthorized,
            FetchError::MalformedResponse(_) => ErrorKind::MalformedResponse,
        };
        Self::new(kind, err.to_string())
    }
}

impl From<&MutationError> for ErrorDescriptor {
    fn from(err: &MutationError) -> Self {
        let kind = match err {
            MutationError::Unreachable(_) => ErrorKind::Unreachable,
            MutationError::Conflict(_) => ErrorKind::Conflict,
            MutationError::Unauthorized => ErrorKind::Unauthorized,
            MutationError::NotFound(_) => ErrorKind::NotFound,
            MutationError::MalformedResponse(_) => ErrorKind::MalformedResponse,
        };
        Self::new(kind, err.to_string())
    }
}

/// A shared error type for process-local failures.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum CrmError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Persistent storage error (session file, locks)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CrmError {
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

    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is an IO error
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

impl From<std::io::Error> for CrmError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for CrmError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for CrmError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for CrmError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, CrmError>`.
pub type Result<T> = std::result::Result<T, CrmError>;
