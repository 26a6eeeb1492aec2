//! Unified error types for all layers of the application.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for all layers of Melos.
#[derive(Error, Debug)]
pub enum MelosError {
    // ============ Domain Errors ============
    /// Resource not found
    #[error("Resource not found: {resource_type} with id {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    // ============ Authentication/Authorization Errors ============
    /// Unauthorized access (missing or invalid credential)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Forbidden access (valid credential, insufficient clearance)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Invalid session token
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Session token expired
    #[error("Token expired")]
    TokenExpired,

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    // ============ Infrastructure Errors ============
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Cache backend error. Recovered inside the cache layer; surfacing one
    /// to an HTTP caller is a bug.
    #[error("Cache error: {0}")]
    Cache(String),

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MelosError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Validation(_) => 400,
            Self::Unauthorized(_) | Self::InvalidToken(_) | Self::TokenExpired => 401,
            Self::Forbidden(_) => 403,
            Self::RateLimitExceeded => 429,
            Self::Database(_)
            | Self::Configuration(_)
            | Self::Cache(_)
            | Self::Internal(_)
            | Self::Other(_) => 500,
        }
    }

    /// Returns the machine-readable wire code for this error.
    ///
    /// Store and cache failures deliberately collapse into `E_INTERNAL` so
    /// that infrastructure details never leak to API clients.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "E_NOT_FOUND",
            Self::Validation(_) => "E_VALIDATION",
            Self::Unauthorized(_) | Self::InvalidToken(_) | Self::TokenExpired => "E_AUTH",
            Self::Forbidden(_) => "E_ACCESS",
            Self::RateLimitExceeded => "E_LIMIT",
            Self::Database(_)
            | Self::Configuration(_)
            | Self::Cache(_)
            | Self::Internal(_)
            | Self::Other(_) => "E_INTERNAL",
        }
    }

    /// Creates a not found error for a resource.
    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    /// Creates an unauthorized error.
    #[must_use]
    pub fn unauthorized<T: Into<String>>(message: T) -> Self {
        Self::Unauthorized(message.into())
    }

    /// Creates a forbidden error.
    #[must_use]
    pub fn forbidden<T: Into<String>>(message: T) -> Self {
        Self::Forbidden(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for MelosError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound {
                resource_type: "database_row",
                id: "unknown".to_string(),
            },
            _ => Self::Database(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for MelosError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization error: {}", err))
    }
}

/// Serializable error body for API responses: `{"error": "<code>"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable error code
    pub error: String,
    /// Optional human-readable message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Creates an error body from a `MelosError`.
    #[must_use]
    pub fn from_error(error: &MelosError) -> Self {
        Self {
            error: error.error_code().to_string(),
            message: Some(error.to_string()),
        }
    }

    /// Creates a bare error body carrying only the wire code.
    ///
    /// The authorization gate uses this form so failures never echo
    /// credential material or store internals back to the caller.
    #[must_use]
    pub fn code_only(code: &str) -> Self {
        Self {
            error: code.to_string(),
            message: None,
        }
    }
}

impl From<&MelosError> for ErrorBody {
    fn from(error: &MelosError) -> Self {
        Self::from_error(error)
    }
}
