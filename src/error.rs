//! Custom error types for FinWise
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

use crate::models::UserId;

/// The main error type for FinWise operations
#[derive(Error, Debug)]
pub enum FinwiseError {
    /// Configuration-related errors (missing backend URL or key, bad settings file)
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Client-side validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Authentication failures, carrying the provider's message unchanged
    #[error("{0}")]
    Auth(String),

    /// An operation needed a signed-in user and there was none
    #[error("Not signed in. Run 'finwise auth signin' first.")]
    NotAuthenticated,

    /// The backend answered a data or storage request with an error status
    #[error("Backend error ({status}): {message}")]
    Backend { status: u16, message: String },

    /// The request never produced a response (DNS, TLS, timeout, ...)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Sign-up created the account but the matching profile row was not written
    #[error("Failed to create user profile for {user_id}: {reason}")]
    ProfileCreationFailed { user_id: UserId, reason: String },

    /// The expense creation flow stopped before the record was inserted
    #[error("Failed to add expense: {reason}")]
    ExpenseCreationFailed {
        reason: String,
        orphaned_uploads: Vec<String>,
    },

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Local storage errors (session file)
    #[error("Storage error: {0}")]
    Storage(String),
}

impl FinwiseError {
    /// Create a "not found" error for expenses
    pub fn expense_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Expense",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for profiles
    pub fn profile_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Profile",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is an authentication error
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_) | Self::NotAuthenticated)
    }

    /// Check if the operation left remote state half-done
    pub fn is_partial_completion(&self) -> bool {
        matches!(
            self,
            Self::ProfileCreationFailed { .. } | Self::ExpenseCreationFailed { .. }
        )
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for FinwiseError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for FinwiseError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<reqwest::Error> for FinwiseError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

/// Result type alias for FinWise operations
pub type FinwiseResult<T> = Result<T, FinwiseError>;
