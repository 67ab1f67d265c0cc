//! Error handling for the stock engine
//!
//! The HTTP layer owns response mapping; the engine only defines the
//! taxonomy and propagates with `?`.

use thiserror::Error;

/// Engine error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Resolution errors
    #[error("No conversion registered between units '{from}' and '{to}'")]
    UnresolvedConversion { from: String, to: String },

    // Graph-integrity errors
    #[error("Circular bill-of-materials reference through '{0}'")]
    CircularBom(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    /// Whether the error is a transient concurrency failure worth retrying
    ///
    /// Covers Postgres serialization failure (40001), deadlock detected
    /// (40P01) and lock-not-available (55P03) on the stock account row.
    pub fn is_transient(&self) -> bool {
        match self {
            AppError::DatabaseError(e) => e
                .as_database_error()
                .and_then(|db| db.code())
                .map(|code| matches!(code.as_ref(), "40001" | "40P01" | "55P03"))
                .unwrap_or(false),
            _ => false,
        }
    }

    /// Build a validation error from a shared validation helper message
    pub fn validation(field: &str, message: &str) -> Self {
        AppError::Validation {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Result type alias for engine operations
pub type AppResult<T> = Result<T, AppError>;
