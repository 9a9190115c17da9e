//! Error types for course search.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`CourseSearchError`] enum. The transport layer decides the response class
//! with [`CourseSearchError::is_client_error`]: invalid criteria map to a
//! 400-equivalent, everything else to a 5xx-equivalent.
//!
//! # Examples
//!
//! ```
//! use coursefind::error::{CourseSearchError, Result};
//!
//! fn check_size(size: i64) -> Result<usize> {
//!     if size < 0 {
//!         return Err(CourseSearchError::invalid_criteria("size must not be negative"));
//!     }
//!     Ok(size as usize)
//! }
//!
//! let err = check_size(-1).unwrap_err();
//! assert!(err.is_client_error());
//! ```

use std::io;

use thiserror::Error;

/// The main error type for course search operations.
#[derive(Error, Debug)]
pub enum CourseSearchError {
    /// The request criteria could not be parsed or are inconsistent.
    #[error("Invalid criteria: {0}")]
    InvalidCriteria(String),

    /// The external index could not serve the request (connection, timeout, query error).
    #[error("Index unavailable: {0}")]
    IndexUnavailable(String),

    /// Configuration could not be loaded or is inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors (reading data or configuration files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for operations that may fail with CourseSearchError.
pub type Result<T> = std::result::Result<T, CourseSearchError>;

impl CourseSearchError {
    /// Create a new invalid criteria error.
    pub fn invalid_criteria<S: Into<String>>(msg: S) -> Self {
        CourseSearchError::InvalidCriteria(msg.into())
    }

    /// Create a new index unavailable error.
    pub fn index_unavailable<S: Into<String>>(msg: S) -> Self {
        CourseSearchError::IndexUnavailable(msg.into())
    }

    /// Create a new timeout error. Timeouts are reported as index unavailability.
    pub fn timeout<S: Into<String>>(msg: S) -> Self {
        CourseSearchError::IndexUnavailable(format!("timed out: {}", msg.into()))
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        CourseSearchError::Config(msg.into())
    }

    /// Whether this error was caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(self, CourseSearchError::InvalidCriteria(_))
    }

    /// Whether this error means the backend could not serve the request.
    pub fn is_index_unavailable(&self) -> bool {
        matches!(self, CourseSearchError::IndexUnavailable(_))
    }
}
