//! errors.rs - Custom error types for the medsite-core library.
//!
//! This module defines a structured error enum for the library, providing
//! specific, actionable error types that callers can match on. The store's
//! infallible surface (`load`, `save`) is built on top of operations that
//! return these errors.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// This enum represents all possible error types in the `medsite-core` library.
///
/// New variants may be added in future versions, hence `#[non_exhaustive]`.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ContentError {
    #[error("Failed to compile sanitize rule '{0}': {1}")]
    RuleCompilationError(String, regex::Error),

    #[error("Rule '{0}': pattern length ({1}) exceeds maximum allowed ({2})")]
    PatternLengthExceeded(String, usize, usize),

    #[error("Invalid contact email address: '{0}'")]
    InvalidEmail(String),

    #[error("Content must be a JSON object keyed by section, got {0}")]
    NotAnObject(&'static str),

    #[error("Backup '{0}' does not exist")]
    UnknownBackup(String),

    #[error("Failed to (de)serialize content: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("An unexpected I/O error occurred: {0}")]
    IoError(#[from] std::io::Error),

    #[error("A critical system error occurred: {0}")]
    AnyhowWrapper(#[from] anyhow::Error),

    #[error("A fatal error occurred: {0}")]
    Fatal(String),
}

impl ContentError {
    /// True for errors caused by the submitted content rather than the environment.
    pub fn is_rejection(&self) -> bool {
        matches!(self, ContentError::InvalidEmail(_) | ContentError::NotAnObject(_))
    }
}
