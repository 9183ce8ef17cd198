//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// Only `UnsupportedVersion` is raised by the compiler itself; every other
/// anomaly in a document degrades gracefully into a smaller UI schema.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// The document does not declare an OpenAPI 3.x version marker.
    #[from(ignore)]
    #[display("Unsupported OpenAPI document: {_0}")]
    UnsupportedVersion(String),

    /// The raw text could not be turned into a document.
    #[from(ignore)]
    #[display("Parse Error: {_0}")]
    Parse(String),

    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// A mock record lookup missed.
    #[from(ignore)]
    #[display("Not Found: {_0}")]
    NotFound(String),

    /// A mock record does not satisfy its entity's fields.
    #[from(ignore)]
    #[display("Validation Error: {_0}")]
    Validation(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
