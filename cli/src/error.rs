#![deny(missing_docs)]

//! # CLI Errors
//!
//! Error types for the `uigen` binary.

use derive_more::{Display, From};
use uigen_core::AppError;

/// Main error enum for CLI operations.
#[derive(Debug, Display, From)]
pub enum CliError {
    /// IO Error wrapper.
    #[display("IO Error: {}", _0)]
    Io(std::io::Error),

    /// A failure reported by the compiler or the mock backend.
    #[display("{}", _0)]
    App(AppError),

    /// Arguments that parse but cannot be acted on.
    #[from(ignore)]
    #[display("Usage Error: {}", _0)]
    Usage(String),

    /// General failure message.
    #[display("Operation failed: {}", _0)]
    General(String),
}

impl std::error::Error for CliError {}

/// Result type alias.
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display_passes_through() {
        let err: CliError = AppError::NotFound("entity 'Ghost'".into()).into();
        assert_eq!(err.to_string(), "Not Found: entity 'Ghost'");
    }

    #[test]
    fn test_string_conversion() {
        let err: CliError = "batch failed".to_string().into();
        assert!(matches!(err, CliError::General(_)));
    }
}
