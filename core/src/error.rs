//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// The document text could not be parsed as JSON or YAML.
    #[from(ignore)]
    #[display("Parse Error: {_0}")]
    Parse(String),

    /// No operation is registered for the requested method and path.
    #[from(ignore)]
    #[display("Operation {method} {path} not found")]
    OperationNotFound {
        /// Upper-cased HTTP method as requested.
        method: String,
        /// Path template as requested.
        path: String,
    },

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
