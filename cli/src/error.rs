#![deny(missing_docs)]

//! # CLI Errors
//!
//! Error types for the `llms-txt` binary.

use derive_more::{Display, From};
use llms_txt_core::AppError;

/// Main error enum for CLI operations.
#[derive(Debug, Display, From)]
pub enum CliError {
    /// IO Error wrapper.
    #[display("IO Error: {}", _0)]
    Io(std::io::Error),

    /// Failure inside the document pipeline.
    #[display("{}", _0)]
    App(AppError),

    /// General failure message.
    #[display("Operation failed: {}", _0)]
    General(String),
}

/// `General(String)` holds a `String`, which is not an `Error`, so `source()` stays default.
impl std::error::Error for CliError {}

/// Result type alias.
pub type CliResult<T> = Result<T, CliError>;
