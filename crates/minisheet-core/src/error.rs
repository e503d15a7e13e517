//! Error types for minisheet core.

use thiserror::Error;

/// Errors that can occur while working with a document.
///
/// Grid edits never fail: out-of-range coordinates are ignored. Only file
/// access reports errors; evaluation failures are `EvalError` values.
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No file path set")]
    NoFilePath,
}

pub type Result<T> = std::result::Result<T, SheetError>;
