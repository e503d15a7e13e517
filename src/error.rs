//! Error types for the minisheet command session

use minisheet_core::SheetError;
use thiserror::Error;

/// Errors reported for a single session command.
///
/// None of these end the session; the caller prints them and moves on.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Invalid cell reference: {0}")]
    InvalidCell(String),

    #[error("Invalid row: {0}")]
    InvalidRow(String),

    #[error("Invalid column: {0}")]
    InvalidColumn(String),

    #[error("{0} is outside the sheet")]
    OutOfRange(String),

    #[error("{0} does not hold a formula")]
    NotFormula(String),

    #[error("Nothing to {0}")]
    NothingTo(&'static str),

    #[error(transparent)]
    Sheet(#[from] SheetError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CommandError>;
