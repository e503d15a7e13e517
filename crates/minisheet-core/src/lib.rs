//! minisheet-core - UI-agnostic document model, history and storage.

pub mod config;
pub mod document;
pub mod error;
pub mod storage;

pub use config::SheetConfig;
pub use document::{Action, Document, History, HistoryEntry, RowFilter};
pub use error::{Result, SheetError};

pub use minisheet_engine::engine::{Axis, CellRef, CellValue, EvalError, Limits};
