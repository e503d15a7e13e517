//! Spreadsheet engine API.
//!
//! This module provides the core computation engine for the spreadsheet:
//!
//! - [`Cell`], [`Grid`], [`Limits`] - Data structures for cell storage
//! - [`CellRef`] - Cell reference parsing (A1 notation ↔ row/col indices)
//! - [`EvalContext`], [`evaluate`] - Flat left-to-right formula evaluation with cycle detection
//! - [`shift_references`] - Relative reference rewriting for formula fill
//! - [`CellValue`], [`format_number`] - Format values for display

mod cell;
mod cell_ref;
mod eval;
mod fill;
mod format;

pub use cell::{Cell, DEFAULT_COLS, DEFAULT_ROWS, Grid, Limits};
pub use cell_ref::CellRef;
pub use eval::{EvalContext, EvalError, evaluate, evaluate_cell, is_numeric, parse_literal};
pub use fill::{Axis, REF_ERROR, shift_references};
pub use format::{CellValue, format_fixed, format_number};
