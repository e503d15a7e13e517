//! Document configuration.

use minisheet_engine::engine::{DEFAULT_COLS, DEFAULT_ROWS, Limits};

/// Default history capacity (entries per stack).
pub const DEFAULT_HISTORY: usize = 1000;

/// Decimal places used for formula results in saved CSV.
pub const DEFAULT_DECIMALS: usize = 2;

/// Settings for a new document.
///
/// The binary fills this from its own config file sections.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SheetConfig {
    pub limits: Limits,
    /// Live row count of a new sheet.
    pub rows: usize,
    /// Live column count of a new sheet.
    pub cols: usize,
    /// Undo/redo capacity.
    pub history: usize,
    /// Decimal places for formula results written to CSV.
    pub decimals: usize,
}

impl Default for SheetConfig {
    fn default() -> Self {
        SheetConfig {
            limits: Limits::default(),
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            history: DEFAULT_HISTORY,
            decimals: DEFAULT_DECIMALS,
        }
    }
}
