//! Cell data structures for the spreadsheet grid.
//!
//! This module provides the core data types for representing cells:
//! - [`Cell`] - Raw text as the user typed it (formula cells start with `=`)
//! - [`Limits`] - Maximum grid extent, cell length and evaluation depth
//! - [`Grid`] - Sparse cell storage (backed by `DashMap`) with a live extent

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use super::cell_ref::CellRef;

/// Default live extent of a fresh sheet.
pub const DEFAULT_ROWS: usize = 10;
pub const DEFAULT_COLS: usize = 5;

/// A cell in the spreadsheet grid.
///
/// Only the raw text is stored. Evaluated values belong to an evaluation pass
/// (see [`super::EvalContext`]) and never outlive it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub raw: String,
}

impl Cell {
    pub fn new(raw: &str) -> Cell {
        Cell {
            raw: raw.to_string(),
        }
    }

    /// A formula cell is one whose raw text begins with `=`.
    pub fn is_formula(&self) -> bool {
        self.raw.starts_with('=')
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

/// Fixed upper bounds for a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Limits {
    pub max_rows: usize,
    pub max_cols: usize,
    /// Maximum raw text length in bytes; longer input is truncated.
    pub max_cell_len: usize,
    /// Maximum nesting of parentheses and reference chains in one evaluation.
    /// Unset means one level per cell of the largest grid (see [`Limits::eval_depth`]).
    pub max_eval_depth: Option<usize>,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_rows: 1000,
            max_cols: 1000,
            max_cell_len: 256,
            max_eval_depth: None,
        }
    }
}

impl Limits {
    /// Whether a reference lies inside the maximum grid bounds.
    pub fn contains(&self, cell_ref: &CellRef) -> bool {
        cell_ref.row < self.max_rows && cell_ref.col < self.max_cols
    }

    /// Effective evaluation depth bound.
    ///
    /// A reference chain can visit every cell at most once, so the default is
    /// the cell count of the largest grid.
    pub fn eval_depth(&self) -> usize {
        self.max_eval_depth
            .unwrap_or_else(|| self.max_rows.saturating_mul(self.max_cols))
            .max(1)
    }

    /// Cut `text` to at most `max_cell_len` bytes on a character boundary.
    pub fn clamp_text<'a>(&self, text: &'a str) -> &'a str {
        if text.len() <= self.max_cell_len {
            return text;
        }
        let mut end = self.max_cell_len;
        while end > 0 && !text.is_char_boundary(end) {
            end -= 1;
        }
        &text[..end]
    }
}

/// Sparse grid storage with a live row/column extent.
///
/// Cells outside `nrows` x `ncols` are implicitly empty: reads return empty
/// text and writes are ignored.
#[derive(Debug)]
pub struct Grid {
    cells: DashMap<CellRef, Cell>,
    nrows: usize,
    ncols: usize,
    limits: Limits,
}

impl Grid {
    /// Create an empty grid with the default live extent.
    pub fn new(limits: Limits) -> Grid {
        Grid::with_extent(DEFAULT_ROWS, DEFAULT_COLS, limits)
    }

    /// Create an empty grid with the given live extent, clamped to `1..=max`.
    pub fn with_extent(nrows: usize, ncols: usize, limits: Limits) -> Grid {
        Grid {
            cells: DashMap::new(),
            nrows: nrows.clamp(1, limits.max_rows.max(1)),
            ncols: ncols.clamp(1, limits.max_cols.max(1)),
            limits,
        }
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Whether `(row, col)` is inside the live extent.
    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.nrows && col < self.ncols
    }

    /// Raw text at `(row, col)`, or empty text when out of range or unset.
    pub fn get(&self, row: usize, col: usize) -> String {
        if !self.in_bounds(row, col) {
            return String::new();
        }
        self.cells
            .get(&CellRef::new(row, col))
            .map(|cell| cell.raw.clone())
            .unwrap_or_default()
    }

    pub fn get_ref(&self, cell_ref: &CellRef) -> String {
        self.get(cell_ref.row, cell_ref.col)
    }

    /// Whether the cell at `(row, col)` holds a formula.
    pub fn is_formula(&self, row: usize, col: usize) -> bool {
        self.in_bounds(row, col)
            && self
                .cells
                .get(&CellRef::new(row, col))
                .is_some_and(|cell| cell.is_formula())
    }

    /// Write raw text at `(row, col)`.
    ///
    /// Out-of-range writes are ignored and return false. Empty text removes the
    /// cell. Text longer than the cell limit is truncated.
    pub fn set(&mut self, row: usize, col: usize, text: &str) -> bool {
        if !self.in_bounds(row, col) {
            tracing::trace!(row, col, "ignoring write outside live extent");
            return false;
        }
        let cell_ref = CellRef::new(row, col);
        let clamped = self.limits.clamp_text(text);
        if clamped.len() < text.len() {
            tracing::warn!(cell = %cell_ref, len = text.len(), "truncating cell text");
        }
        if clamped.is_empty() {
            self.cells.remove(&cell_ref);
        } else {
            self.cells.insert(cell_ref, Cell::new(clamped));
        }
        true
    }

    pub fn set_ref(&mut self, cell_ref: &CellRef, text: &str) -> bool {
        self.set(cell_ref.row, cell_ref.col, text)
    }

    /// Change the live row count, clamped to `1..=max_rows`.
    /// Cells beyond a shrunk extent are dropped.
    pub fn resize_rows(&mut self, n: usize) {
        self.nrows = n.clamp(1, self.limits.max_rows.max(1));
        let nrows = self.nrows;
        self.cells.retain(|cell_ref, _| cell_ref.row < nrows);
    }

    /// Change the live column count, clamped to `1..=max_cols`.
    /// Cells beyond a shrunk extent are dropped.
    pub fn resize_cols(&mut self, n: usize) {
        self.ncols = n.clamp(1, self.limits.max_cols.max(1));
        let ncols = self.ncols;
        self.cells.retain(|cell_ref, _| cell_ref.col < ncols);
    }

    /// Number of non-empty cells.
    pub fn occupied(&self) -> usize {
        self.cells.len()
    }

    /// Snapshot of all non-empty cells, sorted by row then column.
    pub fn cells(&self) -> Vec<(CellRef, Cell)> {
        let mut cells: Vec<(CellRef, Cell)> = self
            .cells
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        cells.sort_by_key(|(cell_ref, _)| *cell_ref);
        cells
    }

    /// Remove every cell and return them, keeping the extent.
    ///
    /// Structural edits drain the grid, remap coordinates and refill it.
    pub fn drain(&mut self) -> Vec<(CellRef, Cell)> {
        let cells = self.cells();
        self.cells.clear();
        cells
    }

    fn put(&mut self, cell_ref: CellRef, cell: Cell) {
        if !cell.is_empty() {
            self.cells.insert(cell_ref, cell);
        }
    }

    /// Replace the whole contents and extent.
    pub fn refill(&mut self, nrows: usize, ncols: usize, cells: Vec<(CellRef, Cell)>) {
        self.cells.clear();
        self.nrows = nrows.clamp(1, self.limits.max_rows.max(1));
        self.ncols = ncols.clamp(1, self.limits.max_cols.max(1));
        for (cell_ref, cell) in cells {
            if cell_ref.row < self.nrows && cell_ref.col < self.ncols {
                self.put(cell_ref, cell);
            }
        }
    }
}

impl Default for Grid {
    fn default() -> Self {
        Grid::new(Limits::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_is_forgiving() {
        let mut grid = Grid::with_extent(2, 2, Limits::default());
        assert!(!grid.set(5, 0, "x"));
        assert_eq!(grid.get(5, 0), "");
        assert_eq!(grid.occupied(), 0);
    }

    #[test]
    fn test_empty_text_removes_cell() {
        let mut grid = Grid::default();
        grid.set(0, 0, "hello");
        assert_eq!(grid.occupied(), 1);
        grid.set(0, 0, "");
        assert_eq!(grid.occupied(), 0);
    }

    #[test]
    fn test_resize_drops_cells_beyond_extent() {
        let mut grid = Grid::with_extent(3, 3, Limits::default());
        grid.set(2, 2, "corner");
        grid.set(0, 0, "origin");
        grid.resize_rows(2);
        assert_eq!(grid.nrows(), 2);
        grid.resize_rows(3);
        assert_eq!(grid.get(2, 2), "");
        assert_eq!(grid.get(0, 0), "origin");
    }

    #[test]
    fn test_resize_clamps_to_limits() {
        let limits = Limits {
            max_rows: 4,
            max_cols: 4,
            ..Limits::default()
        };
        let mut grid = Grid::new(limits);
        assert_eq!(grid.nrows(), 4);
        grid.resize_cols(0);
        assert_eq!(grid.ncols(), 1);
    }

    #[test]
    fn test_eval_depth_defaults_to_cell_count() {
        assert_eq!(Limits::default().eval_depth(), 1_000_000);
        let small = Limits {
            max_rows: 30,
            max_cols: 4,
            ..Limits::default()
        };
        assert_eq!(small.eval_depth(), 120);
        let explicit = Limits {
            max_eval_depth: Some(16),
            ..Limits::default()
        };
        assert_eq!(explicit.eval_depth(), 16);
    }

    #[test]
    fn test_set_truncates_on_char_boundary() {
        let limits = Limits {
            max_cell_len: 4,
            ..Limits::default()
        };
        let mut grid = Grid::new(limits);
        grid.set(0, 0, "abcdef");
        assert_eq!(grid.get(0, 0), "abcd");
        grid.set(0, 1, "aé€");
        assert_eq!(grid.get(0, 1), "aé");
    }
}
