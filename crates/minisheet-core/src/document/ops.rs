use super::Document;
use super::history::Action;
use minisheet_engine::engine::{Axis, Cell, CellRef, Grid, Limits, shift_references};

/// Dimension for row/column operations
#[derive(Copy, Clone, Debug)]
enum Dimension {
    Row,
    Column,
}

impl Dimension {
    /// Get the coordinate value from a CellRef for this dimension
    fn get_coord(&self, cell_ref: &CellRef) -> usize {
        match self {
            Dimension::Row => cell_ref.row,
            Dimension::Column => cell_ref.col,
        }
    }

    /// Create a new CellRef with modified coordinate in this dimension
    fn new_cell_ref(&self, cell_ref: &CellRef, new_coord: usize) -> CellRef {
        match self {
            Dimension::Row => CellRef::new(new_coord, cell_ref.col),
            Dimension::Column => CellRef::new(cell_ref.row, new_coord),
        }
    }

    /// Live row or column count
    fn extent(&self, grid: &Grid) -> usize {
        match self {
            Dimension::Row => grid.nrows(),
            Dimension::Column => grid.ncols(),
        }
    }

    fn max(&self, limits: &Limits) -> usize {
        match self {
            Dimension::Row => limits.max_rows,
            Dimension::Column => limits.max_cols,
        }
    }

    /// Grid extent after changing this dimension to `extent`
    fn resized(&self, grid: &Grid, extent: usize) -> (usize, usize) {
        match self {
            Dimension::Row => (extent, grid.ncols()),
            Dimension::Column => (grid.nrows(), extent),
        }
    }
}

impl From<Axis> for Dimension {
    fn from(axis: Axis) -> Self {
        match axis {
            Axis::Vertical => Dimension::Row,
            Axis::Horizontal => Dimension::Column,
        }
    }
}

impl Document {
    /// Raw text of a cell (empty when unset or out of range).
    pub fn cell_raw(&self, cell_ref: &CellRef) -> String {
        self.grid.get_ref(cell_ref)
    }

    /// Set cell text, recording the change for undo.
    ///
    /// Returns false (and changes nothing) when the cell is outside the sheet.
    pub fn set_cell(&mut self, cell_ref: CellRef, text: &str) -> bool {
        if !self.grid.in_bounds(cell_ref.row, cell_ref.col) {
            return false;
        }
        let old_text = self.grid.get_ref(&cell_ref);
        self.grid.set_ref(&cell_ref, text);
        // Read back: the grid may have truncated the text.
        let new_text = self.grid.get_ref(&cell_ref);
        if old_text != new_text {
            self.history.record(cell_ref, &old_text, &new_text);
            self.modified = true;
        }
        true
    }

    /// Clear the specified cell
    pub fn clear_cell(&mut self, cell_ref: CellRef) -> bool {
        self.set_cell(cell_ref, "")
    }

    /// Generic insert operation for row or column
    fn insert_dimension(&mut self, dim: Dimension, at: usize) -> bool {
        let extent = dim.extent(&self.grid);
        if extent >= dim.max(self.grid.limits()) || at > extent {
            tracing::debug!(?dim, at, extent, "insert ignored");
            return false;
        }

        let moved: Vec<(CellRef, Cell)> = self
            .grid
            .drain()
            .into_iter()
            .map(|(cell_ref, cell)| {
                let coord = dim.get_coord(&cell_ref);
                if coord >= at {
                    (dim.new_cell_ref(&cell_ref, coord + 1), cell)
                } else {
                    (cell_ref, cell)
                }
            })
            .collect();

        let (nrows, ncols) = dim.resized(&self.grid, extent + 1);
        self.grid.refill(nrows, ncols, moved);
        self.after_structural_edit(dim, at, "insert");
        true
    }

    /// Generic delete operation for row or column
    fn delete_dimension(&mut self, dim: Dimension, at: usize) -> bool {
        let extent = dim.extent(&self.grid);
        if extent <= 1 || at >= extent {
            tracing::debug!(?dim, at, extent, "delete ignored");
            return false;
        }

        let moved: Vec<(CellRef, Cell)> = self
            .grid
            .drain()
            .into_iter()
            .filter(|(cell_ref, _)| dim.get_coord(cell_ref) != at)
            .map(|(cell_ref, cell)| {
                let coord = dim.get_coord(&cell_ref);
                if coord > at {
                    (dim.new_cell_ref(&cell_ref, coord - 1), cell)
                } else {
                    (cell_ref, cell)
                }
            })
            .collect();

        let (nrows, ncols) = dim.resized(&self.grid, extent - 1);
        self.grid.refill(nrows, ncols, moved);
        self.after_structural_edit(dim, at, "delete");
        true
    }

    /// Generic duplicate operation: copy `at` into a new row/column after it
    fn duplicate_dimension(&mut self, dim: Dimension, at: usize) -> bool {
        let extent = dim.extent(&self.grid);
        if extent >= dim.max(self.grid.limits()) || at >= extent {
            tracing::debug!(?dim, at, extent, "duplicate ignored");
            return false;
        }

        let mut moved = Vec::new();
        for (cell_ref, cell) in self.grid.drain() {
            let coord = dim.get_coord(&cell_ref);
            if coord > at {
                moved.push((dim.new_cell_ref(&cell_ref, coord + 1), cell));
            } else {
                if coord == at {
                    moved.push((dim.new_cell_ref(&cell_ref, at + 1), cell.clone()));
                }
                moved.push((cell_ref, cell));
            }
        }

        let (nrows, ncols) = dim.resized(&self.grid, extent + 1);
        self.grid.refill(nrows, ncols, moved);
        self.after_structural_edit(dim, at, "duplicate");
        true
    }

    /// Structural edits move cells, so recorded coordinates no longer point at
    /// the cells they were recorded for.
    fn after_structural_edit(&mut self, dim: Dimension, at: usize, op: &str) {
        self.history.clear();
        self.modified = true;
        if self
            .filter
            .as_ref()
            .is_some_and(|filter| filter.col >= self.grid.ncols())
        {
            self.filter = None;
        }
        tracing::debug!(
            op,
            ?dim,
            at,
            nrows = self.grid.nrows(),
            ncols = self.grid.ncols(),
            "structural edit"
        );
    }

    /// Insert an empty row at `at_row`, shifting later rows down
    pub fn insert_row(&mut self, at_row: usize) -> bool {
        self.insert_dimension(Dimension::Row, at_row)
    }

    /// Delete the specified row
    pub fn delete_row(&mut self, at_row: usize) -> bool {
        self.delete_dimension(Dimension::Row, at_row)
    }

    /// Insert an empty column at `at_col`, shifting later columns right
    pub fn insert_col(&mut self, at_col: usize) -> bool {
        self.insert_dimension(Dimension::Column, at_col)
    }

    /// Delete the specified column
    pub fn delete_col(&mut self, at_col: usize) -> bool {
        self.delete_dimension(Dimension::Column, at_col)
    }

    /// Insert a copy of `at_row` directly below it
    pub fn duplicate_row(&mut self, at_row: usize) -> bool {
        self.duplicate_dimension(Dimension::Row, at_row)
    }

    /// Insert a copy of `at_col` directly right of it
    pub fn duplicate_col(&mut self, at_col: usize) -> bool {
        self.duplicate_dimension(Dimension::Column, at_col)
    }

    /// Fill the formula at `base` into every other row (vertical) or column
    /// (horizontal) of the sheet, shifting its references by the offset from
    /// `base`. The whole fill is one undo step.
    ///
    /// Returns the number of cells written; 0 when `base` is not a formula.
    pub fn propagate_formula(&mut self, base: CellRef, axis: Axis) -> usize {
        let base_text = self.grid.get_ref(&base);
        if !base_text.starts_with('=') {
            return 0;
        }

        let dim = Dimension::from(axis);
        let base_coord = dim.get_coord(&base);
        let mut actions = Vec::new();
        for coord in 0..dim.extent(&self.grid) {
            if coord == base_coord {
                continue;
            }
            let delta = coord as isize - base_coord as isize;
            let target = dim.new_cell_ref(&base, coord);
            let old_text = self.grid.get_ref(&target);
            self.grid
                .set_ref(&target, &shift_references(&base_text, axis, delta));
            let new_text = self.grid.get_ref(&target);
            actions.push(Action::new(target, &old_text, &new_text));
        }

        let written = actions.len();
        if written > 0 {
            self.history.record_batch(actions);
            self.modified = true;
        }
        tracing::debug!(base = %base, ?axis, written, "propagated formula");
        written
    }

    /// Undo the last change. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let done = self.history.undo(&mut self.grid);
        if done {
            self.modified = true;
        }
        done
    }

    /// Redo the last undone change. Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let done = self.history.redo(&mut self.grid);
        if done {
            self.modified = true;
        }
        done
    }
}
