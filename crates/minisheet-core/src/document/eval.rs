use super::Document;
use minisheet_engine::engine::{CellRef, CellValue, EvalContext, EvalError};

impl Document {
    /// Classified, evaluated value of a cell.
    pub fn cell_value(&self, cell_ref: &CellRef) -> CellValue {
        EvalContext::new(&self.grid).value_of(*cell_ref)
    }

    /// Display text of a cell: evaluated number, text, or error marker.
    pub fn cell_display(&self, cell_ref: &CellRef) -> String {
        self.cell_value(cell_ref).display()
    }

    /// Evaluate a one-off formula (or number literal) against the sheet.
    pub fn evaluate(&self, raw: &str) -> Result<f64, EvalError> {
        EvalContext::new(&self.grid).evaluate(raw)
    }

    pub fn evaluate_cell(&self, cell_ref: &CellRef) -> Result<f64, EvalError> {
        EvalContext::new(&self.grid).evaluate_cell(*cell_ref)
    }

    /// Display text for every visible row, paired with its row index.
    /// All rows share one evaluation pass.
    pub fn display_rows(&self) -> Vec<(usize, Vec<String>)> {
        let mut ctx = EvalContext::new(&self.grid);
        self.visible_rows()
            .into_iter()
            .map(|row| {
                let cells = (0..self.grid.ncols())
                    .map(|col| ctx.value_of(CellRef::new(row, col)).display())
                    .collect();
                (row, cells)
            })
            .collect()
    }
}
