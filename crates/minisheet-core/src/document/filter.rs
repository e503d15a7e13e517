//! Row filter: show only rows whose raw text in one column contains a needle.

use super::Document;

/// Active row filter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowFilter {
    pub col: usize,
    pub needle: String,
}

impl Document {
    /// Rows whose raw text in `col` contains `needle` (case-sensitive).
    ///
    /// Formulas are matched by their text, not their value. An empty needle
    /// matches every row.
    pub fn matching_rows(&self, col: usize, needle: &str) -> Vec<usize> {
        (0..self.grid.nrows())
            .filter(|&row| self.grid.get(row, col).contains(needle))
            .collect()
    }

    /// Start filtering rows on `col`. Returns false when `col` is outside the sheet.
    pub fn set_filter(&mut self, col: usize, needle: &str) -> bool {
        if col >= self.grid.ncols() {
            return false;
        }
        self.filter = Some(RowFilter {
            col,
            needle: needle.to_string(),
        });
        tracing::debug!(col, needle, "filter set");
        true
    }

    /// Drop the active filter. Returns false when none was set.
    pub fn clear_filter(&mut self) -> bool {
        self.filter.take().is_some()
    }

    /// Rows to show: the filter's matches, or every live row.
    pub fn visible_rows(&self) -> Vec<usize> {
        match &self.filter {
            Some(filter) => self.matching_rows(filter.col, &filter.needle),
            None => (0..self.grid.nrows()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SheetConfig;
    use minisheet_engine::engine::CellRef;

    fn doc_with_names() -> Document {
        let mut doc = Document::with_config(SheetConfig {
            rows: 4,
            cols: 2,
            ..SheetConfig::default()
        });
        for (row, name) in ["apple", "banana", "grape", "Apple pie"].iter().enumerate() {
            doc.set_cell(CellRef::new(row, 0), name);
        }
        doc.set_cell(CellRef::new(1, 1), "=2+3");
        doc
    }

    #[test]
    fn test_matching_rows_is_substring_and_case_sensitive() {
        let doc = doc_with_names();
        assert_eq!(doc.matching_rows(0, "ap"), vec![0, 2]);
        assert_eq!(doc.matching_rows(0, "Apple"), vec![3]);
        assert_eq!(doc.matching_rows(0, "kiwi"), Vec::<usize>::new());
        assert_eq!(doc.matching_rows(0, ""), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_matching_rows_reads_raw_formula_text() {
        let doc = doc_with_names();
        assert_eq!(doc.matching_rows(1, "+"), vec![1]);
        assert_eq!(doc.matching_rows(1, "5"), Vec::<usize>::new());
    }

    #[test]
    fn test_visible_rows_follow_filter() {
        let mut doc = doc_with_names();
        assert_eq!(doc.visible_rows(), vec![0, 1, 2, 3]);

        assert!(doc.set_filter(0, "an"));
        assert_eq!(doc.visible_rows(), vec![1]);

        // Edits are picked up on the next query.
        doc.set_cell(CellRef::new(2, 0), "mango");
        assert_eq!(doc.visible_rows(), vec![1, 2]);

        assert!(doc.clear_filter());
        assert!(!doc.clear_filter());
        assert_eq!(doc.visible_rows().len(), 4);
    }

    #[test]
    fn test_filter_column_must_exist() {
        let mut doc = doc_with_names();
        assert!(!doc.set_filter(2, "x"));
        assert_eq!(doc.filter, None);
    }
}
