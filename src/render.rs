//! Plain-text table output of the evaluated sheet.

use minisheet_core::{CellRef, Document};
use std::io::Write;

/// Print the evaluated sheet with column letters and 1-based row numbers.
///
/// Rows hidden by the document's filter are skipped; the rest keep their
/// own row numbers.
pub fn write_table<W: Write>(out: &mut W, doc: &Document) -> std::io::Result<()> {
    let rows = doc.display_rows();
    let ncols = doc.grid.ncols();
    let label_width = doc.grid.nrows().to_string().len();

    let headers: Vec<String> = (0..ncols).map(CellRef::col_to_letters).collect();
    let widths: Vec<usize> = (0..ncols)
        .map(|col| {
            rows.iter()
                .map(|(_, row)| row[col].chars().count())
                .chain(std::iter::once(headers[col].len()))
                .max()
                .unwrap_or(1)
        })
        .collect();

    let mut line = " ".repeat(label_width);
    for (header, width) in headers.iter().zip(&widths) {
        line.push_str(&format!(" {:<width$}", header, width = width));
    }
    writeln!(out, "{}", line.trim_end())?;

    for (idx, row) in &rows {
        let mut line = format!("{:>width$}", idx + 1, width = label_width);
        for (text, width) in row.iter().zip(&widths) {
            line.push_str(&format!(" {:<width$}", text, width = width));
        }
        writeln!(out, "{}", line.trim_end())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use minisheet_core::SheetConfig;

    #[test]
    fn test_table_layout() {
        let mut doc = Document::with_config(SheetConfig {
            rows: 2,
            cols: 2,
            ..SheetConfig::default()
        });
        doc.set_cell(CellRef::new(0, 0), "name");
        doc.set_cell(CellRef::new(0, 1), "=2*3");
        doc.set_cell(CellRef::new(1, 1), "=B1/4");

        let mut out = Vec::new();
        write_table(&mut out, &doc).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "  A    B\n1 name 6\n2      1.50\n");
    }

    #[test]
    fn test_filtered_table_keeps_row_numbers() {
        let mut doc = Document::with_config(SheetConfig {
            rows: 12,
            cols: 1,
            ..SheetConfig::default()
        });
        doc.set_cell(CellRef::new(2, 0), "red");
        doc.set_cell(CellRef::new(10, 0), "reddish");
        doc.set_cell(CellRef::new(11, 0), "blue");
        assert!(doc.set_filter(0, "red"));

        let mut out = Vec::new();
        write_table(&mut out, &doc).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "   A\n 3 red\n11 reddish\n");
    }
}
