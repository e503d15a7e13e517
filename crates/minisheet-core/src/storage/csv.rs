//! CSV import/export functionality
//!
//! Plain comma-split format: no quoting, one row per line.

use crate::config::SheetConfig;
use crate::error::Result;
use minisheet_engine::engine::{CellRef, EvalContext, Grid, format_fixed};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Parse CSV text into a grid sized to the data.
///
/// Rows and columns past the configured maximum are dropped. Empty input
/// yields a 1x1 sheet.
pub fn parse_csv(content: &str, config: &SheetConfig) -> Grid {
    let limits = config.limits;
    let rows: Vec<Vec<&str>> = content
        .lines()
        .take(limits.max_rows)
        .map(|line| {
            line.strip_suffix('\r')
                .unwrap_or(line)
                .split(',')
                .take(limits.max_cols)
                .collect()
        })
        .collect();

    let nrows = rows.len();
    let ncols = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut grid = Grid::with_extent(nrows, ncols, limits);
    for (row, fields) in rows.iter().enumerate() {
        for (col, field) in fields.iter().enumerate() {
            grid.set(row, col, field);
        }
    }
    tracing::debug!(
        nrows = grid.nrows(),
        ncols = grid.ncols(),
        cells = grid.occupied(),
        "parsed csv"
    );
    grid
}

/// Read a CSV file into a grid.
pub fn read_csv_file(path: &Path, config: &SheetConfig) -> Result<Grid> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_csv(&content, config))
}

/// Write every live cell as CSV.
///
/// Formula cells are written as their value with `decimals` places (or their
/// error marker); everything else is written as raw text.
pub fn write_csv<W: Write>(out: &mut W, grid: &Grid, decimals: usize) -> Result<()> {
    let mut ctx = EvalContext::new(grid);
    for row in 0..grid.nrows() {
        let fields: Vec<String> = (0..grid.ncols())
            .map(|col| {
                let raw = grid.get(row, col);
                if !raw.starts_with('=') {
                    return raw;
                }
                match ctx.evaluate_cell(CellRef::new(row, col)) {
                    Ok(n) => format_fixed(n, decimals),
                    Err(e) => e.marker().to_string(),
                }
            })
            .collect();
        writeln!(out, "{}", fields.join(","))?;
    }
    Ok(())
}

/// Write a grid to a CSV file, replacing it.
pub fn write_csv_file(path: &Path, grid: &Grid, decimals: usize) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_csv(&mut out, grid, decimals)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use minisheet_engine::engine::Limits;

    fn to_string(grid: &Grid) -> String {
        let mut out = Vec::new();
        write_csv(&mut out, grid, 2).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_sizes_to_data() {
        let grid = parse_csv("a,b,c\n1\n,,x\n", &SheetConfig::default());
        assert_eq!(grid.nrows(), 3);
        assert_eq!(grid.ncols(), 3);
        assert_eq!(grid.get(0, 2), "c");
        assert_eq!(grid.get(1, 0), "1");
        assert_eq!(grid.get(1, 1), "");
        assert_eq!(grid.get(2, 2), "x");
    }

    #[test]
    fn test_parse_strips_carriage_return() {
        let grid = parse_csv("a,b\r\nc,d\r\n", &SheetConfig::default());
        assert_eq!(grid.get(0, 1), "b");
        assert_eq!(grid.get(1, 1), "d");
    }

    #[test]
    fn test_parse_empty_source() {
        let grid = parse_csv("", &SheetConfig::default());
        assert_eq!(grid.nrows(), 1);
        assert_eq!(grid.ncols(), 1);
        assert_eq!(grid.occupied(), 0);
    }

    #[test]
    fn test_parse_respects_limits() {
        let config = SheetConfig {
            limits: Limits {
                max_rows: 2,
                max_cols: 2,
                max_cell_len: 3,
                ..Limits::default()
            },
            ..SheetConfig::default()
        };
        let grid = parse_csv("abcdef,b,c\nd,e\nf\n", &config);
        assert_eq!(grid.nrows(), 2);
        assert_eq!(grid.ncols(), 2);
        assert_eq!(grid.get(0, 0), "abc");
        assert_eq!(grid.get(1, 1), "e");
    }

    #[test]
    fn test_write_evaluates_formulas() {
        let grid = parse_csv("1,2,=A1+B1\nname,,=C1/4\n", &SheetConfig::default());
        assert_eq!(to_string(&grid), "1,2,3.00\nname,,0.75\n");
    }

    #[test]
    fn test_write_error_marker() {
        let grid = parse_csv("=B1,=A1\n", &SheetConfig::default());
        assert_eq!(to_string(&grid), "#CYCLE!,#CYCLE!\n");
    }

    #[test]
    fn test_round_trip_keeps_text() {
        let original = "id,name,score\n1,ann,9.5\n2,bob,=C2+1\n";
        let grid = parse_csv(original, &SheetConfig::default());
        let saved = to_string(&grid);
        assert_eq!(saved, "id,name,score\n1,ann,9.5\n2,bob,10.50\n");

        let reloaded = parse_csv(&saved, &SheetConfig::default());
        assert_eq!(reloaded.get(2, 2), "10.50");
        assert_eq!(reloaded.get(1, 1), "ann");
    }
}
