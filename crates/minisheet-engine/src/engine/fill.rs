//! Relative reference rewriting for formula fill.
//!
//! Filling a formula down a column copies it into every other row and shifts
//! the row numeral of each reference by the distance from the base cell:
//! `=A1+B1` filled from row 1 into row 3 becomes `=A3+B3`. Filling across a
//! row shifts the column letters instead. The rewrite is textual: anything
//! that is not an uppercase letter run followed by digits is copied verbatim,
//! and the result is not validated. A row shifted above row 1 keeps its
//! signed numeral (`=A1+5` moved up two rows is `=A-1+5`), which the
//! evaluator reads as an unresolvable reference.

use regex::{Captures, Regex};
use std::sync::LazyLock;

use super::cell_ref::CellRef;

static REF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z]+)([0-9]+)").expect("valid reference regex"));

/// Written in place of a reference shifted left of column A, which has no
/// letter spelling.
pub const REF_ERROR: &str = "#REF!";

/// Direction of a fill.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Fill down/up a column; row numerals shift.
    Vertical,
    /// Fill across a row; column letters shift.
    Horizontal,
}

/// Shift every reference in `formula` by `delta` rows or columns.
pub fn shift_references(formula: &str, axis: Axis, delta: isize) -> String {
    if delta == 0 {
        return formula.to_string();
    }
    REF_RE
        .replace_all(formula, |caps: &Captures| {
            let letters = &caps[1];
            let digits = &caps[2];
            match axis {
                Axis::Vertical => shift_row(letters, digits, delta),
                Axis::Horizontal => shift_col(letters, digits, delta),
            }
        })
        .into_owned()
}

fn shift_row(letters: &str, digits: &str, delta: isize) -> String {
    let Ok(row) = digits.parse::<isize>() else {
        return format!("{}{}", letters, digits);
    };
    match row.checked_add(delta) {
        Some(new_row) => format!("{}{}", letters, new_row),
        None => format!("{}{}", letters, digits),
    }
}

fn shift_col(letters: &str, digits: &str, delta: isize) -> String {
    let Some(col) = CellRef::letters_to_col(letters).and_then(|c| isize::try_from(c).ok()) else {
        return format!("{}{}", letters, digits);
    };
    match col.checked_add(delta) {
        Some(new_col) if new_col >= 0 => {
            format!("{}{}", CellRef::col_to_letters(new_col as usize), digits)
        }
        _ => REF_ERROR.to_string(),
    }
}
