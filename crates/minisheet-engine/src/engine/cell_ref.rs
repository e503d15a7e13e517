//! Cell reference parsing and formatting.
//!
//! Provides bidirectional conversion between spreadsheet-style cell references
//! (e.g., "A1", "B2", "AB12") and zero-indexed row/column coordinates.
//! Columns use bijective base-26 letters, so there is no zero digit:
//! `Z` is followed by `AA`, not `BA`.
//!
//! # Examples
//!
//! ```
//! use minisheet_engine::engine::CellRef;
//!
//! let cell = CellRef::from_str("B3").unwrap();
//! assert_eq!(cell.col, 1);  // 0-indexed
//! assert_eq!(cell.row, 2);
//! assert_eq!(cell.to_string(), "B3");
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

use super::cell::Limits;

static A1_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?<letters>[A-Za-z]+)(?<numbers>[0-9]+)$").expect("valid A1 regex")
});

/// A reference to a cell by row and column indices (0-indexed).
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub fn new(row: usize, col: usize) -> CellRef {
        CellRef { row, col }
    }

    /// Parse a cell reference from spreadsheet notation (e.g., "A1", "b2", "AA10").
    /// Returns None if the input is not a reference. No grid bounds are applied.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(name: &str) -> Option<CellRef> {
        Self::parse_a1(name)
    }

    /// Parse a reference and reject it when it falls outside `limits`.
    ///
    /// This is the decoding used by formula evaluation: a reference past the
    /// maximum grid size is treated the same as malformed text.
    pub fn decode(name: &str, limits: &Limits) -> Option<CellRef> {
        let cell = Self::parse_a1(name)?;
        limits.contains(&cell).then_some(cell)
    }

    fn parse_a1(name: &str) -> Option<CellRef> {
        let caps = A1_RE.captures(name)?;
        let col = Self::letters_to_col(&caps["letters"])?;
        let row = caps["numbers"].parse::<usize>().ok()?.checked_sub(1)?;
        Some(CellRef::new(row, col))
    }

    /// Convert column letters to a 0-indexed column ("A" -> 0, "AA" -> 26).
    /// Letters are case-insensitive; anything else returns None.
    pub fn letters_to_col(letters: &str) -> Option<usize> {
        if letters.is_empty() {
            return None;
        }
        let mut col_acc = 0usize;
        for c in letters.bytes() {
            if !c.is_ascii_alphabetic() {
                return None;
            }
            let digit = (c.to_ascii_uppercase() - b'A') as usize + 1;
            col_acc = col_acc.checked_mul(26)?.checked_add(digit)?;
        }
        col_acc.checked_sub(1)
    }

    /// Convert column index to spreadsheet-style letters (0 -> A, 25 -> Z, 26 -> AA).
    pub fn col_to_letters(col: usize) -> String {
        let mut result = String::new();
        let mut n = col as u128 + 1;
        while n > 0 {
            n -= 1;
            result.insert(0, (b'A' + (n % 26) as u8) as char);
            n /= 26;
        }
        result
    }
}

impl std::str::FromStr for CellRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_a1(s).ok_or_else(|| format!("Invalid cell reference: {}", s))
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", CellRef::col_to_letters(self.col), self.row + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::CellRef;
    use crate::engine::Limits;

    #[test]
    fn test_parse_a1_overflow_returns_none() {
        let huge = format!("{}1", "Z".repeat(40));
        assert!(CellRef::from_str(&huge).is_none());
    }

    #[test]
    fn test_col_to_letters_handles_max_usize() {
        let letters = CellRef::col_to_letters(usize::MAX);
        assert!(!letters.is_empty());
        assert!(letters.chars().all(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn test_decode_respects_limits() {
        let limits = Limits {
            max_rows: 10,
            max_cols: 3,
            ..Limits::default()
        };
        assert_eq!(CellRef::decode("C10", &limits), Some(CellRef::new(9, 2)));
        assert!(CellRef::decode("D1", &limits).is_none());
        assert!(CellRef::decode("A11", &limits).is_none());
    }

    #[test]
    fn test_letters_to_col_rejects_non_letters() {
        assert_eq!(CellRef::letters_to_col("ab"), Some(27));
        assert!(CellRef::letters_to_col("").is_none());
        assert!(CellRef::letters_to_col("A1").is_none());
    }
}
