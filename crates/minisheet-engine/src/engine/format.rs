use super::eval::EvalError;

/// What a cell shows once evaluated.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Error(EvalError),
}

impl CellValue {
    /// Display string for the cell (numbers via [`format_number`]).
    pub fn display(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Error(e) => e.marker().to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, CellValue::Error(_))
    }
}

/// Format a number for display.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "#NAN!".to_string()
    } else if n.is_infinite() {
        "#INF!".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e10 {
        format!("{:.0}", n)
    } else {
        format!("{:.2}", n)
    }
}

/// Format a number with exactly `decimals` places, as written to CSV.
pub fn format_fixed(n: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::CellRef;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(-0.5), "-0.50");
        assert_eq!(format_number(f64::INFINITY), "#INF!");
        assert_eq!(format_number(f64::NAN), "#NAN!");
    }

    #[test]
    fn test_format_fixed() {
        assert_eq!(format_fixed(8.0, 2), "8.00");
        assert_eq!(format_fixed(1.0 / 3.0, 3), "0.333");
        assert_eq!(format_fixed(2.4, 0), "2");
    }

    #[test]
    fn test_error_display_uses_marker() {
        let value = CellValue::Error(EvalError::Cycle(CellRef::new(0, 0)));
        assert_eq!(value.display(), "#CYCLE!");
        assert!(value.is_error());
    }
}
