//! minisheet_engine - Spreadsheet grid, A1 references and formula evaluation.

pub mod engine;

#[cfg(test)]
mod tests {
    use crate::engine::*;

    fn set(grid: &mut Grid, name: &str, raw: &str) {
        let cell_ref = CellRef::from_str(name).unwrap();
        assert!(grid.set_ref(&cell_ref, raw), "{} outside extent", name);
    }

    #[test]
    fn test_from_str_single_letter_columns() {
        let a1 = CellRef::from_str("A1").unwrap();
        assert_eq!(a1.row, 0);
        assert_eq!(a1.col, 0);

        let b1 = CellRef::from_str("B1").unwrap();
        assert_eq!(b1.row, 0);
        assert_eq!(b1.col, 1);

        let z1 = CellRef::from_str("Z1").unwrap();
        assert_eq!(z1.row, 0);
        assert_eq!(z1.col, 25);
    }

    #[test]
    fn test_from_str_multi_letter_columns() {
        let aa1 = CellRef::from_str("AA1").unwrap();
        assert_eq!(aa1.col, 26);

        let ab12 = CellRef::from_str("AB12").unwrap();
        assert_eq!(ab12.col, 27);
        assert_eq!(ab12.row, 11);

        let az1 = CellRef::from_str("AZ1").unwrap();
        assert_eq!(az1.col, 51);

        let ba1 = CellRef::from_str("BA1").unwrap();
        assert_eq!(ba1.col, 52);
    }

    #[test]
    fn test_from_str_case_insensitive() {
        let lower = CellRef::from_str("a1").unwrap();
        assert_eq!(lower.row, 0);
        assert_eq!(lower.col, 0);

        let mixed = CellRef::from_str("aA1").unwrap();
        assert_eq!(mixed.col, 26);
    }

    #[test]
    fn test_from_str_invalid_inputs() {
        assert!(CellRef::from_str("").is_none());
        assert!(CellRef::from_str("123").is_none());
        assert!(CellRef::from_str("ABC").is_none());
        assert!(CellRef::from_str("A0").is_none());
        assert!(CellRef::from_str("1A").is_none());
        assert!(CellRef::from_str("A 1").is_none());
        assert!(CellRef::from_str("A1B").is_none());
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let limits = Limits::default();
        for row in 0..26 {
            for col in 0..26 {
                let cell_ref = CellRef::new(row, col);
                let text = cell_ref.to_string();
                assert_eq!(CellRef::decode(&text, &limits), Some(cell_ref));
            }
        }
    }

    #[test]
    fn test_encode_bijective_columns() {
        assert_eq!(CellRef::new(0, 25).to_string(), "Z1");
        assert_eq!(CellRef::new(0, 26).to_string(), "AA1");
        assert_eq!(CellRef::new(11, 27).to_string(), "AB12");
        assert_eq!(CellRef::new(0, 701).to_string(), "ZZ1");
        assert_eq!(CellRef::new(0, 702).to_string(), "AAA1");
    }

    #[test]
    fn test_left_to_right_without_precedence() {
        let grid = Grid::default();
        assert_eq!(evaluate("=2+3*4", &grid), Ok(20.0));
        assert_eq!(evaluate("=10-4/2", &grid), Ok(3.0));
        assert_eq!(evaluate("=2+(3*4)", &grid), Ok(14.0));
    }

    #[test]
    fn test_reference_chain() {
        let mut grid = Grid::default();
        set(&mut grid, "A1", "5");
        set(&mut grid, "A2", "=A1+3");
        assert_eq!(evaluate("=A2", &grid), Ok(8.0));
    }

    #[test]
    fn test_two_cell_cycle_reports_error() {
        let mut grid = Grid::default();
        set(&mut grid, "A1", "=B1");
        set(&mut grid, "B1", "=A1");
        let result = evaluate("=A1", &grid);
        assert!(matches!(result, Err(EvalError::Cycle(_))));

        let mut ctx = EvalContext::new(&grid);
        let value = ctx.value_of(CellRef::new(0, 0));
        assert!(value.is_error());
        assert_eq!(value.display(), "#CYCLE!");
    }

    #[test]
    fn test_cycle_does_not_poison_other_cells() {
        let mut grid = Grid::default();
        set(&mut grid, "A1", "=B1");
        set(&mut grid, "B1", "=A1");
        set(&mut grid, "C1", "2");
        set(&mut grid, "C2", "=C1*C1");

        let mut ctx = EvalContext::new(&grid);
        assert!(ctx.value_of(CellRef::new(0, 0)).is_error());
        assert_eq!(ctx.value_of(CellRef::new(1, 2)), CellValue::Number(4.0));
    }

    #[test]
    fn test_reference_outside_live_extent_is_empty() {
        let mut grid = Grid::with_extent(2, 2, Limits::default());
        set(&mut grid, "A1", "=Z99+1");
        assert_eq!(evaluate_cell(&grid, CellRef::new(0, 0)), Ok(1.0));
    }

    #[test]
    fn test_fill_then_evaluate() {
        let mut grid = Grid::default();
        set(&mut grid, "A1", "1");
        set(&mut grid, "A2", "2");
        set(&mut grid, "A3", "3");
        set(&mut grid, "B1", "=A1*10");
        let filled = shift_references(&grid.get(0, 1), Axis::Vertical, 2);
        assert_eq!(filled, "=A3*10");
        set(&mut grid, "B3", &filled);
        assert_eq!(evaluate_cell(&grid, CellRef::new(2, 1)), Ok(30.0));
    }
}
