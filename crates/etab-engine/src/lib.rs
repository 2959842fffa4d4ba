//! etab_engine - Spreadsheet engine: cell references, arithmetic formulas,
//! cycle detection and conditional formatting.

pub mod engine;

#[cfg(test)]
mod tests {
    use crate::engine::*;

    #[test]
    fn test_from_str_single_letter_columns() {
        let a1 = CellRef::from_str("A1").unwrap();
        assert_eq!(a1.row, 0);
        assert_eq!(a1.col, 0);

        let b1 = CellRef::from_str("B1").unwrap();
        assert_eq!(b1.row, 0);
        assert_eq!(b1.col, 1);

        let z1 = CellRef::from_str("Z1").unwrap();
        assert_eq!(z1, CellRef::new(0, 25));
    }

    #[test]
    fn test_from_str_multi_letter_columns() {
        assert_eq!(CellRef::from_str("AA1"), Some(CellRef::new(0, 26)));
        assert_eq!(CellRef::from_str("AB1").unwrap().col, 27);
        assert_eq!(CellRef::from_str("AZ1").unwrap().col, 51);
        assert_eq!(CellRef::from_str("BA1").unwrap().col, 52);
        assert_eq!(CellRef::from_str("AB12"), Some(CellRef::new(11, 27)));
    }

    #[test]
    fn test_from_str_row_numbers() {
        assert_eq!(CellRef::from_str("A1").unwrap().row, 0);
        assert_eq!(CellRef::from_str("A10").unwrap().row, 9);
        assert_eq!(CellRef::from_str("A100").unwrap().row, 99);
    }

    #[test]
    fn test_from_str_case_insensitive() {
        let lower = CellRef::from_str("a1").unwrap();
        assert_eq!(lower, CellRef::new(0, 0));

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
        assert!(CellRef::from_str("A-1").is_none());
    }

    #[test]
    fn test_display_encodes_letters() {
        assert_eq!(CellRef::new(0, 0).to_string(), "A1");
        assert_eq!(CellRef::new(11, 27).to_string(), "AB12");
        assert_eq!(CellRef::new(0, 701).to_string(), "ZZ1");
        assert_eq!(CellRef::new(0, 702).to_string(), "AAA1");
    }

    #[test]
    fn test_formula_over_grid_then_style() {
        let mut grid = Grid::new(10, 10);
        grid.insert(CellRef::new(0, 0), Cell::new_text("120"));
        grid.insert(CellRef::new(0, 1), Cell::new_text("-30"));

        let ctx = EvalContext::new(&grid, "₺");
        let total = evaluate("A1+B1", &ctx).unwrap();
        assert_eq!(total, 90.0);
        assert_eq!(format_number(total), "90");
        assert_eq!(classify(Some(total)).background, Background::Neutral);

        let doubled = evaluate("A1*2", &ctx).unwrap();
        assert_eq!(classify(Some(doubled)).background, Background::Positive);
    }

    #[test]
    fn test_extract_dependencies_multiple() {
        let deps = extract_dependencies("A1 + B1 + C2");
        assert_eq!(
            deps,
            vec![CellRef::new(0, 0), CellRef::new(0, 1), CellRef::new(1, 2)]
        );
    }

    #[test]
    fn test_extract_dependencies_duplicates() {
        assert_eq!(extract_dependencies("A1 + A1").len(), 2);
    }

    #[test]
    fn test_extract_dependencies_empty() {
        assert!(extract_dependencies("").is_empty());
        assert!(extract_dependencies("10 + 20").is_empty());
    }
}
