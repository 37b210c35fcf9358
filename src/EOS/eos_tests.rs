#[cfg(test)]
mod tests {
    use super::super::eos_interpolation::*;
    use super::super::eos_loader::*;
    use crate::star_config::MEV_FM3_TO_KM2;
    use crate::star_error::StarError;
    use approx::assert_relative_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn three_row_table() -> EosTable {
        EosTable::new(vec![(1.0, 2.0), (2.0, 5.0), (4.0, 6.0)]).unwrap()
    }

    #[test]
    fn test_interpolation_inside_table() {
        let table = three_row_table();
        assert_relative_eq!(table.energy_density(1.0), 2.0, epsilon = 1e-14);
        assert_relative_eq!(table.energy_density(1.5), 3.5, epsilon = 1e-14);
        assert_relative_eq!(table.energy_density(2.0), 5.0, epsilon = 1e-14);
        assert_relative_eq!(table.energy_density(3.0), 5.5, epsilon = 1e-14);
        assert_relative_eq!(table.energy_density(4.0), 6.0, epsilon = 1e-14);
    }

    #[test]
    fn test_extrapolation_outside_table() {
        let table = three_row_table();
        // below the table: fixed ratio 2.0 / 1.0
        assert_relative_eq!(table.low_pressure_ratio(), 2.0);
        assert_relative_eq!(table.energy_density(0.25), 0.5, epsilon = 1e-14);
        assert_relative_eq!(table.energy_density(1e-12), 2e-12, epsilon = 1e-24);
        // above the table: last segment continued, slope 0.5
        assert_relative_eq!(table.energy_density(6.0), 7.0, epsilon = 1e-14);
        assert!(table.energy_density(1e6).is_finite());
    }

    #[test]
    fn test_monotone_and_continuous() {
        let table = three_row_table();
        let mut previous = 0.0;
        for i in 0..=1000 {
            let p = i as f64 * 0.01;
            let e = table.energy_density(p);
            assert!(e >= previous - 1e-14, "not monotone at P = {}", p);
            previous = e;
        }
        // continuity at both ends of the table
        for &edge in &[1.0, 4.0] {
            let below = table.energy_density(edge - 1e-9);
            let above = table.energy_density(edge + 1e-9);
            assert_relative_eq!(below, above, epsilon = 1e-8);
        }
    }

    #[test]
    fn test_unsorted_rows_are_sorted() {
        let table = EosTable::new(vec![(4.0, 6.0), (1.0, 2.0), (2.0, 5.0)]).unwrap();
        assert_eq!(table, three_row_table());
        assert_eq!(table.pressure_range(), (1.0, 4.0));
    }

    #[test]
    fn test_invalid_tables_rejected() {
        let too_short = EosTable::new(vec![(1.0, 1.0)]);
        assert!(matches!(too_short, Err(StarError::InvalidEos(_))));

        let repeated = EosTable::new(vec![(1.0, 1.0), (1.0, 2.0), (2.0, 3.0)]);
        assert!(matches!(repeated, Err(StarError::InvalidEos(_))));

        let decreasing = EosTable::new(vec![(1.0, 3.0), (2.0, 2.0)]);
        assert!(matches!(decreasing, Err(StarError::InvalidEos(_))));

        let non_finite = EosTable::new(vec![(1.0, f64::NAN), (2.0, 2.0)]);
        assert!(matches!(non_finite, Err(StarError::InvalidEos(_))));

        let zero_pressure = EosTable::new(vec![(0.0, 0.0), (2.0, 2.0)]);
        assert!(matches!(zero_pressure, Err(StarError::InvalidEos(_))));
    }

    #[test]
    fn test_unit_conversion() {
        let table = EosTable::from_raw(vec![(1e-3, 1e-3), (1.0, 1.0)], MEV_FM3_TO_KM2).unwrap();
        let (p_min, p_max) = table.pressure_range();
        assert_relative_eq!(p_min, 1e-3 * MEV_FM3_TO_KM2, max_relative = 1e-14);
        assert_relative_eq!(p_max, MEV_FM3_TO_KM2, max_relative = 1e-14);
        // identity table stays the identity after conversion
        let p = 0.5 * MEV_FM3_TO_KM2;
        assert_relative_eq!(table.energy_density(p), p, max_relative = 1e-12);
        assert!(EosTable::from_raw(vec![(1.0, 1.0), (2.0, 2.0)], 0.0).is_err());
    }

    #[test]
    fn test_polytrope() {
        let poly = Polytrope::new(4.0, 2.0).unwrap();
        assert_relative_eq!(poly.energy_density(16.0), 2.0, epsilon = 1e-14);
        assert_eq!(poly.energy_density(0.0), 0.0);
        assert_eq!(poly.energy_density(-1.0), 0.0);
        assert!(Polytrope::new(-1.0, 2.0).is_err());
        assert!(Polytrope::new(1.0, 1.0).is_err());

        let through = Polytrope::through_point(100.0, 1000.0, 2.0).unwrap();
        assert_relative_eq!(through.energy_density(100.0), 1000.0, max_relative = 1e-12);
        assert_relative_eq!(through.gamma(), 2.0);
    }

    #[test]
    fn test_polytrope_sample_matches_table() {
        let poly = Polytrope::new(100.0, 2.0).unwrap();
        let rows = poly.sample(1e-4, 5000.0, 200).unwrap();
        assert_eq!(rows.len(), 200);
        assert_relative_eq!(rows[0].0, 1e-4, max_relative = 1e-10);
        assert_relative_eq!(rows[199].0, 5000.0, max_relative = 1e-10);
        for pair in rows.windows(2) {
            assert!(pair[1].0 > pair[0].0);
            assert!(pair[1].1 >= pair[0].1);
        }
        let table = EosTable::new(rows).unwrap();
        // dense log sampling: linear interpolation close to the analytic curve
        for &p in &[1e-3, 0.1, 10.0, 1000.0] {
            assert_relative_eq!(
                table.energy_density(p),
                poly.energy_density(p),
                max_relative = 1e-2
            );
        }
        assert!(poly.sample(0.0, 1.0, 10).is_err());
        assert!(poly.sample(1.0, 2.0, 1).is_err());
    }

    #[test]
    fn test_enum_dispatch() {
        let sources: Vec<EquationOfState> = vec![
            EquationOfState::from(three_row_table()),
            EquationOfState::from(Polytrope::new(4.0, 2.0).unwrap()),
        ];
        assert_relative_eq!(sources[0].energy_density(1.5), 3.5, epsilon = 1e-14);
        assert_relative_eq!(sources[1].energy_density(16.0), 2.0, epsilon = 1e-14);
    }

    #[test]
    fn test_parse_eos_text() {
        let content = "# P  eps (MeV/fm^3)\n\n1e-3 1e-3\n  0.5   0.5  extra\n1.0 1.0\n";
        let table = parse_eos_table(content, 1.0).unwrap();
        assert_eq!(table.len(), 3);
        assert_relative_eq!(table.energy_density(0.75), 0.75, epsilon = 1e-14);
    }

    #[test]
    fn test_parse_errors_name_the_line() {
        let missing_column = "1.0 1.0\n2.0\n";
        match parse_eos_table(missing_column, 1.0) {
            Err(StarError::EosFormat { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected result {:?}", other),
        }
        let not_a_number = "# header\n1.0 1.0\n2.0 abc\n";
        match parse_eos_table(not_a_number, 1.0) {
            Err(StarError::EosFormat { line, .. }) => assert_eq!(line, 3),
            other => panic!("unexpected result {:?}", other),
        }
        let empty = "# nothing here\n";
        assert!(matches!(
            parse_eos_table(empty, 1.0),
            Err(StarError::InvalidEos(_))
        ));
    }

    #[test]
    fn test_load_eos_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "1e-3 1e-3").unwrap();
        writeln!(file, "1 1").unwrap();
        let table = load_eos_table(file.path().to_str().unwrap(), MEV_FM3_TO_KM2).unwrap();
        assert_eq!(table.len(), 2);
        assert_relative_eq!(table.pressure_range().1, MEV_FM3_TO_KM2, max_relative = 1e-14);

        let missing = load_eos_table("definitely_missing_eos_file.dat", MEV_FM3_TO_KM2);
        assert!(matches!(missing, Err(StarError::Io(_))));
    }
}
