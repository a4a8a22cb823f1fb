use crate::domain::Table;

/// Semantic name for a raw flight-call column.
///
/// The flight-call export labels its taxonomy columns one position off:
/// the column called `Species` holds the genus, `Family` holds the species,
/// `Collisions` holds the family and `Call` holds the flight call.
/// Unknown names pass through unchanged.
pub fn flight_call_column_name(raw: &str) -> &str {
    match raw {
        "Species" => "Genus",
        "Family" => "Species",
        "Collisions" => "Family",
        "Call" => "Flight Call",
        other => other,
    }
}

/// Rename the flight-call table's columns to their semantic names
pub fn rename_flight_call_columns(table: Table) -> Table {
    table.rename_columns(|c| flight_call_column_name(c).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Cell;

    fn raw_flight_calls() -> Table {
        Table::from_rows(
            ["Species", "Family", "Collisions", "Call", "Flight", "Habitat", "Stratum"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            vec![vec![
                Cell::from("zonotrichia"),
                Cell::from("albicollis"),
                Cell::from("emberizidae"),
                Cell::from("yes"),
                Cell::Int(1),
                Cell::from("forest"),
                Cell::from("lower"),
            ]],
        )
    }

    #[test]
    fn test_columns_are_shifted_to_semantic_names() {
        let renamed = rename_flight_call_columns(raw_flight_calls());

        assert_eq!(
            renamed.columns(),
            &["Genus", "Species", "Family", "Flight Call", "Flight", "Habitat", "Stratum"]
        );
        assert_eq!(renamed.get(0, "Genus"), Some(&Cell::from("zonotrichia")));
        assert_eq!(renamed.get(0, "Species"), Some(&Cell::from("albicollis")));
        assert_eq!(renamed.get(0, "Family"), Some(&Cell::from("emberizidae")));
    }

    #[test]
    fn test_unmapped_columns_pass_through() {
        assert_eq!(flight_call_column_name("Habitat"), "Habitat");
        assert_eq!(flight_call_column_name("Genus"), "Genus");
        assert_eq!(flight_call_column_name("Flight Call"), "Flight Call");
    }

    #[test]
    fn test_rename_is_noop_without_raw_names() {
        let table = Table::from_rows(
            vec!["Genus".into(), "Flight Call".into(), "Stratum".into()],
            vec![vec![Cell::from("junco"), Cell::from("no"), Cell::from("upper")]],
        );
        assert_eq!(rename_flight_call_columns(table.clone()), table);
    }
}
