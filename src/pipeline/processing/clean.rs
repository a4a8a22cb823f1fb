use std::collections::HashSet;
use tracing::debug;

use crate::domain::{Cell, Table};

/// Columns in which a null value causes the row to be dropped
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequiredColumns {
    /// Every column is required
    #[default]
    All,
    /// No null filtering
    None,
    /// Only the named columns (as named before column-name trimming).
    /// Names not present in the table are ignored; an empty list filters nothing.
    Only(Vec<String>),
}

/// Row accounting for a single cleaning pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanStats {
    pub rows_in: usize,
    pub null_rows_dropped: usize,
    pub duplicates_dropped: usize,
    pub rows_out: usize,
}

/// Normalize a raw table.
///
/// In order:
/// 1. text values are trimmed and lowercased (other cells are untouched)
/// 2. rows with a null in any required column are dropped
/// 3. column names are trimmed
/// 4. exact duplicate rows are dropped, keeping the first occurrence
pub fn clean_table(table: Table, required: &RequiredColumns) -> (Table, CleanStats) {
    let (columns, mut rows) = table.into_parts();
    let mut stats = CleanStats {
        rows_in: rows.len(),
        ..Default::default()
    };

    for row in rows.iter_mut() {
        for cell in row.iter_mut() {
            if let Cell::Text(s) = cell {
                *s = s.trim().to_lowercase();
            }
        }
    }

    let required_idx: Vec<usize> = match required {
        RequiredColumns::All => (0..columns.len()).collect(),
        RequiredColumns::None => Vec::new(),
        RequiredColumns::Only(names) => columns
            .iter()
            .enumerate()
            .filter(|(_, c)| names.contains(*c))
            .map(|(i, _)| i)
            .collect(),
    };
    if !required_idx.is_empty() {
        let before = rows.len();
        rows.retain(|row| required_idx.iter().all(|&i| !row[i].is_null()));
        stats.null_rows_dropped = before - rows.len();
    }

    let columns: Vec<String> = columns.iter().map(|c| c.trim().to_string()).collect();

    let before = rows.len();
    let rows = drop_duplicates(rows);
    stats.duplicates_dropped = before - rows.len();
    stats.rows_out = rows.len();

    debug!(
        "Cleaned table: {} in, {} null rows dropped, {} duplicates dropped, {} out",
        stats.rows_in, stats.null_rows_dropped, stats.duplicates_dropped, stats.rows_out
    );

    (Table::from_rows(columns, rows), stats)
}

fn drop_duplicates(rows: Vec<Vec<Cell>>) -> Vec<Vec<Cell>> {
    let mut seen = HashSet::with_capacity(rows.len());
    let keep: Vec<bool> = rows.iter().map(|row| seen.insert(row)).collect();
    drop(seen);

    rows.into_iter()
        .zip(keep)
        .filter_map(|(row, keep)| keep.then_some(row))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ingestion::loader::table_from_value;
    use serde_json::{json, Value};
    use std::path::Path;

    fn table(value: Value) -> Table {
        table_from_value(&value, Path::new("test.json")).unwrap()
    }

    #[test]
    fn test_text_is_trimmed_and_lowercased() {
        let raw = table(json!([{"Genus": "  Zonotrichia ", "Flight": 3}]));
        let (cleaned, _) = clean_table(raw, &RequiredColumns::All);

        assert_eq!(cleaned.get(0, "Genus"), Some(&Cell::from("zonotrichia")));
        assert_eq!(cleaned.get(0, "Flight"), Some(&Cell::Int(3)));
    }

    #[test]
    fn test_every_text_cell_is_normalized() {
        let raw = table(json!([
            {"Genus": "Melospiza", "Species": " Lincolnii", "Locality": "MP "},
            {"Genus": "JUNCO", "Species": "hyemalis", "Locality": " CHI"}
        ]));
        let (cleaned, _) = clean_table(raw, &RequiredColumns::None);

        for row in cleaned.rows() {
            for cell in row {
                if let Some(s) = cell.as_text() {
                    assert_eq!(s, s.trim().to_lowercase());
                }
            }
        }
    }

    #[test]
    fn test_rows_with_nulls_are_dropped_when_all_required() {
        let raw = table(json!([
            {"Date": "2015-10-01", "Light Score": 5},
            {"Date": "2015-10-02", "Light Score": null},
            {"Date": "2015-10-03"}
        ]));
        let (cleaned, stats) = clean_table(raw, &RequiredColumns::All);

        assert_eq!(cleaned.len(), 1);
        assert_eq!(stats.null_rows_dropped, 2);
    }

    #[test]
    fn test_only_named_columns_are_required() {
        let raw = table(json!([
            {"Genus": "a", "Locality": null},
            {"Genus": null, "Locality": "chi"}
        ]));
        let (cleaned, _) = clean_table(raw, &RequiredColumns::Only(vec!["Genus".into()]));

        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned.get(0, "Genus"), Some(&Cell::from("a")));
    }

    #[test]
    fn test_no_required_columns_keeps_nulls() {
        let raw = table(json!([{"Genus": null}, {"Genus": "a"}]));
        let (none, _) = clean_table(raw.clone(), &RequiredColumns::None);
        let (empty, _) = clean_table(raw, &RequiredColumns::Only(Vec::new()));

        assert_eq!(none.len(), 2);
        assert_eq!(empty.len(), 2);
    }

    #[test]
    fn test_column_names_are_trimmed() {
        let raw = table(json!([{" Light Score ": 5, "Date": "2015-10-01"}]));
        let (cleaned, _) = clean_table(raw, &RequiredColumns::All);
        assert_eq!(cleaned.columns(), &["Light Score", "Date"]);
    }

    #[test]
    fn test_duplicates_collapse_after_normalization() {
        let raw = table(json!([
            {"Genus": "Zonotrichia", "Species": "albicollis", "Date": "2015-10-01"},
            {"Genus": "zonotrichia ", "Species": "ALBICOLLIS", "Date": "2015-10-01"},
            {"Genus": "Zonotrichia", "Species": "albicollis", "Date": "2015-10-02"}
        ]));
        let (cleaned, stats) = clean_table(raw, &RequiredColumns::All);

        assert_eq!(cleaned.len(), 2);
        assert_eq!(stats.duplicates_dropped, 1);
        // first occurrence survives, order preserved
        assert_eq!(
            cleaned.get(1, "Date").and_then(|c| c.to_json().as_str().map(String::from)),
            Some("2015-10-02".to_string())
        );
    }

    #[test]
    fn test_int_and_float_spellings_are_duplicates() {
        let raw = table(json!([
            {"Date": "2015-10-01", "Light Score": 5},
            {"Date": "2015-10-01", "Light Score": 5.0}
        ]));
        let (cleaned, stats) = clean_table(raw, &RequiredColumns::All);

        assert_eq!(cleaned.len(), 1);
        assert_eq!(stats.duplicates_dropped, 1);
    }

    #[test]
    fn test_cleaned_rows_are_unique() {
        let raw = table(json!([
            {"a": 1, "b": "x"},
            {"a": 1, "b": "X"},
            {"a": 2, "b": "x"},
            {"a": 1, "b": " x"}
        ]));
        let (cleaned, _) = clean_table(raw, &RequiredColumns::All);

        let unique: HashSet<_> = cleaned.rows().iter().collect();
        assert_eq!(unique.len(), cleaned.len());
        assert_eq!(cleaned.len(), 2);
    }

    #[test]
    fn test_empty_table_stays_empty() {
        let (cleaned, stats) = clean_table(table(json!([])), &RequiredColumns::All);
        assert!(cleaned.is_empty());
        assert_eq!(stats, CleanStats::default());
    }
}
