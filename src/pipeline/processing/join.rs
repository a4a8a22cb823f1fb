use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

use crate::constants::{DATE_COLUMN, GENUS_COLUMN, LEFT_SUFFIX, RIGHT_SUFFIX, SPECIES_COLUMN};
use crate::domain::{Cell, Table};
use crate::error::{Result, SummaryError};

// Distinct unmatched keys listed in debug output
const UNMATCHED_KEYS_LOGGED: usize = 20;

/// Row accounting for a single inner join
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinStats {
    pub left_rows: usize,
    pub right_rows: usize,
    /// Left rows with no counterpart on the right (dropped)
    pub unmatched_left_rows: usize,
    pub output_rows: usize,
}

/// Stats for both joins of the summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummaryJoinStats {
    pub by_date: JoinStats,
    pub by_taxon: JoinStats,
}

/// One side of a join, labelled for error messages
#[derive(Debug, Clone, Copy)]
pub struct JoinSide<'a> {
    pub label: &'a str,
    pub table: &'a Table,
}

impl<'a> JoinSide<'a> {
    pub fn new(label: &'a str, table: &'a Table) -> Self {
        Self { label, table }
    }

    fn key_indices(&self, on: &[&str]) -> Result<Vec<usize>> {
        on.iter()
            .map(|key| {
                self.table
                    .column_index(key)
                    .ok_or_else(|| SummaryError::MissingColumn {
                        table: self.label.to_string(),
                        column: key.to_string(),
                    })
            })
            .collect()
    }
}

/// Relational inner join on equality of the `on` columns.
///
/// Output rows follow left row order; a left row matching several right rows
/// yields one output row per match, in right row order. Rows with a null in
/// any key column never match. Output columns are the left columns followed by
/// the right non-key columns; a non-key name present on both sides gets the
/// `_x` / `_y` suffix.
pub fn inner_join(left: JoinSide<'_>, right: JoinSide<'_>, on: &[&str]) -> Result<(Table, JoinStats)> {
    let left_keys = left.key_indices(on)?;
    let right_keys = right.key_indices(on)?;

    let right_payload: Vec<usize> = (0..right.table.columns().len())
        .filter(|i| !right_keys.contains(i))
        .collect();

    let columns = output_columns(left.table, &left_keys, right.table, &right_payload);

    let mut index: HashMap<Vec<&Cell>, Vec<usize>> = HashMap::new();
    for (row_idx, row) in right.table.rows().iter().enumerate() {
        if let Some(key) = key_of(row, &right_keys) {
            index.entry(key).or_default().push(row_idx);
        }
    }

    let mut out = Table::new(columns);
    let mut stats = JoinStats {
        left_rows: left.table.len(),
        right_rows: right.table.len(),
        ..Default::default()
    };
    let mut unmatched: Vec<Vec<&Cell>> = Vec::new();
    let mut unmatched_seen: HashSet<Vec<&Cell>> = HashSet::new();

    for left_row in left.table.rows() {
        let matches = key_of(left_row, &left_keys).and_then(|key| match index.get(&key) {
            Some(found) => Some(found),
            None => {
                if unmatched_seen.insert(key.clone()) {
                    unmatched.push(key);
                }
                None
            }
        });

        let Some(matches) = matches else {
            stats.unmatched_left_rows += 1;
            continue;
        };

        for &right_idx in matches {
            let right_row = &right.table.rows()[right_idx];
            let mut row = Vec::with_capacity(left_row.len() + right_payload.len());
            row.extend(left_row.iter().cloned());
            row.extend(right_payload.iter().map(|&i| right_row[i].clone()));
            out.push_row(row);
        }
    }
    stats.output_rows = out.len();

    if !unmatched.is_empty() {
        debug!(
            "{} distinct {:?} keys from {} have no match in {} (first {}): {}",
            unmatched.len(),
            on,
            left.label,
            right.label,
            UNMATCHED_KEYS_LOGGED,
            unmatched
                .iter()
                .take(UNMATCHED_KEYS_LOGGED)
                .map(|key| format_key(key))
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    Ok((out, stats))
}

/// Join collisions with light levels on `Date`, then with flight calls on
/// (`Genus`, `Species`). Both joins are inner joins; unmatched rows are dropped.
pub fn create_joined_summary(
    collisions: &Table,
    flight_calls: &Table,
    light_levels: &Table,
) -> Result<(Table, SummaryJoinStats)> {
    let (by_date, date_stats) = inner_join(
        JoinSide::new("collisions", collisions),
        JoinSide::new("light_levels", light_levels),
        &[DATE_COLUMN],
    )?;
    info!(
        "Joined light levels on {}: {} collision rows -> {} rows ({} without a light score)",
        DATE_COLUMN, date_stats.left_rows, date_stats.output_rows, date_stats.unmatched_left_rows
    );

    let (summary, taxon_stats) = inner_join(
        JoinSide::new("collisions+light_levels", &by_date),
        JoinSide::new("flight_calls", flight_calls),
        &[GENUS_COLUMN, SPECIES_COLUMN],
    )?;
    info!(
        "Joined flight calls on {}/{}: {} rows -> {} rows ({} without flight-call data)",
        GENUS_COLUMN,
        SPECIES_COLUMN,
        taxon_stats.left_rows,
        taxon_stats.output_rows,
        taxon_stats.unmatched_left_rows
    );

    Ok((
        summary,
        SummaryJoinStats {
            by_date: date_stats,
            by_taxon: taxon_stats,
        },
    ))
}

fn key_of<'a>(row: &'a [Cell], key_idx: &[usize]) -> Option<Vec<&'a Cell>> {
    let key: Vec<&Cell> = key_idx.iter().map(|&i| &row[i]).collect();
    if key.iter().any(|c| c.is_null()) {
        None
    } else {
        Some(key)
    }
}

fn format_key(key: &[&Cell]) -> String {
    key.iter()
        .map(|c| c.to_json().to_string())
        .collect::<Vec<_>>()
        .join("/")
}

fn output_columns(
    left: &Table,
    left_keys: &[usize],
    right: &Table,
    right_payload: &[usize],
) -> Vec<String> {
    let left_payload: HashSet<&str> = left
        .columns()
        .iter()
        .enumerate()
        .filter(|(i, _)| !left_keys.contains(i))
        .map(|(_, c)| c.as_str())
        .collect();
    let right_names: HashSet<&str> = right_payload
        .iter()
        .map(|&i| right.columns()[i].as_str())
        .collect();

    let mut columns = Vec::with_capacity(left.columns().len() + right_payload.len());
    for (i, name) in left.columns().iter().enumerate() {
        if !left_keys.contains(&i) && right_names.contains(name.as_str()) {
            columns.push(format!("{}{}", name, LEFT_SUFFIX));
        } else {
            columns.push(name.clone());
        }
    }
    for &i in right_payload {
        let name = &right.columns()[i];
        if left_payload.contains(name.as_str()) {
            columns.push(format!("{}{}", name, RIGHT_SUFFIX));
        } else {
            columns.push(name.clone());
        }
    }
    columns
}
