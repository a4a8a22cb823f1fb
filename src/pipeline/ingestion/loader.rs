use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, instrument};

use crate::constants::DATE_FORMAT;
use crate::domain::{Cell, Table};
use crate::error::{Result, SummaryError};

/// Read a JSON export from disk into a table.
///
/// A missing file is reported as [`SummaryError::InputNotFound`] before any
/// read is attempted; callers treat it as fatal.
#[instrument(skip(path), fields(path = %path.display()))]
pub fn load_table(path: &Path) -> Result<Table> {
    if !path.exists() {
        return Err(SummaryError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content).map_err(|source| SummaryError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let table = table_from_value(&value, path)?;
    debug!(
        "Loaded {} rows x {} columns",
        table.len(),
        table.columns().len()
    );
    Ok(table)
}

/// Build a table from an already-parsed JSON document.
///
/// Accepted layouts:
/// - an array of objects (one object per row)
/// - an object of objects, `{column: {row_label: value}}`
/// - an object of equal-length arrays, `{column: [values]}`
///
/// `path` is only used for error messages.
pub fn table_from_value(value: &Value, path: &Path) -> Result<Table> {
    let table = match value {
        Value::Array(records) => from_records(records, path)?,
        Value::Object(map) if map.values().all(Value::is_object) => from_labelled_columns(map, path)?,
        Value::Object(map) if map.values().all(Value::is_array) => from_column_arrays(map, path)?,
        _ => {
            return Err(unsupported(
                path,
                "expected an array of objects or an object of columns",
            ))
        }
    };
    Ok(widen_mixed_numeric_columns(coerce_date_columns(table)))
}

fn from_records(records: &[Value], path: &Path) -> Result<Table> {
    let mut objects = Vec::with_capacity(records.len());
    let mut columns: Vec<String> = Vec::new();

    for (i, record) in records.iter().enumerate() {
        let obj = record
            .as_object()
            .ok_or_else(|| unsupported(path, &format!("record {} is not an object", i)))?;
        for key in obj.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
        objects.push(obj);
    }

    let mut table = Table::new(columns.clone());
    for obj in objects {
        let row = columns
            .iter()
            .map(|col| match obj.get(col) {
                Some(v) => to_cell(v, path, col),
                None => Ok(Cell::Null),
            })
            .collect::<Result<Vec<_>>>()?;
        table.push_row(row);
    }
    Ok(table)
}

fn from_labelled_columns(map: &Map<String, Value>, path: &Path) -> Result<Table> {
    let columns: Vec<String> = map.keys().cloned().collect();

    // Row labels in first-seen order across all columns
    let mut labels: HashMap<&str, usize> = HashMap::new();
    for cells in map.values().filter_map(Value::as_object) {
        for label in cells.keys() {
            let next = labels.len();
            labels.entry(label.as_str()).or_insert(next);
        }
    }

    let mut rows = vec![vec![Cell::Null; columns.len()]; labels.len()];
    for (col_idx, (column, cells)) in map.iter().enumerate() {
        let Some(cells) = cells.as_object() else {
            continue;
        };
        for (label, value) in cells {
            let row_idx = labels[label.as_str()];
            rows[row_idx][col_idx] = to_cell(value, path, column)?;
        }
    }

    Ok(Table::from_rows(columns, rows))
}

fn from_column_arrays(map: &Map<String, Value>, path: &Path) -> Result<Table> {
    let columns: Vec<String> = map.keys().cloned().collect();
    let arrays: Vec<&Vec<Value>> = map.values().filter_map(Value::as_array).collect();

    let height = arrays.first().map(|a| a.len()).unwrap_or(0);
    if let Some((column, array)) = map
        .iter()
        .zip(arrays.iter())
        .map(|((name, _), array)| (name, array))
        .find(|(_, array)| array.len() != height)
    {
        return Err(unsupported(
            path,
            &format!(
                "column '{}' has {} values, expected {}",
                column,
                array.len(),
                height
            ),
        ));
    }

    let mut table = Table::new(columns.clone());
    for row_idx in 0..height {
        let row = columns
            .iter()
            .zip(arrays.iter())
            .map(|(column, array)| to_cell(&array[row_idx], path, column))
            .collect::<Result<Vec<_>>>()?;
        table.push_row(row);
    }
    Ok(table)
}

fn to_cell(value: &Value, path: &Path, column: &str) -> Result<Cell> {
    Cell::from_json(value).ok_or_else(|| SummaryError::UnsupportedValue {
        path: path.to_path_buf(),
        column: column.to_string(),
    })
}

fn unsupported(path: &Path, reason: &str) -> SummaryError {
    SummaryError::UnsupportedLayout {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Whether a column name marks its values as calendar dates
/// (`date`, `datetime`, `modified`, `*_at`, `*_time`, `timestamp*`).
pub fn is_date_column(name: &str) -> bool {
    let name = name.trim().to_lowercase();
    name == "date"
        || name == "datetime"
        || name == "modified"
        || name.ends_with("_at")
        || name.ends_with("_time")
        || name.starts_with("timestamp")
}

/// Parse text values in date columns. Values that are not `YYYY-MM-DD` stay text.
fn coerce_date_columns(table: Table) -> Table {
    let (columns, mut rows) = table.into_parts();
    let date_columns: Vec<usize> = columns
        .iter()
        .enumerate()
        .filter(|(_, name)| is_date_column(name))
        .map(|(i, _)| i)
        .collect();

    if !date_columns.is_empty() {
        for row in rows.iter_mut() {
            for &i in &date_columns {
                let parsed = match &row[i] {
                    Cell::Text(s) => NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok(),
                    _ => None,
                };
                if let Some(date) = parsed {
                    row[i] = Cell::Date(date);
                }
            }
        }
    }

    Table::from_rows(columns, rows)
}

/// Columns holding both integers and floats become all-float, so `5` and
/// `5.0` compare equal during deduplication and joins.
fn widen_mixed_numeric_columns(table: Table) -> Table {
    let (columns, mut rows) = table.into_parts();

    for i in 0..columns.len() {
        let has_float = rows.iter().any(|row| matches!(row[i], Cell::Float(_)));
        let has_int = rows.iter().any(|row| matches!(row[i], Cell::Int(_)));
        if !(has_float && has_int) {
            continue;
        }
        for row in rows.iter_mut() {
            if let Cell::Int(v) = row[i] {
                row[i] = Cell::Float(v as f64);
            }
        }
    }

    Table::from_rows(columns, rows)
}
