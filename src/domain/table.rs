use chrono::NaiveDate;
use serde_json::Value;
use std::hash::{Hash, Hasher};

use crate::constants::DATE_FORMAT;

/// A single table cell as loaded from a JSON export
#[derive(Debug, Clone)]
pub enum Cell {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
}

impl Cell {
    /// Convert a scalar JSON value into a cell.
    /// Returns `None` for nested arrays and objects.
    pub fn from_json(value: &Value) -> Option<Cell> {
        match value {
            Value::Null => Some(Cell::Null),
            Value::Bool(b) => Some(Cell::Bool(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Some(Cell::Int(i)),
                None => n.as_f64().map(Cell::Float),
            },
            Value::String(s) => Some(Cell::Text(s.clone())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Cell::Null => Value::Null,
            Cell::Bool(b) => Value::Bool(*b),
            Cell::Int(i) => Value::from(*i),
            // from_f64 rejects NaN and infinities
            Cell::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Cell::Text(s) => Value::String(s.clone()),
            Cell::Date(d) => Value::String(d.format(DATE_FORMAT).to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }
}

// Floats compare by bit pattern so that rows can be hashed for deduplication.
impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Cell::Null, Cell::Null) => true,
            (Cell::Bool(a), Cell::Bool(b)) => a == b,
            (Cell::Int(a), Cell::Int(b)) => a == b,
            (Cell::Float(a), Cell::Float(b)) => a.to_bits() == b.to_bits(),
            (Cell::Text(a), Cell::Text(b)) => a == b,
            (Cell::Date(a), Cell::Date(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Cell::Null => {}
            Cell::Bool(b) => b.hash(state),
            Cell::Int(i) => i.hash(state),
            Cell::Float(f) => f.to_bits().hash(state),
            Cell::Text(s) => s.hash(state),
            Cell::Date(d) => d.hash(state),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

/// An in-memory table: ordered column names and rows aligned to them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == columns.len()));
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the first column with the given name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Cell> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }

    /// All values of a column, in row order
    pub fn column_values<'a>(&'a self, name: &str) -> Option<impl Iterator<Item = &'a Cell> + 'a> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |r| &r[idx]))
    }

    /// Rename every column through `f`. Values are untouched.
    pub fn rename_columns<F>(mut self, mut f: F) -> Self
    where
        F: FnMut(&str) -> String,
    {
        self.columns = self.columns.iter().map(|c| f(c.as_str())).collect();
        self
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<Vec<Cell>>) {
        (self.columns, self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn test_cell_from_json_scalars() {
        assert_eq!(Cell::from_json(&json!(null)), Some(Cell::Null));
        assert_eq!(Cell::from_json(&json!(5)), Some(Cell::Int(5)));
        assert_eq!(Cell::from_json(&json!(2.5)), Some(Cell::Float(2.5)));
        assert_eq!(Cell::from_json(&json!("Seet")), Some(Cell::from("Seet")));
        assert_eq!(Cell::from_json(&json!([1, 2])), None);
        assert_eq!(Cell::from_json(&json!({"a": 1})), None);
    }

    #[test]
    fn test_date_cells_serialize_as_iso_strings() {
        let date = NaiveDate::from_ymd_opt(2015, 10, 1).unwrap();
        assert_eq!(Cell::Date(date).to_json(), json!("2015-10-01"));
        assert_eq!(Cell::Float(f64::NAN).to_json(), json!(null));
    }

    #[test]
    fn test_equal_rows_hash_equal() {
        let a = vec![Cell::from("zonotrichia"), Cell::Float(1.5), Cell::Null];
        let b = vec![Cell::from("zonotrichia"), Cell::Float(1.5), Cell::Null];
        let mut seen = HashSet::new();
        assert!(seen.insert(a));
        assert!(!seen.insert(b));
    }

    #[test]
    fn test_int_and_text_never_equal() {
        assert_ne!(Cell::Int(5), Cell::from("5"));
    }

    #[test]
    fn test_rename_columns_keeps_values() {
        let table = Table::from_rows(
            vec!["a".into(), "b".into()],
            vec![vec![Cell::Int(1), Cell::Int(2)]],
        );
        let renamed = table.rename_columns(|c| c.to_uppercase());
        assert_eq!(renamed.columns(), &["A".to_string(), "B".to_string()]);
        assert_eq!(renamed.get(0, "B"), Some(&Cell::Int(2)));
    }
}
