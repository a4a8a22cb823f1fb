use serde_json::{Map, Value};
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::info;

use crate::app::ports::SummarySink;
use crate::config::OutputOrient;
use crate::domain::Table;
use crate::error::Result;

/// File-based implementation of SummarySink
/// Writes the summary as a single JSON document, replacing any existing file
pub struct FileSummaryOutputAdapter {
    path: PathBuf,
    orient: OutputOrient,
}

impl FileSummaryOutputAdapter {
    pub fn new(path: impl Into<PathBuf>, orient: OutputOrient) -> Self {
        Self {
            path: path.into(),
            orient,
        }
    }
}

impl SummarySink for FileSummaryOutputAdapter {
    fn write_summary(&self, summary: &Table) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &summary_to_json(summary, self.orient))?;
        writer.flush()?;

        info!(
            "Wrote {} summary rows to {}",
            summary.len(),
            self.path.display()
        );
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Render a table in the requested JSON layout
pub fn summary_to_json(table: &Table, orient: OutputOrient) -> Value {
    match orient {
        OutputOrient::Columns => {
            let mut columns = Map::new();
            for (col_idx, name) in table.columns().iter().enumerate() {
                let cells: Map<String, Value> = table
                    .rows()
                    .iter()
                    .enumerate()
                    .map(|(row_idx, row)| (row_idx.to_string(), row[col_idx].to_json()))
                    .collect();
                columns.insert(name.clone(), Value::Object(cells));
            }
            Value::Object(columns)
        }
        OutputOrient::Records => Value::Array(
            table
                .rows()
                .iter()
                .map(|row| {
                    let record: Map<String, Value> = table
                        .columns()
                        .iter()
                        .zip(row)
                        .map(|(name, cell)| (name.clone(), cell.to_json()))
                        .collect();
                    Value::Object(record)
                })
                .collect(),
        ),
    }
}
