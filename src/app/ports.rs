use crate::domain::{Dataset, Table};
use crate::error::Result;

/// Supplies the raw tables the summary is built from
pub trait TableSource {
    fn load(&self, dataset: Dataset) -> Result<Table>;
}

/// Persists the finished summary table
pub trait SummarySink {
    fn write_summary(&self, summary: &Table) -> Result<()>;

    /// Where the summary ends up, for logs
    fn describe(&self) -> String;
}
