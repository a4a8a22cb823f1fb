//! Metrics for summary runs
//!
//! Recording goes through the `metrics` facade and is a no-op unless a
//! recorder is installed. [`init_textfile_exporter`] installs the Prometheus
//! recorder; [`write_textfile`] dumps its rendering for a textfile collector.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::{Result, SummaryError};

/// Enum representing all metric names used in the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    RunsTotal,
    StageDuration,
    RowsLoaded,
    NullRowsDropped,
    DuplicateRowsDropped,
    JoinUnmatchedRows,
    JoinOutputRows,
    SummaryRowsWritten,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::RunsTotal => "bird_summary_runs_total",
            MetricName::StageDuration => "bird_summary_stage_duration_seconds",
            MetricName::RowsLoaded => "bird_summary_rows_loaded_total",
            MetricName::NullRowsDropped => "bird_summary_null_rows_dropped_total",
            MetricName::DuplicateRowsDropped => "bird_summary_duplicate_rows_dropped_total",
            MetricName::JoinUnmatchedRows => "bird_summary_join_unmatched_rows_total",
            MetricName::JoinOutputRows => "bird_summary_join_output_rows_total",
            MetricName::SummaryRowsWritten => "bird_summary_rows_written_total",
        }
    }

    pub fn all_metrics() -> impl Iterator<Item = MetricName> {
        use MetricName::*;
        [
            RunsTotal,
            StageDuration,
            RowsLoaded,
            NullRowsDropped,
            DuplicateRowsDropped,
            JoinUnmatchedRows,
            JoinOutputRows,
            SummaryRowsWritten,
        ]
        .into_iter()
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Install the Prometheus recorder as the global metrics recorder
pub fn init_textfile_exporter() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| SummaryError::Metrics(format!("Failed to install Prometheus recorder: {}", e)))?;
    info!("Metrics system initialized (textfile exporter)");
    Ok(handle)
}

/// Write the current metric values in Prometheus text format
pub fn write_textfile(handle: &PrometheusHandle, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, handle.render())?;
    info!("Wrote metrics to {}", path.display());
    Ok(())
}

/// Record the outcome of a whole run
pub fn run_completed(outcome: &'static str) {
    ::metrics::counter!(MetricName::RunsTotal.as_str(), "outcome" => outcome).increment(1);
}

/// Record how long a pipeline stage took
pub fn stage_duration(stage: &'static str, secs: f64) {
    ::metrics::histogram!(MetricName::StageDuration.as_str(), "stage" => stage).record(secs);
}

// ============================================================================
// Load Metrics
// ============================================================================

pub mod load {
    use super::MetricName;
    use crate::domain::Dataset;

    pub fn rows_loaded(dataset: Dataset, rows: usize) {
        ::metrics::counter!(MetricName::RowsLoaded.as_str(), "dataset" => dataset.label())
            .increment(rows as u64);
    }
}

// ============================================================================
// Clean Metrics
// ============================================================================

pub mod clean {
    use super::MetricName;
    use crate::domain::Dataset;
    use crate::pipeline::processing::clean::CleanStats;

    pub fn table_cleaned(dataset: Dataset, stats: &CleanStats) {
        ::metrics::counter!(MetricName::NullRowsDropped.as_str(), "dataset" => dataset.label())
            .increment(stats.null_rows_dropped as u64);
        ::metrics::counter!(MetricName::DuplicateRowsDropped.as_str(), "dataset" => dataset.label())
            .increment(stats.duplicates_dropped as u64);
    }
}

// ============================================================================
// Join Metrics
// ============================================================================

pub mod join {
    use super::MetricName;
    use crate::pipeline::processing::join::JoinStats;

    /// `join` names the join, e.g. "date" or "taxon"
    pub fn join_completed(join: &'static str, stats: &JoinStats) {
        ::metrics::counter!(MetricName::JoinUnmatchedRows.as_str(), "join" => join)
            .increment(stats.unmatched_left_rows as u64);
        ::metrics::counter!(MetricName::JoinOutputRows.as_str(), "join" => join)
            .increment(stats.output_rows as u64);
    }
}

// ============================================================================
// Write Metrics
// ============================================================================

pub mod write {
    use super::MetricName;

    pub fn summary_written(rows: usize) {
        ::metrics::counter!(MetricName::SummaryRowsWritten.as_str()).increment(rows as u64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_metric_names_are_unique_and_prefixed() {
        let names: Vec<&str> = MetricName::all_metrics().map(|m| m.as_str()).collect();
        let unique: HashSet<&str> = names.iter().copied().collect();

        assert_eq!(unique.len(), names.len());
        assert!(names.iter().all(|n| n.starts_with("bird_summary_")));
    }

    #[test]
    fn test_display_matches_as_str() {
        assert_eq!(MetricName::RowsLoaded.to_string(), "bird_summary_rows_loaded_total");
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        load::rows_loaded(crate::domain::Dataset::Collisions, 10);
        write::summary_written(3);
        stage_duration("load", 0.5);
    }
}
