use std::time::Instant;
use tracing::{error, info, info_span};
use uuid::Uuid;

use crate::app::ports::{SummarySink, TableSource};
use crate::domain::{Dataset, Table};
use crate::error::Result;
use crate::observability::metrics;
use crate::pipeline::processing::clean::{clean_table, CleanStats, RequiredColumns};
use crate::pipeline::processing::join::{create_joined_summary, SummaryJoinStats};
use crate::pipeline::processing::remap::rename_flight_call_columns;

/// Result of a complete summary run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: Uuid,
    pub collisions: CleanStats,
    pub flight_calls: CleanStats,
    pub light_levels: CleanStats,
    pub joins: SummaryJoinStats,
    pub summary_rows: usize,
    pub output: String,
}

/// Use case for building the collision summary: load, clean, rename, join, write
pub struct GenerateSummaryUseCase {
    source: Box<dyn TableSource>,
    sink: Box<dyn SummarySink>,
    required: RequiredColumns,
}

impl GenerateSummaryUseCase {
    pub fn new(source: Box<dyn TableSource>, sink: Box<dyn SummarySink>) -> Self {
        Self {
            source,
            sink,
            required: RequiredColumns::All,
        }
    }

    /// Override which columns must be non-null in every source table
    pub fn with_required_columns(mut self, required: RequiredColumns) -> Self {
        self.required = required;
        self
    }

    /// Run the whole pipeline once. Any error aborts the run.
    pub fn run(&self) -> Result<RunReport> {
        let run_id = Uuid::new_v4();
        let span = info_span!("summary_run", run_id = %run_id);
        let _enter = span.enter();

        let started = Instant::now();
        let result = self.execute(run_id);
        metrics::stage_duration("total", started.elapsed().as_secs_f64());

        match &result {
            Ok(report) => {
                metrics::run_completed("success");
                info!(
                    "Summary run finished in {:.2}s: {} rows written to {}",
                    started.elapsed().as_secs_f64(),
                    report.summary_rows,
                    report.output
                );
            }
            Err(e) => {
                metrics::run_completed("error");
                error!("Summary run failed: {}", e);
            }
        }
        result
    }

    fn execute(&self, run_id: Uuid) -> Result<RunReport> {
        // Every input is read before any processing so a missing file fails fast
        let t_load = Instant::now();
        let collisions = self.load(Dataset::Collisions)?;
        let flight_calls = self.load(Dataset::FlightCalls)?;
        let light_levels = self.load(Dataset::LightLevels)?;
        metrics::stage_duration("load", t_load.elapsed().as_secs_f64());

        let t_clean = Instant::now();
        let (collisions, collision_stats) = self.clean(Dataset::Collisions, collisions);
        let (flight_calls, flight_call_stats) = self.clean(Dataset::FlightCalls, flight_calls);
        let (light_levels, light_level_stats) = self.clean(Dataset::LightLevels, light_levels);
        let flight_calls = rename_flight_call_columns(flight_calls);
        metrics::stage_duration("clean", t_clean.elapsed().as_secs_f64());

        let t_join = Instant::now();
        let (summary, joins) = create_joined_summary(&collisions, &flight_calls, &light_levels)?;
        metrics::join::join_completed("date", &joins.by_date);
        metrics::join::join_completed("taxon", &joins.by_taxon);
        metrics::stage_duration("join", t_join.elapsed().as_secs_f64());

        let t_write = Instant::now();
        self.sink.write_summary(&summary)?;
        metrics::write::summary_written(summary.len());
        metrics::stage_duration("write", t_write.elapsed().as_secs_f64());

        Ok(RunReport {
            run_id,
            collisions: collision_stats,
            flight_calls: flight_call_stats,
            light_levels: light_level_stats,
            joins,
            summary_rows: summary.len(),
            output: self.sink.describe(),
        })
    }

    fn load(&self, dataset: Dataset) -> Result<Table> {
        let table = self.source.load(dataset)?;
        info!("Loaded {} rows from {}", table.len(), dataset);
        metrics::load::rows_loaded(dataset, table.len());
        Ok(table)
    }

    fn clean(&self, dataset: Dataset, table: Table) -> (Table, CleanStats) {
        let (table, stats) = clean_table(table, &self.required);
        info!(
            "Cleaned {}: {} rows kept ({} with missing values, {} duplicates dropped)",
            dataset, stats.rows_out, stats.null_rows_dropped, stats.duplicates_dropped
        );
        metrics::clean::table_cleaned(dataset, &stats);
        (table, stats)
    }
}
