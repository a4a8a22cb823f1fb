// Application layer: ports and the summary use case

pub mod ports;
pub mod summary_use_case;

use std::path::Path;

use crate::config::Config;
use crate::error::Result;
use crate::infra::json_table_source::JsonDirectorySource;
use crate::infra::summary_output_adapter::FileSummaryOutputAdapter;

pub use summary_use_case::{GenerateSummaryUseCase, RunReport};

/// Build the summary from the JSON exports in `input_dir` and write it to `output_file`
pub fn run_summary(input_dir: &Path, output_file: &Path, config: &Config) -> Result<RunReport> {
    let source = JsonDirectorySource::new(input_dir, config.inputs.clone());
    let sink = FileSummaryOutputAdapter::new(output_file, config.output.orient);
    GenerateSummaryUseCase::new(Box::new(source), Box::new(sink)).run()
}
