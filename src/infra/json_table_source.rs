use std::path::PathBuf;

use crate::app::ports::TableSource;
use crate::config::InputsConfig;
use crate::domain::{Dataset, Table};
use crate::error::Result;
use crate::pipeline::ingestion::loader::load_table;

/// Reads the three JSON exports from a single input directory
pub struct JsonDirectorySource {
    input_dir: PathBuf,
    inputs: InputsConfig,
}

impl JsonDirectorySource {
    pub fn new(input_dir: impl Into<PathBuf>, inputs: InputsConfig) -> Self {
        Self {
            input_dir: input_dir.into(),
            inputs,
        }
    }

    pub fn path_for(&self, dataset: Dataset) -> PathBuf {
        self.input_dir.join(self.inputs.file_name(dataset))
    }
}

impl TableSource for JsonDirectorySource {
    fn load(&self, dataset: Dataset) -> Result<Table> {
        load_table(&self.path_for(dataset))
    }
}
