use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{
    COLLISIONS_FILE, DEFAULT_LOG_DIR, DEFAULT_LOG_FILE, DEFAULT_LOG_FILTER, FLIGHT_CALLS_FILE,
    LIGHT_LEVELS_FILE,
};
use crate::domain::Dataset;
use crate::error::{Result, SummaryError};

/// Optional run configuration, read from a TOML file. Every key has a default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub inputs: InputsConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
}

/// File names of the three datasets inside the input directory
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputsConfig {
    pub collisions: String,
    pub flight_calls: String,
    pub light_levels: String,
}

impl Default for InputsConfig {
    fn default() -> Self {
        Self {
            collisions: COLLISIONS_FILE.to_string(),
            flight_calls: FLIGHT_CALLS_FILE.to_string(),
            light_levels: LIGHT_LEVELS_FILE.to_string(),
        }
    }
}

impl InputsConfig {
    pub fn file_name(&self, dataset: Dataset) -> &str {
        match dataset {
            Dataset::Collisions => &self.collisions,
            Dataset::FlightCalls => &self.flight_calls,
            Dataset::LightLevels => &self.light_levels,
        }
    }
}

/// JSON layout of the summary file.
///
/// Both layouts write dates as `YYYY-MM-DD` strings. pandas' `to_json`
/// writes epoch milliseconds instead, so `Columns` matches its shape but
/// not its date values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputOrient {
    /// `{column: {"0": value, "1": value, ...}}`
    #[default]
    Columns,
    /// `[{column: value, ...}, ...]`
    Records,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub orient: OutputOrient,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for the daily-rolled JSON log files
    pub directory: PathBuf,
    pub file_name: String,
    /// Filter used when RUST_LOG is not set
    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_LOG_DIR),
            file_name: DEFAULT_LOG_FILE.to_string(),
            default_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Prometheus text-format file written after each run
    pub textfile: Option<PathBuf>,
}

impl Config {
    /// Load the configuration from `path`, or the defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Config::default());
        };
        let content = fs::read_to_string(path).map_err(|e| {
            SummaryError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_file() {
        let config = Config::load(None).unwrap();
        assert_eq!(config.inputs.file_name(Dataset::Collisions), COLLISIONS_FILE);
        assert_eq!(config.inputs.file_name(Dataset::FlightCalls), FLIGHT_CALLS_FILE);
        assert_eq!(config.inputs.file_name(Dataset::LightLevels), LIGHT_LEVELS_FILE);
        assert_eq!(config.output.orient, OutputOrient::Columns);
        assert!(config.metrics.textfile.is_none());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = Config::from_toml_str(
            r#"
            [inputs]
            light_levels = "light_2018.json"

            [output]
            orient = "records"
            "#,
        )
        .unwrap();

        assert_eq!(config.inputs.light_levels, "light_2018.json");
        assert_eq!(config.inputs.collisions, COLLISIONS_FILE);
        assert_eq!(config.output.orient, OutputOrient::Records);
        assert_eq!(config.logging.default_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn test_unknown_orient_is_rejected() {
        let err = Config::from_toml_str("[output]\norient = \"split\"\n").unwrap_err();
        assert!(matches!(err, SummaryError::Toml(_)));
    }

    #[test]
    fn test_missing_config_file_is_config_error() {
        let dir = tempdir().unwrap();
        let err = Config::load(Some(dir.path().join("absent.toml").as_path())).unwrap_err();
        assert!(matches!(err, SummaryError::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bird_summary.toml");
        std::fs::write(&path, "[metrics]\ntextfile = \"out/metrics.prom\"\n").unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.metrics.textfile, Some(PathBuf::from("out/metrics.prom")));
    }
}
