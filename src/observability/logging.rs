use std::fs;
use tracing::warn;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::{Result, SummaryError};

/// Initializes the logging system with both console and file output.
///
/// If the log directory cannot be used, logging continues on the console
/// only and a warning is emitted. The returned guard flushes the file writer
/// when dropped; keep it alive for the whole run.
pub fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    // Create a non-blocking file appender for daily log rotation
    let (file_layer, guard, file_error) = match file_appender(config) {
        Ok(appender) => {
            let (non_blocking_writer, guard) = tracing_appender::non_blocking(appender);
            // Create a JSON layer for file logging
            let layer = fmt::layer().json().with_writer(non_blocking_writer);
            (Some(layer), Some(guard), None)
        }
        Err(e) => (None, None, Some(e)),
    };

    // Console output goes to stderr so stdout stays clean for the run summary
    let console_layer = fmt::layer().with_target(true).with_writer(std::io::stderr);

    // Respect RUST_LOG if set; otherwise use the configured default
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    if let Some(e) = file_error {
        warn!("File logging disabled: {}", e);
    }
    guard
}

fn file_appender(config: &LoggingConfig) -> Result<RollingFileAppender> {
    fs::create_dir_all(&config.directory).map_err(|e| {
        SummaryError::Logging(format!(
            "cannot create log directory '{}': {}",
            config.directory.display(),
            e
        ))
    })?;

    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(config.file_name.clone())
        .build(&config.directory)
        .map_err(|e| {
            SummaryError::Logging(format!(
                "cannot open log file in '{}': {}",
                config.directory.display(),
                e
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_appender_creates_log_directory() {
        let dir = tempdir().unwrap();
        let config = LoggingConfig {
            directory: dir.path().join("nested").join("logs"),
            ..LoggingConfig::default()
        };

        assert!(file_appender(&config).is_ok());
        assert!(config.directory.is_dir());
    }

    #[test]
    fn test_file_appender_fails_when_directory_is_a_file() {
        let dir = tempdir().unwrap();
        let blocked = dir.path().join("logs");
        fs::write(&blocked, "not a directory").unwrap();
        let config = LoggingConfig {
            directory: blocked,
            ..LoggingConfig::default()
        };

        let err = file_appender(&config).unwrap_err();
        assert!(matches!(err, SummaryError::Logging(_)));
        assert!(err.to_string().contains("cannot create log directory"));
    }
}
