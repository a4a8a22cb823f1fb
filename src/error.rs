use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("File not found :: {}", .path.display())]
    InputNotFound { path: PathBuf },

    #[error("JSON parsing failed for {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported table layout in {}: {reason}", .path.display())]
    UnsupportedLayout { path: PathBuf, reason: String },

    #[error("Unsupported value in column '{column}' of {}: nested arrays and objects are not table cells", .path.display())]
    UnsupportedValue { path: PathBuf, column: String },

    #[error("Missing join column '{column}' in {table} table")]
    MissingColumn { table: String, column: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("Metrics error: {0}")]
    Metrics(String),
}

pub type Result<T> = std::result::Result<T, SummaryError>;
