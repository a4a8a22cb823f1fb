// Infrastructure adapters: file-backed implementations of the app ports

pub mod json_table_source;
pub mod summary_output_adapter;
