//! Tabular shapes shared across the loader, processing steps and writer.

pub mod dataset;
pub mod table;

pub use dataset::Dataset;
pub use table::{Cell, Table};
