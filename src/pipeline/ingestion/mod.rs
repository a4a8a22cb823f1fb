// Pipeline ingestion: reading JSON exports into tables

pub mod loader;

pub use loader::load_table;
