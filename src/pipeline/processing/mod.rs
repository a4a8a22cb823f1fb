// Pipeline processing: cleaning, column remapping and joins

pub mod clean;
pub mod join;
pub mod remap;
