/// Dataset and column name constants shared across the pipeline
/// These mirror the names used by the Chicago collision exports

// Default input file names (looked up inside the input directory)
pub const COLLISIONS_FILE: &str = "chicago_collision_data.json";
pub const FLIGHT_CALLS_FILE: &str = "flight_call.json";
pub const LIGHT_LEVELS_FILE: &str = "light_levels.json";

// Join keys
pub const DATE_COLUMN: &str = "Date";
pub const GENUS_COLUMN: &str = "Genus";
pub const SPECIES_COLUMN: &str = "Species";

// Suffixes applied to non-key columns present on both sides of a join
pub const LEFT_SUFFIX: &str = "_x";
pub const RIGHT_SUFFIX: &str = "_y";

/// The single date format accepted in date columns
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// Logging defaults
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_LOG_FILE: &str = "bird_summary.log";
pub const DEFAULT_LOG_FILTER: &str = "bird_summary=info";
