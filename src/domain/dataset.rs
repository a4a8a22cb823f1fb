use std::fmt;

/// The three source datasets the summary is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    /// One row per observed window collision
    Collisions,
    /// One row per species, with flight-call behavior (raw column names are shifted)
    FlightCalls,
    /// One row per day with a recorded light score
    LightLevels,
}

impl Dataset {
    /// Short label used in logs, metrics and error messages
    pub fn label(&self) -> &'static str {
        match self {
            Dataset::Collisions => "collisions",
            Dataset::FlightCalls => "flight_calls",
            Dataset::LightLevels => "light_levels",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
