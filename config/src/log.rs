use std::time::Duration;

use serde::Deserialize;

#[derive(Deserialize)]
pub struct LogConfig {
    display_level: bool,
    level_filter: String,
    #[serde(deserialize_with = "duration_str::deserialize_duration")]
    db_ttl: Duration,
}

impl LogConfig {
    pub fn display_level(&self) -> &bool {
        &self.display_level
    }

    pub fn level_filter(&self) -> &str {
        &self.level_filter
    }

    /// How long activity log entries are kept in the database.
    pub fn db_ttl(&self) -> &Duration {
        &self.db_ttl
    }
}
