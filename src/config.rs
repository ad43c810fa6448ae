use crate::error::{config_error, ToistoResult};
use crate::report::SortOrder;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;

/// Default path of the exported events file
pub const DEFAULT_EVENTS_FILE: &str = "events.json";

/// Optional configuration file, merged over the defaults
const CONFIG_FILE: &str = "config/toisto.toml";

/// Main configuration structure for the report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Timezone used to resolve the current wall-clock time
    pub timezone: String,
    /// Path of the exported events JSON file
    pub events_file: String,
    /// Sort order for the report rows
    pub sort_order: SortOrder,
}

/// Overrides loaded from the config file
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    timezone: Option<String>,
    events_file: Option<String>,
    sort_order: Option<SortOrder>,
}

impl Config {
    /// Load configuration from the config file and environment
    pub fn load() -> ToistoResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let mut timezone = String::from("UTC");
        let mut events_file = String::from(DEFAULT_EVENTS_FILE);
        let mut sort_order = SortOrder::default();

        // Config file overrides the defaults
        if let Ok(content) = fs::read_to_string(CONFIG_FILE) {
            let file: ConfigFile = toml::from_str(&content)?;
            if let Some(value) = file.timezone {
                timezone = value;
            }
            if let Some(value) = file.events_file {
                events_file = value;
            }
            if let Some(value) = file.sort_order {
                sort_order = value;
            }
        }

        // Environment overrides both
        if let Ok(value) = env::var("TIMEZONE") {
            timezone = value;
        }
        if let Ok(value) = env::var("EVENTS_FILE") {
            events_file = value;
        }
        if let Some(value) = env::var("REPORT_SORT").ok().and_then(|v| SortOrder::parse(&v)) {
            sort_order = value;
        }

        // Reject timezone names the tz database doesn't know
        if timezone.parse::<chrono_tz::Tz>().is_err() {
            return Err(config_error(&format!("Unknown timezone: {}", timezone)));
        }

        Ok(Config {
            timezone,
            events_file,
            sort_order,
        })
    }

    /// Resolve the configured timezone
    pub fn tz(&self) -> chrono_tz::Tz {
        self.timezone.parse().unwrap_or(chrono_tz::Tz::UTC)
    }
}
