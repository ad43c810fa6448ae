use crate::config::Config;
use crate::error::{calendar_data_error, Error, ToistoResult};
use crate::models::{CalendarEvent, EventListResponse};
use crate::recurrence::compute_stats;
use crate::report::{render_report, sort_events};
use chrono::Utc;
use std::fs;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load and validate the application config
pub fn load_config() -> miette::Result<Config> {
    match Config::load() {
        Ok(config) => Ok(config),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Read the events export and print the recurrence report
pub fn run_report(config: &Config) -> miette::Result<()> {
    let events = read_events(&config.events_file)?;
    info!("Loaded {} events from {}", events.len(), config.events_file);

    // Resolve "now" as wall-clock time in the configured timezone; the
    // derivation layer itself never reads the clock
    let now = Utc::now().with_timezone(&config.tz()).naive_local();

    let stats = compute_stats(&events, now);
    let rows = sort_events(events, now, config.sort_order);
    print!("{}", render_report(&rows, &stats));

    Ok(())
}

/// Read events from an exported JSON file, either a bare array or the
/// provider's list payload with an `items` field
pub fn read_events(path: &str) -> ToistoResult<Vec<CalendarEvent>> {
    let content = fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&content)?;

    match value {
        serde_json::Value::Array(_) => Ok(serde_json::from_value(value)?),
        serde_json::Value::Object(ref map) if map.contains_key("items") => {
            let response: EventListResponse = serde_json::from_value(value)?;
            Ok(response.items)
        }
        _ => Err(calendar_data_error(
            "Events file is neither an event array nor a list payload",
        )),
    }
}
