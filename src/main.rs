use toisto::startup;
use tracing::info;

fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting toisto");

    // Load configuration
    let config = startup::load_config()?;

    // Produce the recurrence report
    startup::run_report(&config)
}
