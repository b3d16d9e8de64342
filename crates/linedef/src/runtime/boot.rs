//! Boot: logging init and config load.

use tracing::{info, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::conf::ParserConfig;

/// Initialise the tracing / logging subsystem.
///
/// Logs go to stderr so that stdout carries only parsed records.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "linedef=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Load and validate the configuration.
pub fn boot() -> Result<ParserConfig, Box<dyn std::error::Error>> {
    info!("Starting linedef v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration (file or env)
    let config = ParserConfig::load()?;
    config.validate().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;

    info!(
        "Loaded configuration: format={:?}, max_line_size={}, detection_sample_size={}",
        config.format, config.max_line_size, config.detection_sample_size
    );
    info!(
        "Reporting: anomalies={}, unmatched={}",
        config.report_anomalies, config.emit_unmatched
    );

    Ok(config)
}
