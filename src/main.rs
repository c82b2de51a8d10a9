//! Event tracker server binary.
//!
//! Bootstraps the process configuration, then waits for a shutdown signal
//! and releases every scheduled resource in order.

use std::path::PathBuf;
use std::process::ExitCode;

use event_tracker::config::load_config;
use event_tracker::lifecycle::{signals, AppConfig};

#[tokio::main]
async fn main() -> ExitCode {
    let config_path =
        std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());

    let config = match load_config(&PathBuf::from(&config_path)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration from '{}': {}", config_path, e);
            return ExitCode::FAILURE;
        }
    };

    let app = match AppConfig::init(&config) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Failed to bootstrap: {}", e);
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        server_name = %app.server_name(),
        authority = %app.authority(),
        tokens = app.tokens().len(),
        "Event tracker ready"
    );

    signals::shutdown_signal().await;

    app.close();
    tracing::info!("Shutdown complete");
    ExitCode::SUCCESS
}
