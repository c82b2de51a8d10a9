//! Global tracing initialization.

use std::io;
use std::path::Path;
use std::time::Duration;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::schema::ServerLogConfig;
use crate::events::writer::RollingFileWriter;

/// Name of the process log, as opposed to per-token event logs.
const MAIN_LOG: &str = "main";

/// Install the global subscriber: a console layer always, plus a JSON file
/// layer when a log directory is configured.
///
/// Returns the guard keeping the non-blocking file worker alive; the
/// caller holds it for the process lifetime. Preparing the file sink can
/// fail; a subscriber installed earlier in the process is not an error.
pub fn init(server_name: &str, config: &ServerLogConfig) -> io::Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_level(true);

    if config.path.is_empty() {
        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .try_init();
        return Ok(None);
    }

    let writer = RollingFileWriter::new(
        Path::new(&config.path),
        MAIN_LOG,
        Duration::from_secs(config.rotation_min * 60),
        config.max_backups,
    )?;
    let (file_writer, guard) = tracing_appender::non_blocking(writer);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .json();

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    tracing::info!(server_name = %server_name, dir = %config.path, "Logging initialized");
    Ok(Some(guard))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_path_needs_no_guard() {
        let config = ServerLogConfig::default();
        let guard = init("test-server", &config).unwrap();
        assert!(guard.is_none());
    }

    #[test]
    fn test_file_sink_created_in_configured_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerLogConfig {
            path: dir.path().to_string_lossy().into_owned(),
            rotation_min: 0,
            max_backups: 0,
        };

        let guard = init("test-server", &config).unwrap();
        assert!(guard.is_some());
        assert!(dir.path().join("main.log").exists());
    }

    #[test]
    fn test_unwritable_dir_is_fatal() {
        let config = ServerLogConfig {
            path: "/proc/no-such-dir/logs".to_string(),
            rotation_min: 0,
            max_backups: 0,
        };
        assert!(init("test-server", &config).is_err());
    }
}
