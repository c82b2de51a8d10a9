//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::TrackerConfig;

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load configuration from a TOML file and apply environment overrides.
///
/// A missing file yields the default configuration so the server can boot
/// with nothing but environment values.
pub fn load_config(path: &Path) -> Result<TrackerConfig, ConfigError> {
    let mut config = match fs::read_to_string(path) {
        Ok(content) => toml::from_str::<TrackerConfig>(&content).map_err(ConfigError::Parse)?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => TrackerConfig::default(),
        Err(e) => return Err(ConfigError::Io(e)),
    };

    apply_env_overrides(&mut config);
    Ok(config)
}

/// `PORT` takes precedence over `server.port`.
fn apply_env_overrides(config: &mut TrackerConfig) {
    if let Some(port) = std::env::var("PORT").ok().and_then(|v| v.parse().ok()) {
        config.server.port = port;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    #[serial]
    fn test_missing_file_yields_defaults() {
        let config = load_config(Path::new("/nonexistent/tracker.toml")).unwrap();
        assert_eq!(config.server.port, 8001);
    }

    #[test]
    #[serial]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "[server]\nport = 9000\nauth = [\"abc\"]").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.auth, vec!["abc"]);
    }

    #[test]
    #[serial]
    fn test_invalid_toml_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "server = not valid").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    #[serial]
    fn test_port_env_override() {
        std::env::set_var("PORT", "7777");
        let config = load_config(Path::new("/nonexistent/tracker.toml")).unwrap();
        std::env::remove_var("PORT");
        assert_eq!(config.server.port, 7777);
    }
}
