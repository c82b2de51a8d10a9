//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.
//! Every field has a default so a minimal (or missing) config still boots.

use serde::{Deserialize, Serialize};

/// Root configuration for the event tracker.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TrackerConfig {
    /// Server identity, port and authorization settings.
    pub server: ServerConfig,

    /// Geo enrichment settings.
    pub geo: GeoConfig,

    /// Per-token event log settings.
    pub events: EventLogConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// TCP port the request layer binds to.
    pub port: u16,

    /// Public URL advertised to clients. Empty means "derive from the Host
    /// header".
    pub public_url: String,

    /// Authorized bearer tokens. Accepts a TOML list or a single
    /// comma-separated string.
    #[serde(deserialize_with = "string_or_seq")]
    pub auth: Vec<String>,

    /// Process log settings.
    pub log: ServerLogConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            public_url: String::new(),
            auth: Vec::new(),
            log: ServerLogConfig::default(),
        }
    }
}

/// Process log configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerLogConfig {
    /// Directory for the process log. Empty disables the file sink.
    pub path: String,

    /// Minutes between rotations. 0 disables rotation.
    pub rotation_min: u64,

    /// Rotated files kept. 0 keeps all.
    pub max_backups: usize,
}

impl Default for ServerLogConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            rotation_min: default_rotation_min(),
            max_backups: 0,
        }
    }
}

/// Geo enrichment configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GeoConfig {
    /// MaxMind database file, or a directory containing
    /// `GeoLite2-City.mmdb`.
    pub maxmind_path: String,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            maxmind_path: "/home/tracker/app/res/".to_string(),
        }
    }
}

/// Per-token event log configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EventLogConfig {
    /// Directory for per-token event logs.
    pub path: String,

    /// Minutes between rotations. 0 disables rotation.
    pub rotation_min: u64,

    /// Rotated files kept per token. 0 keeps all.
    pub max_backups: usize,
}

impl Default for EventLogConfig {
    fn default() -> Self {
        Self {
            path: "/home/tracker/logs/events".to_string(),
            rotation_min: default_rotation_min(),
            max_backups: 0,
        }
    }
}

fn default_port() -> u16 {
    8001
}

fn default_rotation_min() -> u64 {
    5
}

/// Deserialize either a list of strings or one comma-separated string.
fn string_or_seq<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct StringOrSeq;

    impl<'de> serde::de::Visitor<'de> for StringOrSeq {
        type Value = Vec<String>;

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(v.split(',').map(str::to_string).collect())
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: serde::de::SeqAccess<'de>,
        {
            let mut out = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                out.push(item);
            }
            Ok(out)
        }
    }

    deserializer.deserialize_any(StringOrSeq)
}
