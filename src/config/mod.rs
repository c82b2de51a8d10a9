//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize, defaults when absent)
//!     → env overrides (PORT)
//!     → TrackerConfig (immutable for the process lifetime)
//! ```
//!
//! # Design Decisions
//! - Every field has a default so a missing file still boots the server
//! - Env overrides are applied by the loader, not scattered at use sites
//! - Config is immutable once loaded; there is no reload path

pub mod loader;
pub mod schema;

pub use loader::{load_config, ConfigError};
pub use schema::{EventLogConfig, GeoConfig, ServerConfig, ServerLogConfig, TrackerConfig};
