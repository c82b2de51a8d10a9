//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     TrackerConfig → identity → logging → geo → tokens → event writers
//!         → consumer → registered in CloserRegistry → AppConfig
//!
//! Shutdown (signals.rs + closers.rs):
//!     SIGTERM/SIGINT → AppConfig::close → CloserRegistry::close_all
//!         → every resource released in registration order
//! ```
//!
//! # Design Decisions
//! - Ordered startup: logging before everything that can fail loudly
//! - Release errors are logged and swallowed, never propagated
//! - The registry accepts concurrent registrations after bootstrap

pub mod closers;
pub mod signals;
pub mod startup;

pub use closers::{Closeable, CloserRegistry};
pub use startup::{AppConfig, BootstrapError};
