//! Geo enrichment subsystem.
//!
//! # Data Flow
//! ```text
//! geo.maxmind_path (file or directory)
//!     → resolver.rs (open MaxMind database)
//!     → Resolver (shared read-only)
//!     → request layer resolves client IPs to locations
//! ```
//!
//! # Design Decisions
//! - The resolver is optional: a failed open degrades to "no geo
//!   enrichment", it never blocks startup
//! - Lookups return owned data so nothing borrows the database mapping

pub mod resolver;

pub use resolver::{GeoError, Location, Resolver};
