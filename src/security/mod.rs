//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Configured token list
//!     → tokens.rs (trim, dedup, autogenerate fallback)
//!     → TokenTable (immutable, shared read-only)
//!     → consulted by the request layer on every authorization check
//! ```
//!
//! # Design Decisions
//! - Tokens are opaque: no structure imposed beyond uniqueness
//! - The table is never empty: a generated credential beats an open server
//! - Exact-string, case-sensitive comparison

pub mod tokens;

pub use tokens::TokenTable;
