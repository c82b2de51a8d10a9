//! Event Tracker Bootstrap Library
//!
//! # Architecture Overview
//!
//! ```text
//! config file (TOML) + env
//!         │
//!         ▼
//!     ┌────────┐        ┌───────────────┐
//!     │ config │───────▶│  lifecycle::  │
//!     └────────┘        │   startup     │
//!                       └───────┬───────┘
//!          ┌────────────┬───────┼────────────┬──────────────┐
//!          ▼            ▼       ▼            ▼              ▼
//!    ┌───────────┐ ┌────────┐ ┌─────┐ ┌───────────┐ ┌─────────────┐
//!    │observabil-│ │security│ │ geo │ │  events   │ │  lifecycle  │
//!    │ity (logs) │ │(tokens)│ │     │ │ (writers) │ │  (closers)  │
//!    └───────────┘ └────────┘ └─────┘ └───────────┘ └─────────────┘
//!                               │
//!                               ▼
//!                  AppConfig (composition root)
//!        identity · authority · tokens · consumer · resolver
//!                               │
//!                               ▼
//!              CloserRegistry → ordered shutdown
//! ```
//!
//! The crate stops at the bootstrap boundary: network serving and request
//! handling live in the layer that receives [`AppConfig`].

pub mod config;
pub mod events;
pub mod geo;
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::TrackerConfig;
pub use lifecycle::{AppConfig, BootstrapError};
pub use security::TokenTable;
