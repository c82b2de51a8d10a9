//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging via tracing: plain text on console, JSON on disk
//! - The file sink is non-blocking; its guard lives in AppConfig
//! - An already-installed subscriber is tolerated so embedding code and
//!   tests can bootstrap more than once

pub mod logging;
