//! Event output subsystem.
//!
//! # Data Flow
//! ```text
//! TokenTable
//!     → writer.rs (one rolling writer per token, named "event-<token>")
//!     → consumer.rs (channel + worker thread, fan-out per token)
//!     → CloserRegistry (released on shutdown)
//! ```
//!
//! # Design Decisions
//! - One writer per token: event streams never mix across credentials
//! - Provisioning is all-or-nothing: the first factory failure closes
//!   everything created so far and aborts bootstrap
//! - Writes are asynchronous: producers never block on file IO

pub mod consumer;
pub mod writer;

pub use consumer::MultiLoggerConsumer;
pub use writer::{
    provision_writers, EventWriter, FileWriterFactory, RollingFileWriter, WriterFactory,
};

use serde_json::Value;

/// Sink for authorized client events.
pub trait Consumer: Send + Sync {
    /// Accept one event payload on behalf of `token`.
    fn consume(&self, payload: Value, token: &str);
}
