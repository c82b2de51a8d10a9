//! Multiplexed asynchronous event consumer.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;
use std::thread::{self, JoinHandle};

use serde_json::Value;

use crate::events::writer::EventWriter;
use crate::events::Consumer;
use crate::lifecycle::closers::Closeable;

struct EventRecord {
    token: String,
    payload: Value,
}

/// Fans events out to one writer per token.
///
/// Writes happen on a dedicated worker thread fed by a channel, so
/// [`Consumer::consume`] never blocks on file IO. Closing stops intake,
/// drains pending events and closes every writer.
#[derive(Debug)]
pub struct MultiLoggerConsumer {
    sender: Mutex<Option<Sender<EventRecord>>>,
    worker: Mutex<Option<JoinHandle<io::Result<()>>>>,
}

impl MultiLoggerConsumer {
    pub fn new(writers: BTreeMap<String, Box<dyn EventWriter>>) -> Self {
        let (sender, receiver) = mpsc::channel();
        let worker = thread::spawn(move || run_worker(writers, receiver));
        Self {
            sender: Mutex::new(Some(sender)),
            worker: Mutex::new(Some(worker)),
        }
    }
}

impl Consumer for MultiLoggerConsumer {
    fn consume(&self, payload: Value, token: &str) {
        let guard = self.sender.lock().unwrap();
        let Some(sender) = guard.as_ref() else {
            tracing::warn!(token = %token, "event dropped, consumer already closed");
            return;
        };

        let record = EventRecord {
            token: token.to_string(),
            payload,
        };
        if sender.send(record).is_err() {
            tracing::error!(token = %token, "event dropped, consumer worker is gone");
        }
    }
}

impl Closeable for MultiLoggerConsumer {
    /// Stop intake, drain pending events and close every writer.
    ///
    /// Safe to call more than once; later calls are no-ops.
    fn close(&self) -> io::Result<()> {
        // Dropping the sender disconnects the channel; the worker drains
        // whatever is queued and then releases the writers.
        drop(self.sender.lock().unwrap().take());

        let Some(worker) = self.worker.lock().unwrap().take() else {
            return Ok(());
        };
        match worker.join() {
            Ok(result) => result,
            Err(_) => Err(io::Error::new(
                io::ErrorKind::Other,
                "events worker panicked",
            )),
        }
    }
}

fn run_worker(
    mut writers: BTreeMap<String, Box<dyn EventWriter>>,
    receiver: Receiver<EventRecord>,
) -> io::Result<()> {
    while let Ok(record) = receiver.recv() {
        let Some(writer) = writers.get_mut(&record.token) else {
            tracing::warn!(token = %record.token, "no writer for token, event dropped");
            continue;
        };

        match serde_json::to_vec(&record.payload) {
            Ok(mut line) => {
                line.push(b'\n');
                if let Err(e) = writer.write_all(&line) {
                    tracing::error!(token = %record.token, error = %e, "failed to write event");
                }
            }
            Err(e) => {
                tracing::error!(token = %record.token, error = %e, "failed to serialize event");
            }
        }
    }

    // Channel disconnected: every writer gets a close attempt, first
    // failure is reported after all attempts.
    let mut first_err = None;
    for (token, mut writer) in writers {
        if let Err(e) = writer.close() {
            tracing::error!(token = %token, error = %e, "failed to close event writer");
            first_err.get_or_insert(e);
        }
    }
    match first_err {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
