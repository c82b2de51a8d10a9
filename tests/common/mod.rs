//! Shared fakes for bootstrap integration tests.

use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use event_tracker::events::{EventWriter, WriterFactory};

/// Writer that records bytes and counts close calls.
#[derive(Debug)]
pub struct RecordingWriter {
    buf: Arc<Mutex<Vec<u8>>>,
    closes: Arc<AtomicUsize>,
}

impl Write for RecordingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl EventWriter for RecordingWriter {
    fn close(&mut self) -> io::Result<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Handle onto one created writer's observable state.
pub struct CreatedWriter {
    pub name: String,
    pub buf: Arc<Mutex<Vec<u8>>>,
    pub closes: Arc<AtomicUsize>,
}

impl CreatedWriter {
    pub fn written(&self) -> String {
        String::from_utf8(self.buf.lock().unwrap().clone()).unwrap()
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

/// Factory that fails on the nth call (1-based) and records every created
/// writer.
pub struct FlakyFactory {
    fail_on: Option<usize>,
    calls: AtomicUsize,
    pub created: Mutex<Vec<CreatedWriter>>,
}

impl FlakyFactory {
    pub fn new(fail_on: Option<usize>) -> Self {
        Self {
            fail_on,
            calls: AtomicUsize::new(0),
            created: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl WriterFactory for FlakyFactory {
    fn create_writer(&self, name: &str) -> io::Result<Box<dyn EventWriter>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on == Some(call) {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                "injected factory failure",
            ));
        }

        let buf = Arc::new(Mutex::new(Vec::new()));
        let closes = Arc::new(AtomicUsize::new(0));
        self.created.lock().unwrap().push(CreatedWriter {
            name: name.to_string(),
            buf: buf.clone(),
            closes: closes.clone(),
        });
        Ok(Box::new(RecordingWriter { buf, closes }))
    }
}
