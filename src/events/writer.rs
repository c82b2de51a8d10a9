//! Rotating event-log writers and their factory.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::config::schema::EventLogConfig;
use crate::security::TokenTable;

/// An open, releasable event sink.
pub trait EventWriter: Write + Send + std::fmt::Debug {
    /// Flush and release the underlying resource.
    fn close(&mut self) -> io::Result<()>;
}

/// Creates one named writer per authorized token.
///
/// Shared parameters (directory, rotation interval, backup count) live in
/// the factory; the per-resource name is passed per call.
pub trait WriterFactory {
    fn create_writer(&self, name: &str) -> io::Result<Box<dyn EventWriter>>;
}

/// Create one writer per token, keyed by token.
///
/// Tokens are visited in sorted order so repeated runs provision
/// identically. On the first factory error every writer created so far is
/// closed and the error is returned; remaining tokens are not attempted.
pub fn provision_writers(
    tokens: &TokenTable,
    factory: &dyn WriterFactory,
) -> io::Result<BTreeMap<String, Box<dyn EventWriter>>> {
    let mut writers: BTreeMap<String, Box<dyn EventWriter>> = BTreeMap::new();

    for token in tokens.iter() {
        let name = format!("event-{token}");
        match factory.create_writer(&name) {
            Ok(writer) => {
                writers.insert(token.to_string(), writer);
            }
            Err(e) => {
                tracing::error!(name = %name, error = %e, "failed to create event writer");
                for (token, mut writer) in writers {
                    if let Err(close_err) = writer.close() {
                        tracing::error!(
                            token = %token,
                            error = %close_err,
                            "failed to close writer while rolling back"
                        );
                    }
                }
                return Err(e);
            }
        }
    }

    Ok(writers)
}

/// Factory producing [`RollingFileWriter`]s in a shared directory.
pub struct FileWriterFactory {
    dir: PathBuf,
    rotation: Duration,
    max_backups: usize,
}

impl FileWriterFactory {
    pub fn new(dir: impl Into<PathBuf>, rotation: Duration, max_backups: usize) -> Self {
        Self {
            dir: dir.into(),
            rotation,
            max_backups,
        }
    }
}

impl From<&EventLogConfig> for FileWriterFactory {
    fn from(config: &EventLogConfig) -> Self {
        Self::new(
            PathBuf::from(config.path.as_str()),
            Duration::from_secs(config.rotation_min * 60),
            config.max_backups,
        )
    }
}

impl WriterFactory for FileWriterFactory {
    fn create_writer(&self, name: &str) -> io::Result<Box<dyn EventWriter>> {
        let writer = RollingFileWriter::new(&self.dir, name, self.rotation, self.max_backups)?;
        Ok(Box::new(writer))
    }
}

/// Append-only file writer that rotates on a fixed interval.
///
/// The active file is `<dir>/<name>.log`. Once the interval elapses the
/// active file is renamed to `<name>.<timestamp>.log` and a fresh one is
/// opened; at most `max_backups` rotated files are kept per name. A zero
/// interval disables rotation.
#[derive(Debug)]
pub struct RollingFileWriter {
    dir: PathBuf,
    name: String,
    rotation: Duration,
    max_backups: usize,
    file: File,
    opened_at: Instant,
}

impl RollingFileWriter {
    pub fn new(
        dir: &Path,
        name: &str,
        rotation: Duration,
        max_backups: usize,
    ) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        let file = open_active(dir, name)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            name: name.to_string(),
            rotation,
            max_backups,
            file,
            opened_at: Instant::now(),
        })
    }

    fn active_name(&self) -> String {
        format!("{}.log", self.name)
    }

    fn rotation_due(&self) -> bool {
        !self.rotation.is_zero() && self.opened_at.elapsed() >= self.rotation
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;

        let stamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%S%.3f");
        let rotated = self.dir.join(format!("{}.{}.log", self.name, stamp));
        fs::rename(self.dir.join(self.active_name()), &rotated)?;

        self.file = open_active(&self.dir, &self.name)?;
        self.opened_at = Instant::now();
        self.prune_backups();
        Ok(())
    }

    /// Remove the oldest rotated files beyond `max_backups`.
    ///
    /// Timestamps sort lexicographically, so a name sort orders backups
    /// oldest-first. Pruning failures are logged, never propagated.
    fn prune_backups(&self) {
        if self.max_backups == 0 {
            return;
        }

        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(_) => return,
        };

        let prefix = format!("{}.", self.name);
        let active = self.active_name();
        let mut backups: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .map(|n| n.starts_with(&prefix) && n.ends_with(".log") && n != active)
                    .unwrap_or(false)
            })
            .collect();
        backups.sort();

        while backups.len() > self.max_backups {
            let oldest = backups.remove(0);
            if let Err(e) = fs::remove_file(&oldest) {
                tracing::warn!(path = %oldest.display(), error = %e, "failed to remove rotated log");
            }
        }
    }
}

impl Write for RollingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.rotation_due() {
            self.rotate()?;
        }
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl EventWriter for RollingFileWriter {
    fn close(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

fn open_active(dir: &Path, name: &str) -> io::Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(format!("{name}.log")))
}
