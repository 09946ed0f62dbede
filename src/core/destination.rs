//! Per-folder buffered destinations with size-triggered rotation
//!
//! Every target folder owns at most one open file at a time, wrapped in a
//! fixed-size buffered writer. Writes flush immediately: durability is
//! favored over raw throughput. Size is only checked on the periodic
//! rotation pass, never on the write path, so a burst between ticks may
//! transiently exceed the configured maximum.

use super::error::{LoggerError, Result};
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Buffer capacity for every destination writer.
const WRITER_CAPACITY: usize = 32 * 1024;

/// One open log file. Rotation replaces the whole value; the old handle
/// drops only after its buffer is flushed.
struct Destination {
    path: PathBuf,
    writer: BufWriter<File>,
}

pub struct DestinationManager {
    /// `<config root>/logs`
    root: PathBuf,
    extension: String,
    destinations: HashMap<String, Destination>,
    closed: bool,
}

impl DestinationManager {
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
            destinations: HashMap::new(),
            closed: false,
        }
    }

    /// Open the folder's destination if it is not already open. Idempotent:
    /// a folder shared by several levels gets exactly one file handle.
    pub fn ensure(&mut self, folder: &str) -> Result<()> {
        if self.closed || self.destinations.contains_key(folder) {
            return Ok(());
        }
        let destination = self.open(folder)?;
        self.destinations.insert(folder.to_string(), destination);
        Ok(())
    }

    fn open(&self, folder: &str) -> Result<Destination> {
        let dir = self.root.join(folder);
        fs::create_dir_all(&dir).map_err(|e| {
            LoggerError::io_operation("creating log folder", dir.display().to_string(), e)
        })?;

        let name = format!("log_{}_{}.{}", folder, unix_nanos(), self.extension);
        let path = dir.join(name);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                LoggerError::io_operation("opening log file", path.display().to_string(), e)
            })?;

        Ok(Destination {
            path,
            writer: BufWriter::with_capacity(WRITER_CAPACITY, file),
        })
    }

    /// Append one rendered entry and flush it through to the file.
    ///
    /// After shutdown the manager is closed and writes are discarded.
    pub fn write(&mut self, folder: &str, entry: &str) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.ensure(folder)?;
        let destination =
            self.destinations
                .get_mut(folder)
                .ok_or_else(|| LoggerError::DestinationMissing {
                    folder: folder.to_string(),
                })?;
        destination.writer.write_all(entry.as_bytes())?;
        destination.writer.flush()?;
        Ok(())
    }

    /// Flush every destination and replace any file grown past `max_size`
    /// with a fresh one. A failing folder is reported and skipped for this
    /// cycle; the others proceed.
    pub fn rotate_and_flush(&mut self, max_size: u64) {
        if self.closed {
            return;
        }
        let folders: Vec<String> = self.destinations.keys().cloned().collect();
        for folder in folders {
            if let Err(e) = self.rotate_one(&folder, max_size) {
                eprintln!("[LOGGER ERROR] Rotation skipped for '{}': {}", folder, e);
            }
        }
    }

    fn rotate_one(&mut self, folder: &str, max_size: u64) -> Result<()> {
        let size = {
            let destination =
                self.destinations
                    .get_mut(folder)
                    .ok_or_else(|| LoggerError::DestinationMissing {
                        folder: folder.to_string(),
                    })?;
            destination.writer.flush().map_err(|e| {
                LoggerError::io_operation("flushing", destination.path.display().to_string(), e)
            })?;
            destination
                .writer
                .get_ref()
                .metadata()
                .map_err(|e| {
                    LoggerError::rotation(destination.path.display().to_string(), e.to_string())
                })?
                .len()
        };

        if size > max_size {
            let fresh = self.open(folder)?;
            // The old destination drops here; its buffer was flushed above.
            self.destinations.insert(folder.to_string(), fresh);
        }
        Ok(())
    }

    /// Flush and drop every destination. Further writes are discarded.
    pub fn close(&mut self) {
        for (folder, destination) in self.destinations.iter_mut() {
            if let Err(e) = destination.writer.flush() {
                eprintln!(
                    "[LOGGER ERROR] Flush failed for '{}' during shutdown: {}",
                    folder, e
                );
            }
        }
        self.destinations.clear();
        self.closed = true;
    }
}

fn unix_nanos() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos()
}
