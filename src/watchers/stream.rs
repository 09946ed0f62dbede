//! Line-oriented stream watcher

use crate::core::logger::Logger;
use crossbeam_channel::TryRecvError;
use std::io::{BufRead, BufReader, Read};
use std::thread;

impl Logger {
    /// Attach a line-oriented source; every line becomes one record at
    /// `level`.
    ///
    /// The watcher stops at EOF, on a read error, or once shutdown is
    /// broadcast. A read already in progress finishes first; cancellation
    /// is observed between lines.
    pub fn watch_stream<R>(&self, source: R, level: impl Into<String>)
    where
        R: Read + Send + 'static,
    {
        let logger = self.clone();
        let level = level.into();
        let shutdown = self.shared.shutdown_rx.clone();

        let handle = thread::spawn(move || {
            let reader = BufReader::new(source);
            for line in reader.lines() {
                if matches!(shutdown.try_recv(), Err(TryRecvError::Disconnected)) {
                    return;
                }
                match line {
                    Ok(line) => logger.log(&level, line),
                    Err(_) => return,
                }
            }
        });

        self.shared.tasks.lock().push(handle);
    }
}
