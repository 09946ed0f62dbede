//! Typed channel watcher
//!
//! The source is a typed receiver of string-convertible messages, resolved
//! at compile time; there is no runtime inspection of the channel and no
//! way to hand the watcher a non-channel value.

use crate::core::logger::Logger;
use crossbeam_channel::{Receiver, TryRecvError};
use std::thread;

impl Logger {
    /// Attach a receive-only message source; every message becomes one
    /// record at `level`, in arrival order.
    ///
    /// The watcher stops when the source disconnects (after draining any
    /// buffered messages) or as soon as shutdown is observed; messages
    /// arriving after cancellation are not relayed.
    pub fn watch_channel<T>(&self, source: Receiver<T>, level: impl Into<String>)
    where
        T: Into<String> + Send + 'static,
    {
        let logger = self.clone();
        let level = level.into();
        let shutdown = self.shared.shutdown_rx.clone();

        let handle = thread::spawn(move || loop {
            if matches!(shutdown.try_recv(), Err(TryRecvError::Disconnected)) {
                return;
            }
            crossbeam_channel::select! {
                recv(source) -> message => match message {
                    Ok(message) => logger.log(&level, message.into()),
                    Err(_) => return,
                },
                recv(shutdown) -> _ => return,
            }
        });

        self.shared.tasks.lock().push(handle);
    }
}
