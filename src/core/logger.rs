//! The logging engine: dispatch, destinations, rotation task, shutdown
//!
//! [`Logger`] is a cheaply-cloneable handle; clones share configuration,
//! levels, destinations, and shutdown state, while fields are per-handle.
//! One background thread runs the periodic rotation/flush pass; watcher
//! threads are registered alongside it. Shutdown is a broadcast: dropping
//! the shared sender disconnects every task's receiver at once.

use super::caller::CallerCache;
use super::config::LoggerConfig;
use super::destination::DestinationManager;
use super::fields::Fields;
use super::format;
use super::level::{self, LevelPolicy, LevelRegistry};
use super::severity::Severity;
use chrono::Local;
use colored::Colorize;
use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeSet;
use std::panic::Location;
use std::sync::Arc;
use std::thread;

/// Call-scoped options for a single log call.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOptions {
    /// Suppress the console mirror for this call only.
    pub silence_console: bool,
}

impl LogOptions {
    pub fn silent() -> Self {
        Self {
            silence_console: true,
        }
    }
}

pub(crate) struct Shared {
    config: LoggerConfig,
    levels: RwLock<LevelRegistry>,
    destinations: Mutex<DestinationManager>,
    callers: CallerCache,
    /// Dropped at shutdown; every background task holds a cloned receiver
    /// and observes the disconnect.
    shutdown_tx: Mutex<Option<Sender<()>>>,
    pub(crate) shutdown_rx: Receiver<()>,
    /// Rotation task plus every watcher; joined before destinations close.
    pub(crate) tasks: Mutex<Vec<thread::JoinHandle<()>>>,
}

#[derive(Clone)]
pub struct Logger {
    pub(crate) shared: Arc<Shared>,
    fields: Fields,
}

impl Logger {
    /// One-time initializer. Registers the built-in levels, opens the
    /// destinations their folders need, and starts the rotation task.
    ///
    /// IO faults here are reported, not fatal: a folder that could not be
    /// pre-created is retried lazily on first write.
    pub fn new(config: LoggerConfig) -> Self {
        let (shutdown_tx, shutdown_rx) = unbounded::<()>();

        let mut registry = LevelRegistry::new();
        let colors = &config.colors;
        registry.register(
            level::PANIC,
            LevelPolicy::new(colors.panic, "error", Severity::Panic),
        );
        registry.register(
            level::ERROR,
            LevelPolicy::new(colors.error, "error", Severity::Error),
        );
        registry.register(
            level::WARN,
            LevelPolicy::new(colors.warn, "warn", Severity::Warn),
        );
        registry.register(
            level::INFO,
            LevelPolicy::new(colors.info, "info", Severity::Info),
        );
        registry.register(
            level::DEBUG,
            LevelPolicy::new(colors.debug, "debug", Severity::Debug),
        );
        registry.register(
            level::SUCCESS,
            LevelPolicy::new(colors.success, "info", Severity::Info),
        );
        registry.register(
            level::READER,
            LevelPolicy::new(colors.info, "reader", Severity::Info),
        );
        registry.register(
            level::CHANNEL,
            LevelPolicy::new(colors.info, "channel", Severity::Info),
        );

        let mut manager =
            DestinationManager::new(config.root.join("logs"), config.file_extension.clone());
        let folders: BTreeSet<String> = registry.file_folders().map(str::to_string).collect();
        for folder in &folders {
            if let Err(e) = manager.ensure(folder) {
                eprintln!(
                    "[LOGGER ERROR] Could not initialize destination '{}': {}",
                    folder, e
                );
            }
        }

        let shared = Arc::new(Shared {
            config,
            levels: RwLock::new(registry),
            destinations: Mutex::new(manager),
            callers: CallerCache::new(),
            shutdown_tx: Mutex::new(Some(shutdown_tx)),
            shutdown_rx,
            tasks: Mutex::new(Vec::new()),
        });

        spawn_rotation_task(&shared);

        Logger {
            shared,
            fields: Fields::new(),
        }
    }

    /// Add or override a level. The folder's destination opens now if the
    /// policy writes to file; a shared folder reuses the existing one.
    pub fn register_level(&self, name: impl Into<String>, policy: LevelPolicy) {
        let folder = policy.folder.clone();
        let to_file = policy.log_to_file;
        self.shared.levels.write().register(name, policy);
        if to_file {
            if let Err(e) = self.shared.destinations.lock().ensure(&folder) {
                eprintln!("[LOGGER ERROR] Could not open destination '{}': {}", folder, e);
            }
        }
    }

    /// Child handle with `fields` merged over this handle's fields.
    #[must_use]
    pub fn with_fields(&self, fields: Fields) -> Logger {
        Logger {
            shared: Arc::clone(&self.shared),
            fields: self.fields.merged(&fields),
        }
    }

    /// Handle bound to one level, for call sites that always log at it.
    #[must_use]
    pub fn level_logger(&self, level: impl Into<String>) -> LevelLogger {
        LevelLogger {
            logger: self.clone(),
            level: level.into(),
        }
    }

    #[track_caller]
    pub fn log(&self, level: &str, message: impl Into<String>) {
        self.dispatch(level, message.into(), LogOptions::default(), Location::caller());
    }

    #[track_caller]
    pub fn log_with(&self, level: &str, message: impl Into<String>, options: LogOptions) {
        self.dispatch(level, message.into(), options, Location::caller());
    }

    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) {
        self.dispatch(level::DEBUG, message.into(), LogOptions::default(), Location::caller());
    }

    #[track_caller]
    pub fn info(&self, message: impl Into<String>) {
        self.dispatch(level::INFO, message.into(), LogOptions::default(), Location::caller());
    }

    #[track_caller]
    pub fn warn(&self, message: impl Into<String>) {
        self.dispatch(level::WARN, message.into(), LogOptions::default(), Location::caller());
    }

    #[track_caller]
    pub fn error(&self, message: impl Into<String>) {
        self.dispatch(level::ERROR, message.into(), LogOptions::default(), Location::caller());
    }

    #[track_caller]
    pub fn success(&self, message: impl Into<String>) {
        self.dispatch(level::SUCCESS, message.into(), LogOptions::default(), Location::caller());
    }

    #[track_caller]
    pub fn reader(&self, message: impl Into<String>) {
        self.dispatch(level::READER, message.into(), LogOptions::default(), Location::caller());
    }

    #[track_caller]
    pub fn channel(&self, message: impl Into<String>) {
        self.dispatch(level::CHANNEL, message.into(), LogOptions::default(), Location::caller());
    }

    /// Render the entry and panic with it as the payload. Not gated on
    /// severity or destination policy: this always formats and always
    /// unwinds.
    #[track_caller]
    pub fn panic(&self, message: impl Into<String>) -> ! {
        let entry = self.render(level::PANIC, &message.into(), Location::caller());
        panic!("{}", entry);
    }

    fn dispatch(
        &self,
        level: &str,
        message: String,
        options: LogOptions,
        location: &'static Location<'static>,
    ) {
        let policy = {
            let levels = self.shared.levels.read();
            match levels.lookup(level) {
                Some(policy) if policy.severity >= self.shared.config.min_severity => {
                    policy.clone()
                }
                // Unknown or below-threshold levels drop silently.
                _ => return,
            }
        };

        let entry = self.render(level, &message, location);

        if policy.log_to_file {
            let mut destinations = self.shared.destinations.lock();
            if let Err(e) = destinations.write(&policy.folder, &entry) {
                eprintln!("[LOGGER ERROR] Write failed for '{}': {}", policy.folder, e);
            }
        }

        // Console IO happens outside the destination lock so slow terminals
        // never stall file writers.
        if policy.log_to_console && self.shared.config.log_console && !options.silence_console {
            let tag = format!("[{}]", level.to_uppercase()).color(policy.color);
            print!("{} {}", tag, entry);
        }
    }

    fn render(&self, level: &str, message: &str, location: &'static Location<'static>) -> String {
        let caller = self.shared.callers.resolve(location);
        format::render(
            &self.shared.config.format,
            level,
            &format::sanitize(message),
            &self.fields,
            Local::now(),
            &caller,
        )
    }

    /// Broadcast cancellation, wait for the rotation task and every watcher,
    /// then flush and close all destinations. Safe to call more than once;
    /// the second call finds shutdown already done and returns.
    pub fn shutdown(&self) {
        let sender = self.shared.shutdown_tx.lock().take();
        if sender.is_none() {
            return;
        }
        drop(sender);

        let handles: Vec<thread::JoinHandle<()>> = {
            let mut tasks = self.shared.tasks.lock();
            tasks.drain(..).collect()
        };
        for handle in handles {
            if handle.join().is_err() {
                eprintln!("[LOGGER ERROR] Background task panicked before shutdown");
            }
        }

        self.shared.destinations.lock().close();
    }
}

/// A handle pre-bound to one level.
#[derive(Clone)]
pub struct LevelLogger {
    logger: Logger,
    level: String,
}

impl LevelLogger {
    #[track_caller]
    pub fn log(&self, message: impl Into<String>) {
        self.logger.dispatch(
            &self.level,
            message.into(),
            LogOptions::default(),
            Location::caller(),
        );
    }

    #[track_caller]
    pub fn log_with(&self, message: impl Into<String>, options: LogOptions) {
        self.logger
            .dispatch(&self.level, message.into(), options, Location::caller());
    }
}

fn spawn_rotation_task(shared: &Arc<Shared>) {
    let ticker = crossbeam_channel::tick(shared.config.rotation_interval);
    let shutdown = shared.shutdown_rx.clone();
    let task_shared = Arc::clone(shared);
    let handle = thread::spawn(move || loop {
        crossbeam_channel::select! {
            recv(ticker) -> _ => {
                let max_size = task_shared.config.max_file_size;
                task_shared.destinations.lock().rotate_and_flush(max_size);
            }
            recv(shutdown) -> _ => break,
        }
    });
    shared.tasks.lock().push(handle);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn quiet_config(root: &Path) -> LoggerConfig {
        LoggerConfig::new(root)
            .with_console(false)
            .with_format("{level}: {message} {fields}")
    }

    fn folder_content(root: &Path, folder: &str) -> String {
        let dir = root.join("logs").join(folder);
        let mut content = String::new();
        if let Ok(entries) = fs::read_dir(dir) {
            for entry in entries.flatten() {
                content.push_str(&fs::read_to_string(entry.path()).unwrap_or_default());
            }
        }
        content
    }

    #[test]
    fn test_unknown_level_is_a_noop() {
        let dir = TempDir::new().expect("temp dir");
        let logger = Logger::new(quiet_config(dir.path()));
        logger.log("nope", "dropped");
        logger.shutdown();
        assert!(!dir.path().join("logs").join("nope").exists());
    }

    #[test]
    fn test_below_threshold_writes_nothing() {
        let dir = TempDir::new().expect("temp dir");
        let logger = Logger::new(quiet_config(dir.path()).with_min_severity(Severity::Warn));
        logger.info("x");
        logger.shutdown();
        assert_eq!(folder_content(dir.path(), "info"), "");
    }

    #[test]
    fn test_fields_travel_with_child_handle() {
        let dir = TempDir::new().expect("temp dir");
        let logger = Logger::new(quiet_config(dir.path()));
        let child = logger.with_fields(Fields::new().with("req", "abc"));
        child.info("handled");
        logger.info("bare");
        logger.shutdown();

        let content = folder_content(dir.path(), "info");
        assert!(content.contains("handled req=abc"));
        assert!(content.contains("bare \n"));
    }

    #[test]
    fn test_success_and_info_share_one_destination() {
        let dir = TempDir::new().expect("temp dir");
        let logger = Logger::new(quiet_config(dir.path()));
        logger.success("s");
        logger.info("i");
        logger.shutdown();

        let info_dir = dir.path().join("logs").join("info");
        assert_eq!(fs::read_dir(info_dir).unwrap().count(), 1);
        let content = folder_content(dir.path(), "info");
        assert!(content.contains("success: s"));
        assert!(content.contains("info: i"));
    }

    #[test]
    fn test_message_sanitized_to_one_line() {
        let dir = TempDir::new().expect("temp dir");
        let logger = Logger::new(quiet_config(dir.path()));
        logger.info("line1\nline2");
        logger.shutdown();
        let content = folder_content(dir.path(), "info");
        assert_eq!(content.lines().count(), 1);
        assert!(content.contains("line1\\nline2"));
    }

    #[test]
    #[should_panic(expected = "boom")]
    fn test_panic_carries_rendered_entry() {
        let dir = TempDir::new().expect("temp dir");
        let logger = Logger::new(quiet_config(dir.path()));
        logger.panic("boom");
    }

    #[test]
    fn test_level_logger_binds_its_level() {
        let dir = TempDir::new().expect("temp dir");
        let logger = Logger::new(quiet_config(dir.path()));
        let errors = logger.level_logger(level::ERROR);
        errors.log("bound");
        logger.shutdown();
        assert!(folder_content(dir.path(), "error").contains("error: bound"));
    }

    #[test]
    fn test_shutdown_twice_is_safe() {
        let dir = TempDir::new().expect("temp dir");
        let logger = Logger::new(quiet_config(dir.path()));
        logger.info("before");
        logger.shutdown();
        logger.shutdown();
        logger.info("after");
        assert!(folder_content(dir.path(), "info").contains("before"));
        assert!(!folder_content(dir.path(), "info").contains("after"));
    }
}
