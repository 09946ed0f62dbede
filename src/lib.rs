//! # Multilog
//!
//! A leveled, multi-destination logging engine: records are filtered by
//! severity, rendered through a token template, appended to rotating
//! per-level log files, and optionally mirrored in color to the console.
//! External line streams and channels can be attached as live producers.
//!
//! ## Features
//!
//! - **Per-level destinations**: levels sharing a folder share one file
//! - **Durable writes**: every record is flushed through to disk
//! - **Size-based rotation**: checked on a background timer
//! - **Live producers**: stream and channel watchers under broadcast
//!   cancellation
//! - **Thread safe**: designed for concurrent callers
//!
//! ## Example
//!
//! ```no_run
//! use multilog::{Fields, Logger, LoggerConfig, Severity};
//!
//! let logger = Logger::new(
//!     LoggerConfig::new("/var/tmp/myapp").with_min_severity(Severity::Debug),
//! );
//!
//! logger.info("service started");
//! multilog::info!(logger, "listening on port {}", 8080);
//!
//! let request_scoped = logger.with_fields(Fields::new().with("req", "abc-123"));
//! request_scoped.debug("headers parsed");
//!
//! logger.shutdown();
//! ```

pub mod core;
pub mod macros;
pub mod watchers;

// The channel watcher's source type comes from crossbeam and level colors
// come from colored; re-export both so callers need no separate dependency.
pub use colored;
pub use crossbeam_channel;

pub mod prelude {
    pub use crate::core::level;
    pub use crate::core::{
        CallerInfo, ColorScheme, FieldValue, Fields, LevelLogger, LevelPolicy, LogOptions, Logger,
        LoggerConfig, LoggerError, Result, Severity,
    };
}

pub use crate::core::level;
pub use crate::core::{
    CallerInfo, ColorScheme, FieldValue, Fields, LevelLogger, LevelPolicy, LogOptions, Logger,
    LoggerConfig, LoggerError, Result, Severity,
};
