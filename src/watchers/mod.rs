//! Live producers that feed external sources into the engine
//!
//! A watcher is a background thread turning an external source into log
//! calls on the shared dispatch path. All watchers observe the logger's
//! broadcast shutdown signal; their handles are joined during shutdown
//! before any destination closes.

pub mod channel;
pub mod stream;
