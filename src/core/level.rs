//! Level identifiers, per-level policies, and the registry
//!
//! A level is a string name mapped to a [`LevelPolicy`]. Levels sharing a
//! target folder share one destination file. Unregistered names are a no-op
//! at dispatch time, not an error: callers and watchers may reference
//! optional levels a deployment chooses not to register.

use super::severity::Severity;
use colored::Color;
use std::collections::HashMap;

/// Built-in level names.
pub const PANIC: &str = "panic";
pub const ERROR: &str = "error";
pub const WARN: &str = "warn";
pub const INFO: &str = "info";
pub const DEBUG: &str = "debug";
pub const SUCCESS: &str = "success";
pub const READER: &str = "reader";
pub const CHANNEL: &str = "channel";

const BUILTIN: &[&str] = &[PANIC, ERROR, WARN, INFO, DEBUG, SUCCESS, READER, CHANNEL];

/// Output policy for one level.
#[derive(Debug, Clone)]
pub struct LevelPolicy {
    /// Console color for the level tag.
    pub color: Color,
    pub log_to_console: bool,
    pub log_to_file: bool,
    /// Target folder under the log root; levels may share one.
    pub folder: String,
    pub severity: Severity,
}

impl LevelPolicy {
    /// Policy with both console and file output enabled.
    pub fn new(color: Color, folder: impl Into<String>, severity: Severity) -> Self {
        Self {
            color,
            log_to_console: true,
            log_to_file: true,
            folder: folder.into(),
            severity,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_console(mut self, enabled: bool) -> Self {
        self.log_to_console = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_file(mut self, enabled: bool) -> Self {
        self.log_to_file = enabled;
        self
    }
}

#[derive(Default)]
pub struct LevelRegistry {
    policies: HashMap<String, LevelPolicy>,
}

impl LevelRegistry {
    pub fn new() -> Self {
        Self {
            policies: HashMap::new(),
        }
    }

    /// Insert or overwrite a policy. Overwriting a built-in level is reported
    /// but proceeds.
    pub fn register(&mut self, name: impl Into<String>, policy: LevelPolicy) {
        let name = name.into();
        if self.policies.contains_key(&name) && BUILTIN.contains(&name.as_str()) {
            eprintln!("[LOGGER WARNING] Overwriting built-in level '{}'", name);
        }
        self.policies.insert(name, policy);
    }

    pub fn lookup(&self, name: &str) -> Option<&LevelPolicy> {
        self.policies.get(name)
    }

    /// Folders referenced by any file-enabled level. May repeat names.
    pub fn file_folders(&self) -> impl Iterator<Item = &str> {
        self.policies
            .values()
            .filter(|policy| policy.log_to_file)
            .map(|policy| policy.folder.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(folder: &str, severity: Severity) -> LevelPolicy {
        LevelPolicy::new(Color::White, folder, severity)
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = LevelRegistry::new();
        registry.register("trace", policy("trace", Severity::Debug));
        assert!(registry.lookup("trace").is_some());
        assert!(registry.lookup("nope").is_none());
    }

    #[test]
    fn test_overwrite_replaces_policy() {
        let mut registry = LevelRegistry::new();
        registry.register(INFO, policy("info", Severity::Info));
        registry.register(INFO, policy("elsewhere", Severity::Warn));
        let current = registry.lookup(INFO).unwrap();
        assert_eq!(current.folder, "elsewhere");
        assert_eq!(current.severity, Severity::Warn);
    }

    #[test]
    fn test_file_folders_skips_console_only_levels() {
        let mut registry = LevelRegistry::new();
        registry.register("a", policy("shared", Severity::Info));
        registry.register("b", policy("shared", Severity::Info));
        registry.register("c", policy("console", Severity::Info).with_file(false));
        let folders: Vec<&str> = registry.file_folders().collect();
        assert_eq!(folders.len(), 2);
        assert!(folders.iter().all(|f| *f == "shared"));
    }
}
