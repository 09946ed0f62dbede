//! Logger configuration

use super::severity::Severity;
use colored::Color;
use std::path::PathBuf;
use std::time::Duration;

/// Default entry template.
pub const DEFAULT_FORMAT: &str = "[ {timestamp} ] [ {caller_func} → {caller_line} ]: {message} {fields}";

/// Console colors for the built-in levels, applied to the level tag only.
/// File output never carries escape codes.
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub panic: Color,
    pub error: Color,
    pub warn: Color,
    pub info: Color,
    pub success: Color,
    pub debug: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            panic: Color::TrueColor { r: 255, g: 0, b: 0 },
            error: Color::TrueColor { r: 234, g: 1, b: 1 },
            warn: Color::TrueColor {
                r: 234,
                g: 173,
                b: 1,
            },
            info: Color::TrueColor {
                r: 0,
                g: 86,
                b: 234,
            },
            success: Color::TrueColor {
                r: 1,
                g: 235,
                b: 110,
            },
            debug: Color::TrueColor {
                r: 128,
                g: 128,
                b: 128,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Root under which the `logs/` tree is created.
    pub root: PathBuf,
    pub colors: ColorScheme,
    /// Master switch for the console mirror.
    pub log_console: bool,
    /// Extension given to log file names.
    pub file_extension: String,
    /// Records below this rank are dropped.
    pub min_severity: Severity,
    /// Entry template; see [`crate::core::format`] for the token set.
    pub format: String,
    /// Size threshold checked at each rotation tick, in bytes.
    pub max_file_size: u64,
    /// Interval between rotation/flush passes.
    pub rotation_interval: Duration,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            colors: ColorScheme::default(),
            log_console: true,
            file_extension: "log".to_string(),
            min_severity: Severity::Info,
            format: DEFAULT_FORMAT.to_string(),
            max_file_size: 10 * 1024 * 1024,
            rotation_interval: Duration::from_secs(15),
        }
    }
}

impl LoggerConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_colors(mut self, colors: ColorScheme) -> Self {
        self.colors = colors;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_console(mut self, enabled: bool) -> Self {
        self.log_console = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_file_extension(mut self, extension: impl Into<String>) -> Self {
        self.file_extension = extension.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_min_severity(mut self, severity: Severity) -> Self {
        self.min_severity = severity;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_rotation_interval(mut self, interval: Duration) -> Self {
        self.rotation_interval = interval;
        self
    }
}
