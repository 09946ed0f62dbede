//! Entry rendering via token substitution
//!
//! Templates are plain strings carrying literal, case-sensitive tokens:
//! `{timestamp}`, `{level}`, `{message}`, `{fields}`, `{caller_func}`,
//! `{caller_line}`. Unknown tokens pass through unchanged; missing data
//! (an empty field set) renders as the empty string. Rendered entries end
//! with exactly one newline.

use super::caller::CallerInfo;
use super::fields::Fields;
use chrono::{DateTime, Local};

/// Wall-clock format used for `{timestamp}`, millisecond precision.
pub const TIMESTAMP_FORMAT: &str = "%H:%M:%S%.3f";

pub fn render(
    template: &str,
    level: &str,
    message: &str,
    fields: &Fields,
    timestamp: DateTime<Local>,
    caller: &CallerInfo,
) -> String {
    let fields_text = if fields.is_empty() {
        String::new()
    } else {
        fields.render()
    };

    let mut entry = template.replace(
        "{timestamp}",
        &timestamp.format(TIMESTAMP_FORMAT).to_string(),
    );
    entry = entry.replace("{level}", level);
    entry = entry.replace("{message}", message);
    entry = entry.replace("{fields}", &fields_text);
    entry = entry.replace("{caller_func}", &caller.function);
    entry = entry.replace("{caller_line}", &caller.line.to_string());
    entry.push('\n');
    entry
}

/// Escape control characters so one record is always one physical line.
pub fn sanitize(message: &str) -> String {
    message
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn caller() -> CallerInfo {
        CallerInfo {
            function: Arc::from("app::startup"),
            line: 42,
        }
    }

    #[test]
    fn test_all_tokens_substituted() {
        let fields = Fields::new().with("a", 1);
        let entry = render(
            "{level} {message} {fields} {caller_func}:{caller_line}",
            "info",
            "ready",
            &fields,
            Local::now(),
            &caller(),
        );
        assert_eq!(entry, "info ready a=1 app::startup:42\n");
    }

    #[test]
    fn test_unknown_token_passes_through() {
        let entry = render(
            "{level} {nope} {message}",
            "warn",
            "x",
            &Fields::new(),
            Local::now(),
            &caller(),
        );
        assert_eq!(entry, "warn {nope} x\n");
    }

    #[test]
    fn test_empty_fields_render_empty() {
        let entry = render(
            "{message}|{fields}|",
            "info",
            "m",
            &Fields::new(),
            Local::now(),
            &caller(),
        );
        assert_eq!(entry, "m||\n");
    }

    #[test]
    fn test_single_trailing_newline() {
        let entry = render(
            "{message}",
            "info",
            "m",
            &Fields::new(),
            Local::now(),
            &caller(),
        );
        assert!(entry.ends_with('\n'));
        assert!(!entry.ends_with("\n\n"));
    }

    #[test]
    fn test_sanitize_escapes_control_characters() {
        assert_eq!(sanitize("a\nb\rc\td"), "a\\nb\\rc\\td");
        assert_eq!(sanitize("clean"), "clean");
    }
}
