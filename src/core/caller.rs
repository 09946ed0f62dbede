//! Call-site resolution with per-site caching
//!
//! Function names come from symbol resolution, which is expensive. Each call
//! site is identified by the address of its `#[track_caller]` location, which
//! is stable for the lifetime of the program; the symbolized function name is
//! resolved once per site and cached, while the line number is read fresh
//! from the location on every call, including cache hits.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::panic::Location;
use std::sync::Arc;

/// Name used when a call site cannot be symbolized (stripped binaries,
/// inlined frames).
const UNRESOLVED: &str = "anonymous";

#[derive(Debug, Clone)]
pub struct CallerInfo {
    pub function: Arc<str>,
    pub line: u32,
}

/// Read-mostly cache of call-site function names, independent of the
/// destination lock.
#[derive(Default)]
pub struct CallerCache {
    names: RwLock<HashMap<usize, Arc<str>>>,
}

impl CallerCache {
    pub fn new() -> Self {
        Self {
            names: RwLock::new(HashMap::new()),
        }
    }

    pub fn resolve(&self, location: &'static Location<'static>) -> CallerInfo {
        let key = location as *const Location<'static> as usize;
        let line = location.line();

        if let Some(name) = self.names.read().get(&key) {
            return CallerInfo {
                function: Arc::clone(name),
                line,
            };
        }

        let function: Arc<str> =
            Arc::from(symbolize(location).unwrap_or_else(|| UNRESOLVED.to_string()));
        self.names.write().insert(key, Arc::clone(&function));

        CallerInfo { function, line }
    }
}

/// Walk the current stack and take the name of the innermost frame resolving
/// to the call site's source file.
fn symbolize(location: &Location<'_>) -> Option<String> {
    let mut found: Option<String> = None;
    backtrace::trace(|frame| {
        backtrace::resolve_frame(frame, |symbol| {
            if found.is_some() {
                return;
            }
            let in_caller_file = symbol
                .filename()
                .is_some_and(|file| file.ends_with(location.file()));
            if in_caller_file {
                if let Some(name) = symbol.name() {
                    found = Some(trim_hash(&name.to_string()));
                }
            }
        });
        found.is_none()
    });
    found
}

/// Mangled-then-demangled names carry a trailing `::h<hex>` disambiguator.
fn trim_hash(name: &str) -> String {
    match name.rfind("::h") {
        Some(idx) if name[idx + 3..].chars().all(|c| c.is_ascii_hexdigit())
            && !name[idx + 3..].is_empty() =>
        {
            name[..idx].to_string()
        }
        _ => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_hash() {
        assert_eq!(
            trim_hash("multilog::core::logger::tests::run::h1a2b3c4d5e6f7081"),
            "multilog::core::logger::tests::run"
        );
        assert_eq!(trim_hash("plain_name"), "plain_name");
        assert_eq!(trim_hash("ends::however"), "ends::however");
    }

    #[test]
    fn test_resolve_reports_call_line() {
        let cache = CallerCache::new();
        let info = cache.resolve(Location::caller());
        assert_eq!(info.line, line!() - 1);
        assert!(!info.function.is_empty());
    }

    #[test]
    fn test_repeated_site_hits_cache() {
        #[track_caller]
        fn resolve_here(cache: &CallerCache) -> CallerInfo {
            cache.resolve(Location::caller())
        }

        let cache = CallerCache::new();
        let mut infos = Vec::new();
        for _ in 0..3 {
            infos.push(resolve_here(&cache));
        }
        // One call site, three lookups: one resolution, identical results.
        assert_eq!(cache.names.read().len(), 1);
        assert_eq!(infos[0].function, infos[1].function);
        assert_eq!(infos[0].line, infos[2].line);
    }

    #[test]
    fn test_distinct_sites_get_distinct_lines() {
        let cache = CallerCache::new();
        let first = cache.resolve(Location::caller());
        let second = cache.resolve(Location::caller());
        assert_ne!(first.line, second.line);
    }
}
