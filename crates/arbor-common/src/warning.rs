//! Unsupported-feature warnings with coloured terminal output.
//!
//! Each distinct message is printed once per process (until
//! [`clear_warnings`] is called), so a document full of `<svg>` children
//! produces one line instead of hundreds.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// ANSI color codes for terminal output
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// A poisoned lock only means another thread panicked mid-insert; the set is
/// still usable.
fn warned() -> MutexGuard<'static, Option<HashSet<String>>> {
    WARNED.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Warn about an unsupported feature (prints once per unique message).
///
/// # Example
/// ```
/// use arbor_common::warning::{clear_warnings, warn_once, warning_count};
///
/// clear_warnings();
/// warn_once("HTML", "legacy engine requested");
/// warn_once("HTML", "legacy engine requested");
/// assert_eq!(warning_count(), 1);
/// ```
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let should_print = warned().get_or_insert_with(HashSet::new).insert(key);

    if should_print {
        eprintln!("{YELLOW}[Arbor {component}] ⚠ {message}{RESET}");
    }
}

/// Number of distinct warnings printed since the last [`clear_warnings`].
#[must_use]
pub fn warning_count() -> usize {
    warned().as_ref().map_or(0, HashSet::len)
}

/// Forget all recorded warnings (call before parsing a new document).
pub fn clear_warnings() {
    if let Some(set) = warned().as_mut() {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_components_are_distinct_keys() {
        clear_warnings();
        warn_once("A", "same text");
        warn_once("B", "same text");
        warn_once("A", "same text");
        assert_eq!(warning_count(), 2);
    }
}
