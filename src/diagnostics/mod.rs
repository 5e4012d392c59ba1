//! Diagnostic mapping for scanner error output
//!
//! ScanCode reports failures as free-form text blocks. Two mapping
//! passes rewrite the known classes into compact one-line messages and
//! report whether the whole list is homogeneous:
//!
//! - [`map_unknown_errors`] compacts `ERROR: Unknown error:` tracebacks
//!   and answers whether every entry was a `MemoryError`,
//! - [`map_timeout_errors`] compacts per-file timeout interrupts at the
//!   configured timeout and answers whether every entry was one.
//!
//! A non-zero scanner exit with a homogeneous list of either class is
//! still a successful scan; anything else is fatal. After each pass the
//! list is deduplicated by message text, first occurrence wins.
//!
//! The two patterns are a contract with ScanCode's output format. Each
//! is applied to a diagnostic entry as a whole, exactly once — entries
//! are never re-split across newlines. The named groups stay stable so
//! new error kinds can be classified without touching call sites.

use crate::model::Diagnostic;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Seconds after which the scanner interrupts processing of one file.
pub const DEFAULT_TIMEOUT: u64 = 300;

static UNKNOWN_ERROR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?s)\A(ERROR: for scanner: (?P<scanner>\w+):\n)?",
        r"ERROR: Unknown error:\n.+\n(?P<error>\w+Error)(:|\n)",
        r"(?P<message>.*) \(File: (?P<file>.+)\)\z",
    ))
    .unwrap()
});

static TIMEOUT_ERROR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"\A(ERROR: for scanner: (?P<scanner>\w+):\n)?",
        r"ERROR: Processing interrupted: timeout after (?P<timeout>\d+) seconds. ",
        r"\(File: (?P<file>.+)\)\z",
    ))
    .unwrap()
});

/// Rewrite `Unknown error` blocks into compact messages, in place.
///
/// Returns `true` iff the list was non-empty on entry and every entry
/// matched the pattern with a `MemoryError` — the signal that a failed
/// scanner run only ran out of memory on individual files.
pub fn map_unknown_errors(diagnostics: &mut Vec<Diagnostic>) -> bool {
    if diagnostics.is_empty() {
        return false;
    }

    let mut only_memory_errors = true;

    let mapped: Vec<Diagnostic> = diagnostics
        .iter()
        .map(|diagnostic| match UNKNOWN_ERROR_REGEX.captures(&diagnostic.message) {
            Some(captures) => {
                let file = &captures["file"];
                let error = &captures["error"];
                if error == "MemoryError" {
                    Diagnostic {
                        message: format!("ERROR: MemoryError while scanning file '{file}'."),
                        ..diagnostic.clone()
                    }
                } else {
                    only_memory_errors = false;
                    let message = captures["message"].trim();
                    Diagnostic {
                        message: format!(
                            "ERROR: {error} while scanning file '{file}' ({message})."
                        ),
                        ..diagnostic.clone()
                    }
                }
            }
            None => {
                only_memory_errors = false;
                diagnostic.clone()
            }
        })
        .collect();

    replace_deduplicated(diagnostics, mapped);
    only_memory_errors
}

/// Rewrite timeout interrupts into compact messages, in place.
///
/// A match only counts when the reported timeout equals `timeout`.
/// Returns `true` iff the list was non-empty on entry and every entry
/// was such a timeout.
pub fn map_timeout_errors(diagnostics: &mut Vec<Diagnostic>, timeout: u64) -> bool {
    if diagnostics.is_empty() {
        return false;
    }

    let mut only_timeout_errors = true;
    let timeout_text = timeout.to_string();

    let mapped: Vec<Diagnostic> = diagnostics
        .iter()
        .map(|diagnostic| match TIMEOUT_ERROR_REGEX.captures(&diagnostic.message) {
            Some(captures) if &captures["timeout"] == timeout_text => {
                let file = &captures["file"];
                Diagnostic {
                    message: format!(
                        "ERROR: Timeout after {timeout} seconds while scanning file '{file}'."
                    ),
                    ..diagnostic.clone()
                }
            }
            _ => {
                only_timeout_errors = false;
                diagnostic.clone()
            }
        })
        .collect();

    replace_deduplicated(diagnostics, mapped);
    only_timeout_errors
}

fn replace_deduplicated(diagnostics: &mut Vec<Diagnostic>, mapped: Vec<Diagnostic>) {
    let before = mapped.len();
    let mut seen = HashSet::new();
    diagnostics.clear();
    diagnostics.extend(
        mapped
            .into_iter()
            .filter(|diagnostic| seen.insert(diagnostic.message.clone())),
    );
    if diagnostics.len() < before {
        tracing::debug!(
            "Deduplicated {} diagnostics down to {}",
            before,
            diagnostics.len()
        );
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn diagnostic(message: impl Into<String>) -> Diagnostic {
        Diagnostic::new("ScanCode", message)
    }

    fn memory_error(file: &str) -> Diagnostic {
        diagnostic(format!(
            "ERROR: Unknown error:\n\
             Traceback (most recent call last):\n\
             \x20 File \"scancode/cli.py\", line 878, in scan_infile\n\
             MemoryError\n\
             \x20(File: {file})"
        ))
    }

    fn runtime_error(file: &str) -> Diagnostic {
        diagnostic(format!(
            "ERROR: Unknown error:\n\
             Traceback (most recent call last):\n\
             \x20 File \"scancode/cli.py\", line 878, in scan_infile\n\
             RuntimeError: interrupted (File: {file})"
        ))
    }

    fn timeout_error(seconds: u64, file: &str) -> Diagnostic {
        diagnostic(format!(
            "ERROR: Processing interrupted: timeout after {seconds} seconds. (File: {file})"
        ))
    }

    #[test]
    fn test_memory_errors_are_compacted_and_homogeneous() {
        let mut diagnostics = vec![memory_error("x"), memory_error("y")];
        assert!(map_unknown_errors(&mut diagnostics));
        assert_eq!(
            diagnostics[0].message,
            "ERROR: MemoryError while scanning file 'x'."
        );
        assert_eq!(
            diagnostics[1].message,
            "ERROR: MemoryError while scanning file 'y'."
        );
    }

    #[test]
    fn test_other_errors_break_homogeneity() {
        let mut diagnostics = vec![memory_error("x"), runtime_error("r.c")];
        assert!(!map_unknown_errors(&mut diagnostics));
        assert_eq!(
            diagnostics[1].message,
            "ERROR: RuntimeError while scanning file 'r.c' (interrupted)."
        );
    }

    #[test]
    fn test_scanner_prefix_variant_matches() {
        let mut diagnostics = vec![diagnostic(
            "ERROR: for scanner: copyrights:\n\
             ERROR: Unknown error:\n\
             Traceback (most recent call last):\n\
             \x20 File \"scancode/cli.py\", line 878, in scan_infile\n\
             MemoryError\n\
             \x20(File: data.json)",
        )];
        assert!(map_unknown_errors(&mut diagnostics));
        assert_eq!(
            diagnostics[0].message,
            "ERROR: MemoryError while scanning file 'data.json'."
        );
    }

    #[test]
    fn test_unmatched_entries_pass_through() {
        let mut diagnostics = vec![diagnostic("something else went wrong")];
        assert!(!map_unknown_errors(&mut diagnostics));
        assert_eq!(diagnostics[0].message, "something else went wrong");
    }

    #[test]
    fn test_empty_list_is_not_homogeneous() {
        let mut diagnostics = Vec::new();
        assert!(!map_unknown_errors(&mut diagnostics));
        assert!(!map_timeout_errors(&mut diagnostics, DEFAULT_TIMEOUT));
    }

    #[test]
    fn test_mapping_deduplicates_by_message() {
        // Two distinct tracebacks for the same file compact to the same
        // message and collapse into one entry.
        let mut diagnostics = vec![memory_error("x"), memory_error("x")];
        assert!(map_unknown_errors(&mut diagnostics));
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_mapping_is_idempotent() {
        let mut diagnostics = vec![memory_error("x"), runtime_error("r.c")];
        map_unknown_errors(&mut diagnostics);
        let once = diagnostics.clone();
        map_unknown_errors(&mut diagnostics);
        assert_eq!(diagnostics, once);
    }

    #[test]
    fn test_timeouts_are_compacted_and_homogeneous() {
        let mut diagnostics = vec![
            timeout_error(300, "t.c"),
            timeout_error(300, "u.c"),
        ];
        assert!(map_timeout_errors(&mut diagnostics, DEFAULT_TIMEOUT));
        assert_eq!(
            diagnostics[0].message,
            "ERROR: Timeout after 300 seconds while scanning file 't.c'."
        );
    }

    #[test]
    fn test_unconfigured_timeout_does_not_count() {
        let mut diagnostics = vec![timeout_error(120, "t.c")];
        assert!(!map_timeout_errors(&mut diagnostics, DEFAULT_TIMEOUT));
        // The entry is left as-is.
        assert!(diagnostics[0].message.contains("timeout after 120 seconds"));
    }

    #[test]
    fn test_timeout_with_scanner_prefix() {
        let mut diagnostics = vec![diagnostic(
            "ERROR: for scanner: licenses:\n\
             ERROR: Processing interrupted: timeout after 300 seconds. (File: big.c)",
        )];
        assert!(map_timeout_errors(&mut diagnostics, DEFAULT_TIMEOUT));
        assert_eq!(
            diagnostics[0].message,
            "ERROR: Timeout after 300 seconds while scanning file 'big.c'."
        );
    }

    #[test]
    fn test_mixed_timeout_and_unknown_error_fail_both_passes() {
        let mut diagnostics = vec![timeout_error(300, "t.c"), runtime_error("r.c")];
        assert!(!map_unknown_errors(&mut diagnostics));
        assert!(!map_timeout_errors(&mut diagnostics, DEFAULT_TIMEOUT));
    }

    #[test]
    fn test_named_groups_are_exposed() {
        let captures = UNKNOWN_ERROR_REGEX
            .captures(
                "ERROR: for scanner: copyrights:\n\
                 ERROR: Unknown error:\n\
                 Traceback (most recent call last):\n\
                 \x20 File \"scancode/cli.py\", line 878, in scan_infile\n\
                 RuntimeError: interrupted (File: r.c)",
            )
            .unwrap();
        assert_eq!(&captures["scanner"], "copyrights");
        assert_eq!(&captures["error"], "RuntimeError");
        assert_eq!(&captures["file"], "r.c");

        let captures = TIMEOUT_ERROR_REGEX
            .captures("ERROR: Processing interrupted: timeout after 300 seconds. (File: t.c)")
            .unwrap();
        assert_eq!(&captures["timeout"], "300");
        assert_eq!(&captures["file"], "t.c");
    }
}
