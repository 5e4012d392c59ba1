//! Root-license detection
//!
//! A tree usually carries one license file at its top level (`LICENSE`,
//! `COPYING`, spelling variants). When exactly one license finding sits
//! in such a file, that license is treated as the license of the whole
//! tree and used as the fallback anchor for copyrights in files without
//! any license finding of their own.
//!
//! The single-license-or-nothing rule deliberately drops information
//! when several candidates match; keeping the whole step behind one
//! function makes a later promotion to a set a local change.

use crate::model::LicenseFinding;
use glob::{MatchOptions, Pattern};
use once_cell::sync::Lazy;

/// Name patterns of commonly used license files. Matched
/// case-insensitively against the whole relative path, so only files at
/// the tree root qualify.
const LICENSE_FILE_PATTERNS: &[&str] = &[
    "LICENSE*",
    "LICENCE*",
    "UNLICENSE*",
    "COPYING*",
    "COPYRIGHT*",
];

static LICENSE_FILE_MATCHERS: Lazy<Vec<Pattern>> = Lazy::new(|| {
    // An unparsable pattern is skipped, never propagated.
    LICENSE_FILE_PATTERNS
        .iter()
        .filter_map(|pattern| Pattern::new(pattern).ok())
        .collect()
});

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    // Wildcards must not cross `/`, so `LICENSE*` cannot reach into
    // subdirectories of a stripped-root path.
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// The license of the unique finding located in a commonly named
/// license file, or the empty string when there are zero or multiple
/// such findings.
pub fn root_license(findings: &[LicenseFinding]) -> String {
    let mut candidates = findings
        .iter()
        .filter(|finding| is_license_file(&finding.location.path));

    match (candidates.next(), candidates.next()) {
        (Some(finding), None) => finding.license.clone(),
        _ => String::new(),
    }
}

fn is_license_file(path: &str) -> bool {
    LICENSE_FILE_MATCHERS
        .iter()
        .any(|matcher| matcher.matches_with(path, MATCH_OPTIONS))
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TextLocation;

    fn finding(license: &str, path: &str) -> LicenseFinding {
        LicenseFinding {
            license: license.to_string(),
            location: TextLocation::new(path, 1, 1),
        }
    }

    #[test]
    fn test_unique_license_file_match() {
        let findings = vec![
            finding("BSD-3-Clause", "LICENSE"),
            finding("MIT", "src/main.c"),
        ];
        assert_eq!(root_license(&findings), "BSD-3-Clause");
    }

    #[test]
    fn test_no_license_file_is_empty() {
        let findings = vec![finding("MIT", "src/main.c")];
        assert_eq!(root_license(&findings), "");
    }

    #[test]
    fn test_multiple_matches_are_ambiguous() {
        let findings = vec![
            finding("MIT", "LICENSE-MIT"),
            finding("Apache-2.0", "LICENSE-APACHE"),
        ];
        assert_eq!(root_license(&findings), "");
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let findings = vec![finding("ISC", "license.md")];
        assert_eq!(root_license(&findings), "ISC");
    }

    #[test]
    fn test_copying_variant_matches() {
        let findings = vec![finding("GPL-2.0-only", "COPYING")];
        assert_eq!(root_license(&findings), "GPL-2.0-only");
    }

    #[test]
    fn test_nested_license_file_does_not_match() {
        let findings = vec![finding("MIT", "vendor/lib/LICENSE")];
        assert_eq!(root_license(&findings), "");
    }

    #[test]
    fn test_two_findings_in_same_file_are_ambiguous() {
        let findings = vec![
            finding("MIT", "LICENSE"),
            finding("Apache-2.0", "LICENSE"),
        ];
        assert_eq!(root_license(&findings), "");
    }
}
