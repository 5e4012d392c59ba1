//! Per-file copyright-to-license association
//!
//! Binds the copyright statements of one file to that file's license
//! findings. How depends on the number of licenses in the file:
//!
//! - no license — all copyrights go to the corpus root license, if one
//!   exists; otherwise they have no anchor and are dropped,
//! - one license — all copyrights belong to it,
//! - several licenses — each license takes the copyrights within
//!   [`COPYRIGHT_TOLERANCE_LINES`] of its start line; one statement may
//!   attach to several licenses when it is close to each.
//!
//! Within each license, occurrences of the same statement text merge
//! into one entry whose location set is the union.

use crate::model::{CopyrightFinding, LicenseFinding, TextLocation};
use std::collections::{BTreeMap, BTreeSet};

/// Maximum line distance between a copyright statement and a license
/// start line for the two to be associated. Five lines bridge the blank
/// lines between a copyright header and its license text without
/// spanning into an unrelated adjacent block.
pub const COPYRIGHT_TOLERANCE_LINES: u32 = 5;

/// Copyright statements keyed by text, each with its location set.
pub(crate) type StatementMap = BTreeMap<String, BTreeSet<TextLocation>>;

/// Associate the copyrights of a single file with its licenses.
///
/// All findings must share one path; mixed-path input is a bug in the
/// caller's grouping, not an input condition.
pub(crate) fn associate_file_findings(
    licenses: &[LicenseFinding],
    copyrights: &[CopyrightFinding],
    root_license: &str,
) -> BTreeMap<String, StatementMap> {
    let paths: BTreeSet<&str> = licenses
        .iter()
        .map(|finding| finding.location.path.as_str())
        .chain(copyrights.iter().map(|finding| finding.location.path.as_str()))
        .collect();
    assert!(paths.len() <= 1, "file findings must share one path, got {paths:?}");

    let mut copyrights_for_licenses = BTreeMap::new();

    match licenses {
        [] => {
            if !copyrights.is_empty() && !root_license.is_empty() {
                copyrights_for_licenses
                    .insert(root_license.to_string(), group_by_statement(copyrights.iter()));
            }
        }
        [license] => {
            copyrights_for_licenses
                .insert(license.license.clone(), group_by_statement(copyrights.iter()));
        }
        _ => {
            for license in licenses {
                let closest = closest_copyright_statements(
                    copyrights,
                    license.location.start_line,
                    COPYRIGHT_TOLERANCE_LINES,
                );
                let entry: &mut StatementMap = copyrights_for_licenses
                    .entry(license.license.clone())
                    .or_default();
                for (statement, locations) in closest {
                    entry.entry(statement).or_default().extend(locations);
                }
            }
        }
    }

    copyrights_for_licenses
}

/// Copyrights whose start line lies within `tolerance_lines` of the
/// license start line, in either direction.
fn closest_copyright_statements(
    copyrights: &[CopyrightFinding],
    license_start_line: u32,
    tolerance_lines: u32,
) -> StatementMap {
    group_by_statement(copyrights.iter().filter(|copyright| {
        copyright.location.start_line.abs_diff(license_start_line) <= tolerance_lines
    }))
}

fn group_by_statement<'a>(
    copyrights: impl Iterator<Item = &'a CopyrightFinding>,
) -> StatementMap {
    let mut grouped = StatementMap::new();
    for copyright in copyrights {
        grouped
            .entry(copyright.statement.clone())
            .or_default()
            .insert(copyright.location.clone());
    }
    grouped
}

// ─── Tests ──────────────────────────────────────────────────────────
