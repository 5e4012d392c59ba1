//! Corpus-wide finding association
//!
//! Merges the per-file copyright-to-license associations into one
//! global map: for every license seen anywhere in the scanned tree, the
//! ordered set of its locations and the ordered set of its associated
//! copyright statements.
//!
//! The fold is deterministic by construction — all intermediate maps
//! are ordered, so the output never depends on iteration order.

pub mod per_file;
pub mod root_license;

use crate::ingest::extract;
use crate::model::{
    CopyrightFinding, CopyrightFindings, LicenseFinding, LicenseFindings, TextLocation,
};
use crate::HarvestResult;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Extract findings from a raw result tree and associate them.
pub fn associate_findings(
    result: &Value,
    scanner_name: &str,
) -> HarvestResult<BTreeSet<LicenseFindings>> {
    let licenses = extract::license_findings(result, scanner_name)?;
    let copyrights = extract::copyright_findings(result)?;
    Ok(associate(&licenses, &copyrights))
}

/// Associate copyright findings with license findings across the whole
/// scanned tree.
pub fn associate(
    license_findings: &[LicenseFinding],
    copyright_findings: &[CopyrightFinding],
) -> BTreeSet<LicenseFindings> {
    let mut licenses_by_path: BTreeMap<&str, Vec<LicenseFinding>> = BTreeMap::new();
    for finding in license_findings {
        licenses_by_path
            .entry(finding.location.path.as_str())
            .or_default()
            .push(finding.clone());
    }

    let mut copyrights_by_path: BTreeMap<&str, Vec<CopyrightFinding>> = BTreeMap::new();
    for finding in copyright_findings {
        copyrights_by_path
            .entry(finding.location.path.as_str())
            .or_default()
            .push(finding.clone());
    }

    let paths: BTreeSet<&str> = licenses_by_path
        .keys()
        .chain(copyrights_by_path.keys())
        .copied()
        .collect();

    let corpus_root = root_license::root_license(license_findings);

    // All locations of every license, independent of any copyright.
    let mut locations_for_license: BTreeMap<String, BTreeSet<TextLocation>> = BTreeMap::new();
    for finding in license_findings {
        locations_for_license
            .entry(finding.license.clone())
            .or_default()
            .insert(finding.location.clone());
    }

    // Fold per-file association maps, unioning the location set of each
    // (license, statement) pair.
    let mut copyrights_for_license: BTreeMap<String, per_file::StatementMap> = BTreeMap::new();
    let no_licenses = Vec::new();
    let no_copyrights = Vec::new();
    for path in paths {
        let licenses = licenses_by_path.get(path).unwrap_or(&no_licenses);
        let copyrights = copyrights_by_path.get(path).unwrap_or(&no_copyrights);
        let file_map = per_file::associate_file_findings(licenses, copyrights, &corpus_root);

        for (license, statements) in file_map {
            let merged = copyrights_for_license.entry(license).or_default();
            for (statement, locations) in statements {
                merged.entry(statement).or_default().extend(locations);
            }
        }
    }

    // One entry per license appearing on either side; a missing side
    // defaults to an empty ordered set.
    let all_licenses: BTreeSet<&String> = locations_for_license
        .keys()
        .chain(copyrights_for_license.keys())
        .collect();

    all_licenses
        .into_iter()
        .map(|license| LicenseFindings {
            license: license.clone(),
            locations: locations_for_license
                .get(license)
                .cloned()
                .unwrap_or_default(),
            copyrights: copyrights_for_license
                .get(license)
                .map(|statements| {
                    statements
                        .iter()
                        .map(|(statement, locations)| CopyrightFindings {
                            statement: statement.clone(),
                            locations: locations.clone(),
                        })
                        .collect()
                })
                .unwrap_or_default(),
        })
        .collect()
}

// ─── Tests ──────────────────────────────────────────────────────────
