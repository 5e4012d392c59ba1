//! Finding extraction from the raw result tree
//!
//! ScanCode's JSON schema has drifted across versions; the extractors
//! here accept both documented shapes silently:
//!
//! - copyright entries carry a `statements` array (newer) or a single
//!   `value` string (older),
//! - the file count lives in `headers[*].extra_data.files_count`
//!   (newer) or at the top level as `files_count` (older).
//!
//! Required fields that are missing in an entry are fatal — the engine
//! never partially consumes a malformed tree.

use crate::model::{CopyrightFinding, LicenseFinding, TextLocation};
use crate::{HarvestError, HarvestResult};
use serde_json::Value;

/// The `files` array of the result tree, empty when absent.
pub(crate) fn files(result: &Value) -> &[Value] {
    result
        .get("files")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn entries<'a>(file: &'a Value, field: &str) -> &'a [Value] {
    file.get(field)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn require_str<'a>(node: &'a Value, field: &str, context: &str) -> HarvestResult<&'a str> {
    node.get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| HarvestError::Schema(format!("missing `{field}` in {context} entry")))
}

fn require_line(node: &Value, field: &str, context: &str) -> HarvestResult<u32> {
    node.get(field)
        .and_then(Value::as_u64)
        .map(|line| line as u32)
        .ok_or_else(|| HarvestError::Schema(format!("missing `{field}` in {context} entry")))
}

// ─── License Findings ───────────────────────────────────────────────

/// Extract one [`LicenseFinding`] per license entry of every file.
pub fn license_findings(result: &Value, scanner_name: &str) -> HarvestResult<Vec<LicenseFinding>> {
    let mut findings = Vec::new();

    for file in files(result) {
        let path = require_str(file, "path", "file")?;

        for entry in entries(file, "licenses") {
            findings.push(LicenseFinding {
                license: license_id(entry, scanner_name)?,
                location: TextLocation::new(
                    path,
                    require_line(entry, "start_line", "license")?,
                    require_line(entry, "end_line", "license")?,
                ),
            });
        }
    }

    Ok(findings)
}

/// The license identifier for one license entry.
///
/// Prefers the SPDX key; a non-SPDX `key` becomes a `LicenseRef-` id
/// namespaced by the scanner, and the tool's literal `unknown` key maps
/// to `NOASSERTION`.
fn license_id(entry: &Value, scanner_name: &str) -> HarvestResult<String> {
    let spdx = entry
        .get("spdx_license_key")
        .and_then(Value::as_str)
        .unwrap_or("");
    if !spdx.is_empty() {
        return Ok(spdx.to_string());
    }

    let key = require_str(entry, "key", "license")?;
    Ok(if key == "unknown" {
        "NOASSERTION".to_string()
    } else {
        format!("LicenseRef-{}-{}", scanner_name.to_lowercase(), key)
    })
}

// ─── Copyright Findings ─────────────────────────────────────────────

/// Extract one [`CopyrightFinding`] per statement of every copyright
/// entry, accepting both the `statements` and the `value` shape.
pub fn copyright_findings(result: &Value) -> HarvestResult<Vec<CopyrightFinding>> {
    let mut findings = Vec::new();

    for file in files(result) {
        let path = require_str(file, "path", "file")?;

        for entry in entries(file, "copyrights") {
            let start_line = require_line(entry, "start_line", "copyright")?;
            let end_line = require_line(entry, "end_line", "copyright")?;

            match entry.get("statements").and_then(Value::as_array) {
                Some(statements) => {
                    for statement in statements {
                        let text = statement.as_str().ok_or_else(|| {
                            HarvestError::Schema(
                                "non-string statement in copyright entry".to_string(),
                            )
                        })?;
                        findings.push(CopyrightFinding {
                            statement: text.to_string(),
                            location: TextLocation::new(path, start_line, end_line),
                        });
                    }
                }
                None => {
                    let text = require_str(entry, "value", "copyright")?;
                    findings.push(CopyrightFinding {
                        statement: text.to_string(),
                        location: TextLocation::new(path, start_line, end_line),
                    });
                }
            }
        }
    }

    Ok(findings)
}

// ─── File Count ─────────────────────────────────────────────────────

/// The number of files the tool reported scanning.
///
/// Prefers the modern `headers[*].extra_data.files_count` shape, falls
/// back to the legacy top-level `files_count`. The empty sentinel
/// reports zero files; any other tree lacking both shapes is malformed.
pub fn file_count(result: &Value) -> HarvestResult<u64> {
    if let Some(headers) = result.get("headers").and_then(Value::as_array) {
        for header in headers {
            let count = header
                .get("extra_data")
                .and_then(|extra| extra.get("files_count"))
                .and_then(Value::as_u64);
            if let Some(count) = count {
                return Ok(count);
            }
        }
    }

    if let Some(count) = result.get("files_count").and_then(Value::as_u64) {
        return Ok(count);
    }

    if result.is_null() {
        return Ok(0);
    }

    Err(HarvestError::Schema(
        "no file count in scan result".to_string(),
    ))
}

// ─── Tests ──────────────────────────────────────────────────────────
