//! Raw result ingestion
//!
//! Loads the JSON artifact the external scanner wrote and hands the
//! parsed tree to the extractors. A missing, non-regular, or zero-length
//! results file yields an empty sentinel rather than an error; a file
//! that exists but does not parse is fatal, since a partially consumed
//! tree would silently drop findings.

pub mod extract;

use crate::HarvestResult;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Sentinel for an absent or empty results file. Every later field
/// access sees "missing", so the scan summarizes to zero files and no
/// findings.
pub const EMPTY_RESULT: Value = Value::Null;

/// Read and parse a scanner results file.
///
/// Returns [`EMPTY_RESULT`] when the path does not exist, is not a
/// regular file, or has length zero. Any parse failure surfaces as a
/// fatal error.
pub fn read_result_file(path: &Path) -> HarvestResult<Value> {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(_) => return Ok(EMPTY_RESULT),
    };

    if !metadata.is_file() || metadata.len() == 0 {
        return Ok(EMPTY_RESULT);
    }

    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

// ─── Tests ──────────────────────────────────────────────────────────
