//! Typed finding model for scan results
//!
//! Everything the engine produces is built from these types: text
//! locations inside scanned files, per-occurrence license and copyright
//! findings, the aggregated corpus-level findings, diagnostics, and the
//! scan summary handed back to the invoker.
//!
//! Ordered sets are deliberate contracts, not conveniences: the
//! aggregates live in `BTreeSet`s whose `Ord` derives follow field
//! declaration order, so output is deterministic regardless of how the
//! intermediate maps were iterated while building it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

// ─── Locations ──────────────────────────────────────────────────────

/// A line range inside one scanned file.
///
/// Paths are forward-slash relative strings as produced by ScanCode with
/// `--strip-root`. Lines are 1-based and `start_line <= end_line`.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TextLocation {
    pub path: String,
    pub start_line: u32,
    pub end_line: u32,
}

impl TextLocation {
    pub fn new(path: impl Into<String>, start_line: u32, end_line: u32) -> Self {
        Self {
            path: path.into(),
            start_line,
            end_line,
        }
    }
}

impl fmt::Display for TextLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.path, self.start_line, self.end_line)
    }
}

// ─── Per-Occurrence Findings ────────────────────────────────────────

/// One license detection at one location.
///
/// The license string is an SPDX identifier, the literal `NOASSERTION`
/// for unknowns, or a synthetic `LicenseRef-<scanner>-<key>` when the
/// tool supplied a non-SPDX key.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct LicenseFinding {
    pub license: String,
    pub location: TextLocation,
}

/// One copyright statement at one location, text verbatim from the tool.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct CopyrightFinding {
    pub statement: String,
    pub location: TextLocation,
}

// ─── Aggregated Findings ────────────────────────────────────────────

/// A copyright statement with every location it was seen at.
///
/// Statements are unique within their parent license; merging two
/// occurrences of the same statement unions their location sets.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CopyrightFindings {
    pub statement: String,
    pub locations: BTreeSet<TextLocation>,
}

/// All locations and associated copyrights for one license across the
/// scanned tree.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct LicenseFindings {
    pub license: String,
    pub locations: BTreeSet<TextLocation>,
    pub copyrights: BTreeSet<CopyrightFindings>,
}

// ─── Diagnostics ────────────────────────────────────────────────────

/// Diagnostic severity. Opaque to this engine — carried through, never
/// interpreted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Severity {
    Hint,
    Warning,
    Error,
}

impl Default for Severity {
    fn default() -> Self {
        Self::Error
    }
}

/// One diagnostic emitted during a scan, tagged with its source tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub source: String,
    pub message: String,
    #[serde(default)]
    pub severity: Severity,
}

impl Diagnostic {
    pub fn new(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            message: message.into(),
            severity: Severity::default(),
        }
    }
}

// ─── Scan Summary ───────────────────────────────────────────────────

/// The condensed outcome of a single scan run.
///
/// `file_count` is exactly what the tool reported, never derived from
/// the findings. Constructed once per `scan_path` call and immutable
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub file_count: u64,
    pub findings: BTreeSet<LicenseFindings>,
    pub diagnostics: Vec<Diagnostic>,
}

// ─── Scan Result Envelope ───────────────────────────────────────────

/// Identity of the scanner run that produced a result.
///
/// `configuration` is the canonical result-affecting option string used
/// as the results-store key (see [`crate::config::ScannerOptions`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerDetails {
    pub name: String,
    pub version: String,
    pub configuration: String,
}

/// Where the scanned content came from. Opaque to this engine; the
/// invoker fills it in after the scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub download_time: Option<DateTime<Utc>>,
    pub source_artifact: Option<String>,
    pub vcs_revision: Option<String>,
}

/// Complete scan result: provenance placeholder, scanner identity,
/// summary, and the original raw tree passed through for archival.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    pub provenance: Provenance,
    pub scanner: ScannerDetails,
    pub summary: ScanSummary,
    pub raw_result: serde_json::Value,
}

// ─── Tests ──────────────────────────────────────────────────────────
