//! # scanharvest — ScanCode result ingestion and finding association
//!
//! Consumes the raw JSON output of the ScanCode toolkit, normalizes it
//! into a typed finding model, and associates copyright statements with
//! license findings using a line-proximity heuristic. Also maps the
//! free-form error messages ScanCode emits into compact, deduplicated
//! diagnostics and classifies whether a run's failures are benign
//! (memory or timeout only) or fatal.
//!
//! ## Pipeline
//!
//! ```text
//! results file ──▶ ingest (raw tree, empty sentinel)
//!                    │
//!                    ├─▶ extract: license + copyright findings, file count
//!                    │
//!                    ├─▶ associate: root license ─▶ per-file ─▶ corpus map
//!                    │
//!                    └─▶ engine: summary (timespan, findings, diagnostics)
//!                            │
//!                            └─▶ diagnostics: unknown-error / timeout
//!                                mapping ─▶ success or fatal scan
//! ```
//!
//! Running the scanner process, installing the tool, and persisting
//! results all belong to the invoker; this crate is a synchronous,
//! share-nothing transformer from one results file to one [`ScanResult`].

pub mod associate;
pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod ingest;
pub mod model;

// Re-exports for convenience
pub use config::ScannerOptions;
pub use engine::{ProcessStatus, ScanCodeEngine};
pub use model::{
    CopyrightFinding, CopyrightFindings, Diagnostic, LicenseFinding, LicenseFindings,
    Provenance, ScanResult, ScanSummary, ScannerDetails, Severity, TextLocation,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("Malformed scan result: {0}")]
    Schema(String),

    #[error("Scan failed: {0}")]
    Scan(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type HarvestResult<T> = Result<T, HarvestError>;
