//! Scan engine — summary assembly and the invoker success contract
//!
//! [`ScanCodeEngine`] turns one results file into one [`ScanResult`]:
//!
//! 1. read the raw tree (empty sentinel for a missing artifact),
//! 2. build the summary — file count, associated findings, and per-file
//!    `scan_errors` tagged with their path,
//! 3. run the unknown-error and timeout mapping passes,
//! 4. decide the outcome: a scan succeeds when the process exited
//!    cleanly, or when its failures were memory-only or timeout-only.
//!
//! The engine is a synchronous, share-nothing transformer. Each
//! `scan_path` call owns its raw tree, intermediate maps, and summary;
//! concurrency and cancellation live at the invoker boundary.

use crate::associate;
use crate::config::ScannerOptions;
use crate::diagnostics;
use crate::ingest::{self, extract};
use crate::model::{Diagnostic, Provenance, ScanResult, ScanSummary, ScannerDetails};
use crate::{HarvestError, HarvestResult};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::path::Path;

/// How the scanner process ended, as observed by the invoker.
#[derive(Debug, Clone)]
pub struct ProcessStatus {
    pub exited_successfully: bool,
    pub error_message: String,
}

impl ProcessStatus {
    pub fn success() -> Self {
        Self {
            exited_successfully: true,
            error_message: String::new(),
        }
    }

    pub fn failure(error_message: impl Into<String>) -> Self {
        Self {
            exited_successfully: false,
            error_message: error_message.into(),
        }
    }
}

/// The result-ingestion engine for one scanner identity.
pub struct ScanCodeEngine {
    name: String,
    version: String,
    options: ScannerOptions,
    timeout: u64,
}

impl ScanCodeEngine {
    pub fn new(version: impl Into<String>, options: ScannerOptions) -> Self {
        Self {
            name: "ScanCode".to_string(),
            version: version.into(),
            options,
            timeout: diagnostics::DEFAULT_TIMEOUT,
        }
    }

    /// Override the per-file timeout the scanner was configured with.
    /// Timeout diagnostics only count as benign at this exact value.
    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Scanner identity descriptor, including the canonical
    /// result-affecting configuration string used as the store key.
    pub fn details(&self) -> ScannerDetails {
        let debug = tracing::enabled!(tracing::Level::DEBUG);
        ScannerDetails {
            name: self.name.clone(),
            version: self.version.clone(),
            configuration: self.options.configuration(debug),
        }
    }

    /// Ingest one scan run: the results file the scanner wrote plus the
    /// process outcome the invoker observed.
    ///
    /// A failed process is still a successful scan when its diagnostics
    /// are homogeneous — memory-only or timeout-only; otherwise the
    /// process error message is surfaced as a fatal scan error.
    pub fn scan_path(
        &self,
        results_file: &Path,
        process: &ProcessStatus,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> HarvestResult<ScanResult> {
        tracing::info!("Reading scan results from {}", results_file.display());
        let raw_result = ingest::read_result_file(results_file)?;

        let mut summary = self.generate_summary(start_time, end_time, &raw_result)?;

        let only_memory_errors = diagnostics::map_unknown_errors(&mut summary.diagnostics);
        let only_timeout_errors =
            diagnostics::map_timeout_errors(&mut summary.diagnostics, self.timeout);

        if !(process.exited_successfully || only_memory_errors || only_timeout_errors) {
            return Err(HarvestError::Scan(process.error_message.clone()));
        }

        if !process.exited_successfully {
            tracing::warn!(
                "Scanner exited with an error but all {} diagnostics are benign ({})",
                summary.diagnostics.len(),
                if only_memory_errors { "memory-only" } else { "timeout-only" }
            );
        }
        tracing::info!(
            "Scan ingested: {} files, {} licenses, {} diagnostics",
            summary.file_count,
            summary.findings.len(),
            summary.diagnostics.len()
        );

        Ok(ScanResult {
            provenance: Provenance::default(),
            scanner: self.details(),
            summary,
            raw_result,
        })
    }

    /// Assemble the scan summary from a raw result tree.
    pub fn generate_summary(
        &self,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        result: &Value,
    ) -> HarvestResult<ScanSummary> {
        Ok(ScanSummary {
            start_time,
            end_time,
            file_count: extract::file_count(result)?,
            findings: associate::associate_findings(result, &self.name)?,
            diagnostics: self.collect_scan_errors(result)?,
        })
    }

    /// Collect every per-file `scan_errors` entry, tagged with its path.
    /// The `(File: …)` suffix is what the diagnostic mapping passes
    /// anchor on.
    fn collect_scan_errors(&self, result: &Value) -> HarvestResult<Vec<Diagnostic>> {
        let mut collected = Vec::new();

        for file in extract::files(result) {
            let path = file
                .get("path")
                .and_then(Value::as_str)
                .ok_or_else(|| HarvestError::Schema("missing `path` in file entry".to_string()))?;

            let errors = file
                .get("scan_errors")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            for error in errors {
                let text = error.as_str().ok_or_else(|| {
                    HarvestError::Schema("non-string scan error in file entry".to_string())
                })?;
                collected.push(Diagnostic::new(&self.name, format!("{text} (File: {path})")));
            }
        }

        Ok(collected)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
