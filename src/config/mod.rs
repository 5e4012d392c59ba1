//! Scanner option handling and the canonical configuration string
//!
//! Options are split into a result-affecting half and a half that only
//! changes how a run executes (process count, verbosity). The results
//! store keys archived scans by scanner identity plus configuration, so
//! [`ScannerOptions::configuration`] serializes exactly the options
//! that can change the produced findings: the base options, the output
//! format flag, and the debug options when debug verbosity is active.
//!
//! A project can override the defaults from a `.scanharvest.toml` next
//! to its sources.

use crate::{HarvestError, HarvestResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name of the per-project options file.
pub const OPTIONS_FILE_NAME: &str = ".scanharvest.toml";

/// Output format flag. Result-affecting: it selects which artifact the
/// scanner writes.
pub const OUTPUT_FORMAT_OPTION: &str = "--json-pp";

/// Scanner invocation options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerOptions {
    /// Result-affecting options passed to every run.
    #[serde(default = "default_command_line")]
    pub command_line: Vec<String>,

    /// Options that do not affect results (excluded from the store key).
    #[serde(default = "default_command_line_non_config")]
    pub command_line_non_config: Vec<String>,

    /// Result-affecting options appended when debug verbosity is active.
    #[serde(default = "default_debug_command_line")]
    pub debug_command_line: Vec<String>,

    /// Debug options that do not affect results.
    #[serde(default = "default_debug_command_line_non_config")]
    pub debug_command_line_non_config: Vec<String>,
}

fn default_command_line() -> Vec<String> {
    vec![
        "--copyright".into(),
        "--license".into(),
        "--info".into(),
        "--strip-root".into(),
        "--timeout".into(),
        crate::diagnostics::DEFAULT_TIMEOUT.to_string(),
    ]
}

fn default_command_line_non_config() -> Vec<String> {
    let processes = std::thread::available_parallelism()
        .map(|n| n.get().saturating_sub(1).max(1))
        .unwrap_or(1);
    vec!["--processes".into(), processes.to_string()]
}

fn default_debug_command_line() -> Vec<String> {
    vec!["--license-diag".into()]
}

fn default_debug_command_line_non_config() -> Vec<String> {
    vec!["--verbose".into()]
}

impl Default for ScannerOptions {
    fn default() -> Self {
        Self {
            command_line: default_command_line(),
            command_line_non_config: default_command_line_non_config(),
            debug_command_line: default_debug_command_line(),
            debug_command_line_non_config: default_debug_command_line_non_config(),
        }
    }
}

impl ScannerOptions {
    /// Load options from a TOML file. Missing keys fall back to the
    /// defaults.
    pub fn from_file(path: &Path) -> HarvestResult<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| HarvestError::Schema(format!("invalid scanner options: {e}")))
    }

    /// Load options from a project root, falling back to the defaults
    /// when no options file exists or it fails to parse.
    pub fn from_project_root(root: &Path) -> Self {
        let path = root.join(OPTIONS_FILE_NAME);
        if path.exists() {
            match Self::from_file(&path) {
                Ok(options) => {
                    tracing::info!("Loaded scanner options from {}", path.display());
                    return options;
                }
                Err(e) => {
                    tracing::warn!("Ignoring {}: {}", path.display(), e);
                }
            }
        }
        Self::default()
    }

    /// The canonical result-affecting option string used as the results
    /// store key. A stable function of configuration and debug state.
    pub fn configuration(&self, debug: bool) -> String {
        let mut options = self.command_line.clone();
        options.push(OUTPUT_FORMAT_OPTION.to_string());
        if debug {
            options.extend(self.debug_command_line.iter().cloned());
        }
        options.join(" ")
    }

    /// The full argument list for spawning the scanner, including the
    /// non-result-affecting options.
    pub fn full_command_line(&self, debug: bool) -> Vec<String> {
        let mut options = self.command_line.clone();
        options.extend(self.command_line_non_config.iter().cloned());
        if debug {
            options.extend(self.debug_command_line.iter().cloned());
            options.extend(self.debug_command_line_non_config.iter().cloned());
        }
        options.push(OUTPUT_FORMAT_OPTION.to_string());
        options
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configuration_string() {
        let options = ScannerOptions::default();
        assert_eq!(
            options.configuration(false),
            "--copyright --license --info --strip-root --timeout 300 --json-pp"
        );
    }

    #[test]
    fn test_debug_appends_debug_options() {
        let options = ScannerOptions::default();
        assert_eq!(
            options.configuration(true),
            "--copyright --license --info --strip-root --timeout 300 --json-pp --license-diag"
        );
    }

    #[test]
    fn test_non_config_options_are_excluded() {
        let options = ScannerOptions::default();
        let configuration = options.configuration(true);
        assert!(!configuration.contains("--processes"));
        assert!(!configuration.contains("--verbose"));
    }

    #[test]
    fn test_full_command_line_includes_non_config() {
        let options = ScannerOptions::default();
        let args = options.full_command_line(false);
        assert!(args.iter().any(|a| a == "--processes"));
        assert!(args.last().map(String::as_str) == Some(OUTPUT_FORMAT_OPTION));
    }

    #[test]
    fn test_toml_overrides_and_defaults() {
        let options: ScannerOptions = toml::from_str(
            r#"command_line = ["--license", "--timeout", "60"]"#,
        )
        .unwrap();
        assert_eq!(options.configuration(false), "--license --timeout 60 --json-pp");
        // Unspecified keys keep their defaults.
        assert_eq!(options.debug_command_line, vec!["--license-diag".to_string()]);
    }

    #[test]
    fn test_configuration_is_stable() {
        let options = ScannerOptions::default();
        assert_eq!(options.configuration(false), options.configuration(false));
    }
}
