//! # Manual Configuration Loading
//!
//! TOML overrides for [`ManualConfig`]. Fields left out of the file keep the
//! curated defaults, so a file holding only `neuroendocrine_codes` changes
//! just that list.
//!
//! ```toml
//! main_cancer_codes = ["1324", "1612"]
//! neuroendocrine_codes = ["169", "1800"]
//!
//! [additional_parents]
//! "4362" = ["1612"]
//!
//! [[excluded_relationships]]
//! child = "235"
//! parent = "1475"
//! ```

use std::path::Path;
use trialmatch_core::{ManualConfig, TrialMatchError};

/// Largest accepted configuration file.
pub const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

/// Parse a TOML document into a configuration.
pub fn parse_manual_config(text: &str) -> Result<ManualConfig, TrialMatchError> {
    toml::from_str(text).map_err(|e| TrialMatchError::ConfigError(e.to_string()))
}

/// Built-in defaults when `path` is `None`, otherwise the file's overrides.
pub fn load_manual_config(path: Option<&Path>) -> Result<ManualConfig, TrialMatchError> {
    let Some(path) = path else {
        tracing::debug!("using built-in manual configuration");
        return Ok(ManualConfig::default());
    };

    let canonical = crate::cli::validate_file_path(path)?;
    crate::cli::validate_file_size(&canonical, MAX_CONFIG_FILE_SIZE)?;
    let text = std::fs::read_to_string(&canonical)
        .map_err(|e| TrialMatchError::IoError(format!("Cannot read {}: {}", path.display(), e)))?;

    let config = parse_manual_config(&text)?;
    tracing::info!(
        path = %path.display(),
        main_cancer_codes = config.main_cancer_codes.len(),
        additional_parents = config.additional_parents.len(),
        "loaded manual configuration"
    );
    Ok(config)
}
