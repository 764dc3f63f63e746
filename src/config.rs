//! Index configuration.
//!
//! Settings come from three layers, later ones winning:
//!
//! 1. Stock defaults ([`IndexConfig::default`])
//! 2. An optional `config.toml` in the working directory
//! 3. Command-line flags, applied by the binary
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! archive_detection = "extension"   # "extension": only *.zip files are archives
//!                                   # "probe": any file that opens as a zip
//! sample_size = 3                   # preview images drawn per gallery
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::sample::DEFAULT_SAMPLE_SIZE;
use crate::scan::ArchiveDetection;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up by [`load_config`].
pub const CONFIG_FILENAME: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexConfig {
    /// How non-image files are recognized as zip archives.
    pub archive_detection: ArchiveDetection,
    /// Number of random preview images drawn per gallery.
    pub sample_size: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            archive_detection: ArchiveDetection::Extension,
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }
}

impl IndexConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_size == 0 {
            return Err(ConfigError::Validation(
                "sample_size must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Stock defaults as a TOML table, the base layer for merging.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(IndexConfig::default())
        .map_err(|e| ConfigError::Validation(format!("cannot encode defaults: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<IndexConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: IndexConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load `config.toml` from `dir` over the stock defaults.
pub fn load_config(dir: &Path) -> Result<IndexConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(dir)?;
    resolve_config(base, overlay)
}

/// A fully-commented stock `config.toml`, printed by `gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# Gallery Preview Configuration
# =============================
# All options are optional. Values shown are the defaults.
# Unknown keys are rejected.

# How files other than images are recognized as zip archives.
#   "extension"  only files ending in .zip are opened; a .zip that fails to
#                open stops indexing with an error
#   "probe"      every other file is tried as a zip; files that are not zips
#                are skipped
# The --check-archives flag selects "probe".
archive_detection = "extension"

# Number of random preview images drawn from a gallery.
sample_size = 3
"##
}
