//! Configuration module.
//!
//! Handles loading, validating, and merging `previewfit.toml`. Stock defaults
//! are overridden by whatever the user file sets; everything is optional.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [selection]
//! policy = "closest"        # Policy for explicit targets: closest | optimal
//! aspect_tolerance = 0.1    # Max ratio drift for the optimal policy
//!
//! [display]
//! rotation = 0              # Screen rotation: 0 | 90 | 180 | 270
//!
//! [session]
//! state_file = ".previewfit-state.json"  # Where camera/target survive restarts
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [selection]
//! policy = "optimal"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::geometry::{ASPECT_TOLERANCE, SelectionPolicy};
use crate::types::Rotation;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILENAME: &str = "previewfit.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `previewfit.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreviewConfig {
    /// How capture sizes are chosen.
    pub selection: SelectionConfig,
    /// Screen settings used when a device profile doesn't pin them.
    pub display: DisplayConfig,
    /// Restore-state persistence.
    pub session: SessionConfig,
}

impl PreviewConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_tolerance(self.selection.aspect_tolerance)?;
        if self.session.state_file.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "session.state_file must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Aspect tolerance must be a finite, non-negative ratio difference.
pub fn validate_tolerance(tolerance: f64) -> Result<(), ConfigError> {
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(ConfigError::Validation(format!(
            "selection.aspect_tolerance must be a finite, non-negative number, got {tolerance}"
        )));
    }
    Ok(())
}

/// Capture-size selection settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectionConfig {
    /// Policy applied when the user picked an explicit target size.
    pub policy: SelectionPolicy,
    /// Maximum `|ratio - target_ratio|` accepted by the optimal policy.
    pub aspect_tolerance: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            policy: SelectionPolicy::Closest,
            aspect_tolerance: ASPECT_TOLERANCE,
        }
    }
}

/// Screen settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    /// Clockwise screen rotation relative to the natural orientation.
    pub rotation: Rotation,
}

/// Restore-state settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// JSON file holding the last camera index and target size.
    pub state_file: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            state_file: PathBuf::from(".previewfit-state.json"),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(PreviewConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
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

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file doesn't exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<PreviewConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: PreviewConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, falling back to stock defaults when it is absent.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(path: &Path) -> Result<PreviewConfig, ConfigError> {
    let overlay = load_raw_config(path)?;
    if overlay.is_some() {
        log::debug!("Loaded config from {}", path.display());
    }
    resolve_config(overlay)
}

/// Returns a fully-commented stock `previewfit.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# previewfit Configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Capture size selection
# ---------------------------------------------------------------------------
[selection]
# Policy used after the user picks an explicit target size:
#   closest - exact match wins, otherwise smallest mix of area and ratio drift
#   optimal - keep the target's aspect ratio, then the nearest height
# Without an explicit target the optimal policy is always used against the
# viewport.
policy = "closest"

# How far (in width/height ratio) a size may drift from the target and still
# count as the same shape for the optimal policy.
aspect_tolerance = 0.1

# ---------------------------------------------------------------------------
# Display
# ---------------------------------------------------------------------------
[display]
# Clockwise screen rotation relative to the device's natural orientation.
# One of 0, 90, 180, 270. A device profile's display_rotation takes priority.
rotation = 0

# ---------------------------------------------------------------------------
# Session
# ---------------------------------------------------------------------------
[session]
# Where the last camera index and target size are kept between runs.
state_file = ".previewfit-state.json"
"##
}
