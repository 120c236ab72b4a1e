//! Pipeline configuration.
//!
//! Handles loading and validating `webpify.toml`. All settings are optional
//! and default to the compiled-in pipeline constants, so a site with no
//! config file gets the stock behavior:
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [convert]
//! roots = ["assets/gallery", "screenshots", "."]   # Scan roots, in order
//! extensions = ["jpg", "jpeg", "png"]              # Source formats to transcode
//! quality = 80                                     # WebP quality (0-100)
//!
//! [rewrite]
//! eager_hints = ["hero", "header", "banner", "logo", "site-logo"]
//! exclude_dirs = ["node_modules", ".git", "dist", "build"]
//! ```
//!
//! Config files are sparse: override just the values you want. Unknown keys
//! are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the optional config file looked up in the project root.
pub const CONFIG_FILE: &str = "webpify.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Pipeline configuration loaded from `webpify.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Convert pass settings (scan roots, source formats, quality).
    pub convert: ConvertConfig,
    /// Rewrite pass settings (eager hints, excluded directories).
    pub rewrite: RewriteConfig,
}

/// Settings for the convert pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertConfig {
    /// Directories to scan for source images, relative to the project root.
    /// Missing roots are skipped with a warning, not an error.
    pub roots: Vec<String>,
    /// File extensions (without dot, case-insensitive) eligible for
    /// transcoding. Everything else is left untouched.
    pub extensions: Vec<String>,
    /// WebP encoding quality (0 = worst, 100 = best).
    pub quality: u32,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            roots: vec![
                "assets/gallery".to_string(),
                "screenshots".to_string(),
                ".".to_string(),
            ],
            extensions: vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()],
            quality: 80,
        }
    }
}

/// Settings for the rewrite pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RewriteConfig {
    /// Substrings that mark an image as above-the-fold when found in its
    /// class or id (lower-cased). Such images never get `loading="lazy"`.
    pub eager_hints: Vec<String>,
    /// Directory names skipped during HTML document discovery.
    pub exclude_dirs: Vec<String>,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            eager_hints: vec![
                "hero".to_string(),
                "header".to_string(),
                "banner".to_string(),
                "logo".to_string(),
                "site-logo".to_string(),
            ],
            exclude_dirs: vec![
                "node_modules".to_string(),
                ".git".to_string(),
                "dist".to_string(),
                "build".to_string(),
            ],
        }
    }
}

impl PipelineConfig {
    /// Validate semantic constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.convert.quality > 100 {
            return Err(ConfigError::Validation(
                "convert.quality must be 0-100".into(),
            ));
        }
        if self.convert.roots.is_empty() {
            return Err(ConfigError::Validation(
                "convert.roots must not be empty".into(),
            ));
        }
        if self.convert.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "convert.extensions must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Load configuration for a project root.
///
/// Reads `webpify.toml` from the root if present, otherwise returns the
/// defaults. The loaded config is validated before it is returned.
pub fn load_config(root: &Path) -> Result<PipelineConfig, ConfigError> {
    let path = root.join(CONFIG_FILE);
    let config = if path.exists() {
        let content = fs::read_to_string(&path)?;
        toml::from_str(&content)?
    } else {
        PipelineConfig::default()
    };
    config.validate()?;
    Ok(config)
}

/// A fully documented config file with every option at its default value.
pub fn stock_config_toml() -> &'static str {
    r##"# webpify Configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file as webpify.toml in the project root.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Convert pass: JPEG/PNG -> sibling .webp artifacts
# ---------------------------------------------------------------------------
[convert]
# Directories to scan for source images, relative to the project root,
# processed in order. Missing roots are skipped with a warning.
roots = ["assets/gallery", "screenshots", "."]

# Source file extensions eligible for transcoding (case-insensitive).
extensions = ["jpg", "jpeg", "png"]

# WebP encoding quality (0 = worst, 100 = best).
quality = 80

# ---------------------------------------------------------------------------
# Rewrite pass: <img> -> <picture> fallback groups in *.html
# ---------------------------------------------------------------------------
[rewrite]
# An image whose class or id contains one of these substrings is treated as
# above-the-fold: it never gets loading="lazy", and an existing
# loading="lazy" on it is removed.
eager_hints = ["hero", "header", "banner", "logo", "site-logo"]

# Directory names skipped when discovering HTML documents.
exclude_dirs = ["node_modules", ".git", "dist", "build"]
"##
}
