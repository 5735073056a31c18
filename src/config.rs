//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The file lives in
//! the content root and is layered on top of the stock defaults, so a user
//! config only needs the keys it wants to change:
//!
//! ```toml
//! [site]
//! title = "My Blog"
//! url = "https://blog.example"
//!
//! [og.colors]
//! brand = "#ff8800"
//! ```
//!
//! Unknown keys are rejected to catch typos early. Run `tilpress gen-config`
//! for a fully documented stock file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Feed channel and page metadata.
    pub site: SiteInfo,
    /// Open graph image template settings.
    pub og: OgConfig,
    /// Parallel rendering settings.
    pub processing: ProcessingConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.og.width == 0 || self.og.height == 0 {
            return Err(ConfigError::Validation(
                "og.width and og.height must be non-zero".into(),
            ));
        }
        if self.site.url.trim().is_empty() {
            return Err(ConfigError::Validation("site.url must not be empty".into()));
        }
        Ok(())
    }
}

/// Site-wide metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteInfo {
    /// Site title, used as feed channel title and page title suffix.
    pub title: String,
    /// One-paragraph site description for the feed channel.
    pub description: String,
    /// Absolute base URL the site is deployed under.
    pub url: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),
            description: "Posts and things I learned along the way.".to_string(),
            url: "https://example.com".to_string(),
        }
    }
}

/// Open graph image settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OgConfig {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Brand marker drawn at the top of every image.
    pub brand: String,
    /// CSS-style font family list, first available wins.
    pub font_family: String,
    /// Extra font files to load, relative to the content root.
    pub fonts: Vec<String>,
    /// Whether to also load the fonts installed on the system.
    pub system_fonts: bool,
    pub colors: OgColors,
}

impl Default for OgConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 630,
            brand: "ダーニエル".to_string(),
            font_family: "JetBrainsMono-Bold, monospace, Noto Sans JP, sans-serif".to_string(),
            fonts: Vec::new(),
            system_fonts: true,
            colors: OgColors::default(),
        }
    }
}

/// Colors of the open graph template, as CSS color strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OgColors {
    pub background: String,
    pub brand: String,
    pub title: String,
    /// Subtitle, in a lighter tone than the title.
    pub description: String,
    pub tag_background: String,
    pub tag_text: String,
    pub date: String,
}

impl Default for OgColors {
    fn default() -> Self {
        Self {
            background: "rgb(10, 10, 10)".to_string(),
            brand: "rgb(229, 62, 62)".to_string(),
            title: "white".to_string(),
            description: "grey".to_string(),
            tag_background: "grey".to_string(),
            tag_text: "white".to_string(),
            date: "white".to_string(),
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel image renders.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)`, at least one
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("stock defaults do not serialize: {e}")))
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

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
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
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the content root.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# tilpress configuration
# =====================
# All settings are optional. Values shown below are the defaults.
# Place this file at the content root: content/config.toml
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site
# ---------------------------------------------------------------------------
[site]
# Feed channel title.
title = "Blog"

# Feed channel description.
description = "Posts and things I learned along the way."

# Absolute base URL. Used for feed links and og:image URLs.
# Can be overridden per build with --site.
url = "https://example.com"

# ---------------------------------------------------------------------------
# Open graph images
# ---------------------------------------------------------------------------
[og]
# Canvas size in pixels.
width = 1200
height = 630

# Marker drawn in the top-left corner of every image.
brand = "ダーニエル"

# Font family list; the first installed family wins.
font_family = "JetBrainsMono-Bold, monospace, Noto Sans JP, sans-serif"

# Extra font files (TTF/OTF), relative to the content root.
fonts = []

# Also load fonts installed on the system.
system_fonts = true

[og.colors]
background = "rgb(10, 10, 10)"
brand = "rgb(229, 62, 62)"
title = "white"
description = "grey"
tag_background = "grey"
tag_text = "white"
date = "white"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel image renders.
# Omit to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
