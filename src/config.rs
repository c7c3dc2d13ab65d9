//! Site configuration module.
//!
//! Handles loading, validating and layering `config.toml`. Stock defaults are
//! the base layer; the user's file only needs the keys it wants to change.
//!
//! The configuration is read once per process and passed by reference to the
//! page and feed generators. Markdown parsing and post loading never see it.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! title = "My Blog"
//! slogan = ""
//! base_url = "https://example.com"
//! articles_dir = "articles"   # Relative to the site root
//! stylesheet = "style.css"    # Copied to the output if present
//!
//! [links]                     # label = URL, listed on the index page
//! "RSS Feed" = "./feed.xml"
//!
//! [projects]                  # markdown label = markdown description
//! "[me/tool](https://example.com/tool)" = "does one thing well"
//!
//! [[tools]]
//! name = "bundlephobia"
//! description = "Size of your JavaScript packages"
//! url = "https://bundlephobia.com/"
//! ```
//!
//! Maps are ordered by key, so the index page lists them alphabetically and
//! identically on every build. Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
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
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site name, used in page titles and the feed.
    pub title: String,
    /// Short tagline shown under the title on the index page.
    pub slogan: String,
    /// Absolute site URL without trailing slash; prefixes sitemap and feed links.
    pub base_url: String,
    /// Directory holding `YYYY-MM-DD-*.md` articles, relative to the site root.
    pub articles_dir: String,
    /// Stylesheet copied verbatim to the output directory, relative to the site root.
    pub stylesheet: String,
    /// Link label → URL.
    pub links: BTreeMap<String, String>,
    /// Markdown label → markdown description.
    pub projects: BTreeMap<String, String>,
    pub tools: Vec<Tool>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "My Blog".to_string(),
            slogan: String::new(),
            base_url: "https://example.com".to_string(),
            articles_dir: "articles".to_string(),
            stylesheet: "style.css".to_string(),
            links: BTreeMap::from([("RSS Feed".to_string(), "./feed.xml".to_string())]),
            projects: BTreeMap::new(),
            tools: Vec::new(),
        }
    }
}

/// An external tool recommended on the index page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Tool {
    pub name: String,
    pub description: String,
    pub url: String,
}

impl SiteConfig {
    /// Validate config values are usable by the generators.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.title.trim().is_empty() {
            return Err(ConfigError::Validation("title must not be empty".into()));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::Validation(
                "base_url must start with http:// or https://".into(),
            ));
        }
        if self.articles_dir.trim().is_empty() {
            return Err(ConfigError::Validation(
                "articles_dir must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// `base_url` without trailing slashes.
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
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

/// Load config from the TOML file at `path`.
///
/// A missing file yields the stock defaults. A file that exists but does not
/// parse, carries unknown keys or fails validation is an error.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    let overlay = if path.exists() {
        let content = fs::read_to_string(path)?;
        Some(toml::from_str::<toml::Value>(&content)?)
    } else {
        None
    };
    resolve_config(stock_defaults_value(), overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# nobloat configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# Site name, used in page titles and as the feed title.
title = "My Blog"

# Short tagline shown under the title on the index page.
slogan = ""

# Absolute URL the site is served from. Sitemap and feed links are built
# from it, so it must start with http:// or https://.
base_url = "https://example.com"

# Directory holding the articles, relative to the site root.
# Articles are named YYYY-MM-DD-<slug>.md; anything else is skipped.
articles_dir = "articles"

# Stylesheet copied to the output directory (skipped if missing).
stylesheet = "style.css"

# ---------------------------------------------------------------------------
# Links listed on the index page: label = URL
# ---------------------------------------------------------------------------
[links]
"RSS Feed" = "./feed.xml"

# ---------------------------------------------------------------------------
# Projects listed on the index page: markdown label = markdown description
# ---------------------------------------------------------------------------
[projects]
# "[me/tool](https://example.com/tool)" = "does one thing well"

# ---------------------------------------------------------------------------
# Tools listed on the index page
# ---------------------------------------------------------------------------
# [[tools]]
# name = "bundlephobia"
# description = "Size of your JavaScript packages"
# url = "https://bundlephobia.com/"
"##
}
