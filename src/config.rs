//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. User values are
//! layered over stock defaults, so a config file only needs the keys it wants
//! to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "Portfolio"
//! owner = ""
//! birth_date = "2004-07-05"   # omit to leave data-age slots empty
//! default_locale = "nl"       # rendered at /index.html
//!
//! [locales]
//! nl = "data"                 # fixture folder per locale, relative to --data
//! en = "data-en"
//!
//! [reveal]
//! threshold = 0.12            # visible fraction that reveals a timeline entry
//! skills_threshold = 0.3      # same, for skill bars
//!
//! [animation]
//! start_delay_ms = 1000       # first headline colour cycle
//! letter_step_ms = 100        # delay between consecutive letters
//! letter_hold_ms = 600        # how long a letter keeps its colour
//! cycle_step_ms = 200         # per-letter share of the gap between cycles
//! cycle_pause_ms = 1000       # fixed part of the gap between cycles
//! skill_bar_delay_ms = 150    # delay before skill bars fill on entry
//!
//! [colors.light]
//! background = "#f8f9fa"
//! text = "#212529"
//! text_muted = "#6c757d"
//! border = "#dee2e6"
//! link = "#0d6efd"
//! link_hover = "#0a58ca"
//!
//! [colors.dark]
//! background = "#121212"
//! text = "#e9ecef"
//! text_muted = "#adb5bd"
//! border = "#343a40"
//! link = "#6ea8fe"
//! link_hover = "#9ec5fe"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::page::Locale;
use chrono::NaiveDate;
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
    /// Page identity and the default locale.
    pub site: SiteSection,
    /// Fixture folder for each locale.
    pub locales: LocalesConfig,
    /// Reveal-on-scroll thresholds.
    pub reveal: RevealConfig,
    /// Headline and skill-bar animation timings.
    pub animation: AnimationConfig,
    /// Color schemes for the light and dark themes.
    pub colors: ColorConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("reveal.threshold", self.reveal.threshold),
            ("reveal.skills_threshold", self.reveal.skills_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Validation(format!("{name} must be 0.0-1.0")));
            }
        }
        for locale in Locale::ALL {
            if self.locales.folder(locale).trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "locales.{locale} must not be empty"
                )));
            }
        }
        if self.animation.letter_step_ms == 0 {
            return Err(ConfigError::Validation(
                "animation.letter_step_ms must be non-zero".into(),
            ));
        }
        if self.animation.cycle_pause_ms == 0 {
            return Err(ConfigError::Validation(
                "animation.cycle_pause_ms must be non-zero".into(),
            ));
        }
        for (name, value) in self.animation.timings() {
            if value > MAX_TIMING_MS {
                return Err(ConfigError::Validation(format!(
                    "animation.{name} must be at most {MAX_TIMING_MS}"
                )));
            }
        }
        if self.site.birth_date.is_some() && self.site.birth_date().is_none() {
            return Err(ConfigError::Validation(
                "site.birth_date must be a YYYY-MM-DD date".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSection {
    /// Document `<title>`.
    pub title: String,
    /// Name shown in the animated headline.
    pub owner: String,
    /// Birth date (`YYYY-MM-DD`) used for `data-age` slots.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    /// Locale rendered at the output root.
    pub default_locale: Locale,
}

impl SiteSection {
    pub fn birth_date(&self) -> Option<NaiveDate> {
        self.birth_date
            .as_deref()
            .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
    }
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            title: "Portfolio".to_string(),
            owner: String::new(),
            birth_date: None,
            default_locale: Locale::Nl,
        }
    }
}

/// Fixture folders, relative to the data root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocalesConfig {
    pub nl: String,
    pub en: String,
}

impl LocalesConfig {
    pub fn folder(&self, locale: Locale) -> &str {
        match locale {
            Locale::Nl => &self.nl,
            Locale::En => &self.en,
        }
    }
}

impl Default for LocalesConfig {
    fn default() -> Self {
        Self {
            nl: "data".to_string(),
            en: "data-en".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevealConfig {
    /// Fraction of a timeline entry that must be visible.
    pub threshold: f64,
    /// Fraction of a skill bar that must be visible.
    pub skills_threshold: f64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: 0.12,
            skills_threshold: 0.3,
        }
    }
}

/// Upper bound for any single animation timing, in milliseconds.
pub const MAX_TIMING_MS: u64 = 60_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnimationConfig {
    pub start_delay_ms: u64,
    pub letter_step_ms: u64,
    pub letter_hold_ms: u64,
    pub cycle_step_ms: u64,
    pub cycle_pause_ms: u64,
    pub skill_bar_delay_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            start_delay_ms: 1000,
            letter_step_ms: 100,
            letter_hold_ms: 600,
            cycle_step_ms: 200,
            cycle_pause_ms: 1000,
            skill_bar_delay_ms: 150,
        }
    }
}

impl AnimationConfig {
    fn timings(&self) -> [(&'static str, u64); 6] {
        [
            ("start_delay_ms", self.start_delay_ms),
            ("letter_step_ms", self.letter_step_ms),
            ("letter_hold_ms", self.letter_hold_ms),
            ("cycle_step_ms", self.cycle_step_ms),
            ("cycle_pause_ms", self.cycle_pause_ms),
            ("skill_bar_delay_ms", self.skill_bar_delay_ms),
        ]
    }
}

/// Color configuration for the light and dark themes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    pub text: String,
    /// Secondary text (dates, captions).
    pub text_muted: String,
    pub border: String,
    pub link: String,
    pub link_hover: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#f8f9fa".to_string(),
            text: "#212529".to_string(),
            text_muted: "#6c757d".to_string(),
            border: "#dee2e6".to_string(),
            link: "#0d6efd".to_string(),
            link_hover: "#0a58ca".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#121212".to_string(),
            text: "#e9ecef".to_string(),
            text_muted: "#adb5bd".to_string(),
            border: "#343a40".to_string(),
            link: "#6ea8fe".to_string(),
            link_hover: "#9ec5fe".to_string(),
        }
    }

    fn css_variables(&self, indent: &str) -> String {
        [
            ("--color-bg", &self.background),
            ("--color-text", &self.text),
            ("--color-text-muted", &self.text_muted),
            ("--color-border", &self.border),
            ("--color-link", &self.link),
            ("--color-link-hover", &self.link_hover),
        ]
        .iter()
        .map(|(name, value)| format!("{indent}{name}: {value};"))
        .collect::<Vec<_>>()
        .join("\n")
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
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

/// Load config from a `config.toml` path.
///
/// A missing file yields the stock defaults. Unknown keys and invalid values
/// are errors.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    let overlay = if path.exists() {
        let content = fs::read_to_string(path)?;
        Some(toml::from_str::<toml::Value>(&content)?)
    } else {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        None
    };
    resolve_config(stock_defaults_value(), overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# folio configuration
# ===================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site
# ---------------------------------------------------------------------------
[site]
# Document <title>.
title = "Portfolio"

# Name shown letter by letter in the animated headline.
owner = ""

# Birth date used to fill data-age slots. Omit to leave them empty.
# birth_date = "2004-07-05"

# Locale rendered at the output root; the other locale goes to /<locale>/.
default_locale = "nl"

# ---------------------------------------------------------------------------
# Fixture folders, relative to --data (a directory or an http(s) URL)
# ---------------------------------------------------------------------------
[locales]
nl = "data"
en = "data-en"

# ---------------------------------------------------------------------------
# Reveal on scroll
# ---------------------------------------------------------------------------
[reveal]
# Fraction of a timeline entry that must be visible before it fades in.
threshold = 0.12

# Same, for skill bars.
skills_threshold = 0.3

# ---------------------------------------------------------------------------
# Animation timings (milliseconds, at most 60000 each)
# ---------------------------------------------------------------------------
# letter_step_ms and cycle_pause_ms must be non-zero.
[animation]
start_delay_ms = 1000
letter_step_ms = 100
letter_hold_ms = 600
cycle_step_ms = 200
cycle_pause_ms = 1000
skill_bar_delay_ms = 150

# ---------------------------------------------------------------------------
# Colors - light theme (data-bs-theme="light")
# ---------------------------------------------------------------------------
[colors.light]
background = "#f8f9fa"
text = "#212529"
text_muted = "#6c757d"    # Dates, year headers
border = "#dee2e6"
link = "#0d6efd"
link_hover = "#0a58ca"

# ---------------------------------------------------------------------------
# Colors - dark theme (data-bs-theme="dark")
# ---------------------------------------------------------------------------
[colors.dark]
background = "#121212"
text = "#e9ecef"
text_muted = "#adb5bd"
border = "#343a40"
link = "#6ea8fe"
link_hover = "#9ec5fe"
"##
}

/// Generate CSS custom properties for both themes.
///
/// The theme is chosen by the `data-bs-theme` attribute on `<html>`, not by
/// `prefers-color-scheme`, so the toggle always wins.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        ":root,\n[data-bs-theme=\"light\"] {{\n{}\n}}\n\n[data-bs-theme=\"dark\"] {{\n{}\n}}",
        colors.light.css_variables("    "),
        colors.dark.css_variables("    "),
    )
}
