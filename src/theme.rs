//! Theme and language preferences.
//!
//! Preferences live in a small key-value store with two keys, `theme` and
//! `language`. Storage is never allowed to break the page: an unreadable or
//! disabled store reads as "no preference", and a failed write is logged and
//! forgotten.

use crate::page::{Locale, Page};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub const THEME_KEY: &str = "theme";
pub const LANGUAGE_KEY: &str = "language";

/// Attribute on `<html>` that selects the colour scheme.
pub const THEME_ATTRIBUTE: &str = "data-bs-theme";

#[derive(Error, Debug)]
pub enum PreferenceError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("preference storage is unavailable")]
    Unavailable,
}

pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

/// Preferences kept as a flat JSON object on disk.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, PreferenceError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        // A corrupt file is replaced rather than blocking the write.
        let mut values = self.read_all().unwrap_or_default();
        values.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&values)?)?;
        Ok(())
    }
}

/// In-process store. `disabled()` behaves like storage blocked by a private
/// browsing mode: every call fails.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    values: BTreeMap<String, String>,
    disabled: bool,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn disabled() -> Self {
        Self {
            values: BTreeMap::new(),
            disabled: true,
        }
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        if self.disabled {
            return Err(PreferenceError::Unavailable);
        }
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        if self.disabled {
            return Err(PreferenceError::Unavailable);
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Read a preference, treating any storage failure as absent.
fn read_soft(store: &dyn PreferenceStore, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(err) => {
            tracing::debug!(key, %err, "preference unreadable, using default");
            None
        }
    }
}

/// Write a preference, logging and swallowing failures.
fn write_soft(store: &mut dyn PreferenceStore, key: &str, value: &str) -> bool {
    match store.set(key, value) {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(key, %err, "could not persist preference");
            false
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Anything other than `"dark"` is light.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    /// Label describing what pressing the toggle will do.
    fn next_label(self) -> &'static str {
        match self {
            Theme::Dark => "Switch to light theme",
            Theme::Light => "Switch to dark theme",
        }
    }

    fn icon_class(self) -> &'static str {
        match self {
            Theme::Dark => "bi bi-moon-fill",
            Theme::Light => "bi bi-sun-fill",
        }
    }
}

pub struct ThemeController<S: PreferenceStore> {
    current: Theme,
    store: S,
}

impl<S: PreferenceStore> ThemeController<S> {
    /// Start from the stored theme, or light.
    pub fn new(store: S) -> Self {
        let current = Theme::from_stored(read_soft(&store, THEME_KEY).as_deref());
        Self { current, store }
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Reflect the current theme on the page without persisting it.
    pub fn apply(&self, page: &mut Page) {
        let theme = self.current;
        page.set_root_attribute(THEME_ATTRIBUTE, theme.as_str());
        let toggle = page.theme_toggle_mut();
        let label = theme.next_label();
        toggle.aria_label = label.to_string();
        toggle.title = label.to_string();
        toggle.hidden_text = label.to_string();
        toggle.aria_pressed = theme == Theme::Dark;
        toggle.icon_class = theme.icon_class().to_string();
    }

    /// Flip the theme, update the page, and persist the choice.
    pub fn toggle(&mut self, page: &mut Page) -> Theme {
        self.current = self.current.toggled();
        self.apply(page);
        write_soft(&mut self.store, THEME_KEY, self.current.as_str());
        self.current
    }

    /// Flip and persist without a page, for the CLI. Returns the new theme
    /// and whether it was stored.
    pub fn toggle_stored(&mut self) -> (Theme, bool) {
        self.current = self.current.toggled();
        let stored = write_soft(&mut self.store, THEME_KEY, self.current.as_str());
        (self.current, stored)
    }
}

/// Stored language, or `default` if absent, unreadable, or unknown.
pub fn read_language(store: &dyn PreferenceStore, default: Locale) -> Locale {
    read_soft(store, LANGUAGE_KEY)
        .and_then(|code| code.parse().ok())
        .unwrap_or(default)
}

/// Persist a language choice. Returns whether it was stored.
pub fn write_language(store: &mut dyn PreferenceStore, locale: Locale) -> bool {
    write_soft(store, LANGUAGE_KEY, locale.code())
}
