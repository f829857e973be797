//! Shared test utilities.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! // canned responses, no filesystem
//! let fetcher = MockFetcher::new()
//!     .with_json("skills.json", r#"[{"name":"Rust","level":80}]"#)
//!     .with_status("academic.json", 404);
//!
//! // the English fixture set, with one response overridden
//! let fetcher = fixture_fetcher("data-en").with_transport_error("skills.json");
//!
//! // an isolated copy of fixtures/ on disk
//! let tmp = setup_fixtures();
//! ```

use crate::fetch::{FetchError, Fetcher, Response};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// =========================================================================
// Fixture setup
// =========================================================================

pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Copy `fixtures/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    copy_dir_recursive(&fixtures_dir(), tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Mock fetcher
// =========================================================================

/// Serves canned responses keyed by locator. Unknown locators answer 404.
#[derive(Debug, Default)]
pub struct MockFetcher {
    responses: HashMap<String, Result<Response, String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_json(mut self, locator: &str, body: &str) -> Self {
        self.responses
            .insert(locator.to_string(), Ok(Response::ok(body)));
        self
    }

    pub fn with_status(mut self, locator: &str, status: u16) -> Self {
        self.responses
            .insert(locator.to_string(), Ok(Response::status(status)));
        self
    }

    pub fn with_transport_error(mut self, locator: &str) -> Self {
        self.responses
            .insert(locator.to_string(), Err("connection refused".to_string()));
        self
    }
}

impl Fetcher for MockFetcher {
    fn fetch(&self, locator: &str) -> Result<Response, FetchError> {
        match self.responses.get(locator) {
            Some(Ok(response)) => Ok(response.clone()),
            Some(Err(message)) => Err(FetchError::transport(locator, message)),
            None => Ok(Response::status(404)),
        }
    }

    fn describe(&self) -> String {
        "mock".to_string()
    }
}

/// A [`MockFetcher`] preloaded with every JSON file in `fixtures/<folder>`.
pub fn fixture_fetcher(folder: &str) -> MockFetcher {
    let dir = fixtures_dir().join(folder);
    let mut fetcher = MockFetcher::new();
    for entry in std::fs::read_dir(&dir).unwrap_or_else(|e| panic!("{}: {e}", dir.display())) {
        let path = entry.unwrap().path();
        if path.extension().is_some_and(|ext| ext == "json") {
            let name = path.file_name().unwrap().to_string_lossy().into_owned();
            let body = std::fs::read_to_string(&path).unwrap();
            fetcher = fetcher.with_json(&name, &body);
        }
    }
    fetcher
}

// =========================================================================
// Markup helpers
// =========================================================================

/// Byte offset of `needle` in `html`. Panics with the document on a miss.
pub fn position_of(html: &str, needle: &str) -> usize {
    html.find(needle)
        .unwrap_or_else(|| panic!("'{needle}' not found in:\n{html}"))
}

/// Assert that `needles` appear in `html` in the given order.
pub fn assert_in_order(html: &str, needles: &[&str]) {
    let positions: Vec<usize> = needles.iter().map(|n| position_of(html, n)).collect();
    assert!(
        positions.windows(2).all(|w| w[0] < w[1]),
        "expected {needles:?} in order, found at {positions:?}"
    );
}
