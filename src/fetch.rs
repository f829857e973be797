//! Fixture transport.
//!
//! Pipelines fetch through the [`Fetcher`] trait so they can be exercised
//! without a network or a data directory. Two implementations ship:
//!
//! - [`FsFetcher`] reads from a local data root; a missing file answers 404
//! - [`HttpFetcher`] issues a GET against a base URL with `ureq`
//!
//! A fetcher reports transport problems as [`FetchError`]. A non-2xx status is
//! *not* an error at this layer: it comes back as a [`Response`] and the
//! pipeline decides what it means.

use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use ureq::Agent;

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 15;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("could not fetch {locator}: {message}")]
    Transport { locator: String, message: String },
}

impl FetchError {
    pub fn transport(locator: &str, message: impl ToString) -> Self {
        Self::Transport {
            locator: locator.to_string(),
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: String::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub trait Fetcher: Send + Sync {
    /// Fetch one resource, relative to the fetcher's root.
    fn fetch(&self, locator: &str) -> Result<Response, FetchError>;

    /// Human-readable root, for CLI output.
    fn describe(&self) -> String;
}

/// Reads fixtures from a directory.
#[derive(Debug, Clone)]
pub struct FsFetcher {
    root: PathBuf,
}

impl FsFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Fetcher for FsFetcher {
    fn fetch(&self, locator: &str) -> Result<Response, FetchError> {
        let path = self.root.join(locator);
        match std::fs::read_to_string(&path) {
            Ok(body) => Ok(Response::ok(body)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Response::status(404)),
            Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
                Ok(Response::status(403))
            }
            Err(err) => Err(FetchError::transport(locator, err)),
        }
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// Fetches fixtures over HTTP.
pub struct HttpFetcher {
    agent: Agent,
    base_url: String,
}

impl HttpFetcher {
    pub fn new(base_url: &str) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, locator: &str) -> Result<Response, FetchError> {
        let url = format!("{}/{}", self.base_url, locator.trim_start_matches('/'));
        tracing::debug!(%url, "fetching fixture");
        let response = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| FetchError::transport(locator, e))?;
        let status = response.status().as_u16();
        let body = response
            .into_body()
            .read_to_string()
            .map_err(|e| FetchError::transport(locator, e))?;
        Ok(Response { status, body })
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

/// Pick a fetcher for a `--data` argument: URLs go over HTTP, anything else
/// is a directory.
pub fn for_root(root: &str) -> Box<dyn Fetcher> {
    if root.starts_with("http://") || root.starts_with("https://") {
        Box::new(HttpFetcher::new(root))
    } else {
        Box::new(FsFetcher::new(root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn fs_fetcher_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("data-en")).unwrap();
        fs::write(tmp.path().join("data-en/skills.json"), "[]").unwrap();

        let fetcher = FsFetcher::new(tmp.path());
        let response = fetcher.fetch("data-en/skills.json").unwrap();
        assert!(response.is_success());
        assert_eq!(response.body, "[]");
    }

    #[test]
    fn fs_fetcher_missing_file_is_404() {
        let tmp = TempDir::new().unwrap();
        let response = FsFetcher::new(tmp.path()).fetch("data/none.json").unwrap();
        assert_eq!(response.status, 404);
        assert!(!response.is_success());
    }

    #[test]
    fn fs_fetcher_directory_is_transport_error() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("data/skills.json")).unwrap();
        let result = FsFetcher::new(tmp.path()).fetch("data/skills.json");
        assert!(matches!(result, Err(FetchError::Transport { .. })));
    }

    #[test]
    fn response_success_range() {
        assert!(Response::status(204).is_success());
        assert!(!Response::status(301).is_success());
        assert!(!Response::status(500).is_success());
    }

    #[test]
    fn for_root_describes_source() {
        assert_eq!(for_root("site/data").describe(), "site/data");
        assert_eq!(
            for_root("https://example.com/portfolio/").describe(),
            "https://example.com/portfolio"
        );
    }
}
