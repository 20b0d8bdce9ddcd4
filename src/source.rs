//! Roster CSV sources: local file or HTTP URL.
//!
//! CHANGELOG:
//! - 10/15/2026 - Cache-busting token for refresh
//! - 10/14/2026 - Initial implementation

use anyhow::{anyhow, Context, Result};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use tracing::debug;

/// Default CSV file name inside the data directory.
pub const DEFAULT_CSV_NAME: &str = "Dados de acesso.csv";

/// Where the roster CSV comes from.
pub trait RosterSource {
    /// Human-readable location for messages and logs.
    fn describe(&self) -> String;

    /// Fetch the raw CSV text. `bust_cache` asks the source to skip any cache.
    fn fetch(&self, bust_cache: bool) -> Result<String>;
}

/// Build a source from a location string.
///
/// `http://` and `https://` locations are fetched over HTTP, anything else
/// is read as a file path.
pub fn from_location(location: &str) -> Box<dyn RosterSource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Box::new(HttpSource::new(location))
    } else {
        Box::new(FileSource::new(location))
    }
}

/// CSV file on disk.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RosterSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self, _bust_cache: bool) -> Result<String> {
        debug!(path = %self.path.display(), "reading roster csv");
        std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read roster file: {:?}", self.path))
    }
}

/// CSV served over HTTP.
pub struct HttpSource {
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Append a `v=<millis>` uniqueness token to a URL.
pub fn cache_busted_url(url: &str, millis: i64) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}v={}", url, separator, millis)
}

impl RosterSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self, bust_cache: bool) -> Result<String> {
        let url = if bust_cache {
            cache_busted_url(&self.url, chrono::Utc::now().timestamp_millis())
        } else {
            self.url.clone()
        };

        debug!(url = %url, "downloading roster csv");
        let response = reqwest::blocking::get(&url)
            .with_context(|| format!("Failed to download roster from {}", url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("Roster download from {} returned HTTP {}", url, status));
        }

        response
            .text()
            .with_context(|| format!("Failed to read roster body from {}", url))
    }
}

/// Fixed in-memory CSV text, swappable between fetches (tests, piped input).
pub struct StaticSource {
    content: RefCell<Result<String, String>>,
}

impl StaticSource {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: RefCell::new(Ok(content.into())),
        }
    }

    /// A source whose fetch always fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            content: RefCell::new(Err(message.into())),
        }
    }

    pub fn set(&self, content: impl Into<String>) {
        *self.content.borrow_mut() = Ok(content.into());
    }

    pub fn fail(&self, message: impl Into<String>) {
        *self.content.borrow_mut() = Err(message.into());
    }
}

impl RosterSource for StaticSource {
    fn describe(&self) -> String {
        "<static>".to_string()
    }

    fn fetch(&self, _bust_cache: bool) -> Result<String> {
        self.content.borrow().clone().map_err(|e| anyhow!(e))
    }
}

impl<T: RosterSource + ?Sized> RosterSource for Rc<T> {
    fn describe(&self) -> String {
        (**self).describe()
    }

    fn fetch(&self, bust_cache: bool) -> Result<String> {
        (**self).fetch(bust_cache)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_busted_url() {
        assert_eq!(
            cache_busted_url("https://host/Dados%20de%20acesso.csv", 42),
            "https://host/Dados%20de%20acesso.csv?v=42"
        );
        assert_eq!(
            cache_busted_url("https://host/roster.csv?sheet=1", 42),
            "https://host/roster.csv?sheet=1&v=42"
        );
    }

    #[test]
    fn test_from_location_picks_backend() {
        assert_eq!(from_location("https://example.com/a.csv").describe(), "https://example.com/a.csv");
        assert_eq!(from_location("data/a.csv").describe(), "data/a.csv");
    }

    #[test]
    fn test_file_source_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CSV_NAME);
        std::fs::write(&path, "5º Ano,Ana,a,p\n").unwrap();

        let source = FileSource::new(&path);
        assert_eq!(source.fetch(true).unwrap(), "5º Ano,Ana,a,p\n");
    }

    #[test]
    fn test_file_source_missing_file_errors() {
        let source = FileSource::new("/nonexistent/roster.csv");
        assert!(source.fetch(false).is_err());
    }

    #[test]
    fn test_static_source_swaps_content() {
        let source = StaticSource::new("a");
        source.set("b");
        assert_eq!(source.fetch(false).unwrap(), "b");
        source.fail("offline");
        assert_eq!(source.fetch(false).unwrap_err().to_string(), "offline");
    }
}
