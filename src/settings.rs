//! Runtime settings: data directory and roster source location.
//!
//! Resolution order for each setting:
//! 1. CLI flag
//! 2. Environment variable (`PLURALL_DATA_DIR`, `PLURALL_ROSTER_SOURCE`)
//! 3. Platform data dir (`dirs::data_dir()/plurall-access`)
//! 4. `./.plurall-access`
//!
//! The default roster source is `Dados de acesso.csv` inside the data dir.
//!
//! CHANGELOG:
//! - 10/14/2026 - Initial implementation

use crate::dispatch::launcher::{Launcher, PrintLauncher, SystemLauncher};
use crate::dispatch::Dispatcher;
use crate::roster::RosterStore;
use crate::session::Session;
use crate::source::{self, DEFAULT_CSV_NAME};
use crate::storage::FileStorage;
use std::path::PathBuf;
use tracing::debug;

pub const DATA_DIR_ENV: &str = "PLURALL_DATA_DIR";
pub const SOURCE_ENV: &str = "PLURALL_ROSTER_SOURCE";

const APP_DIR_NAME: &str = "plurall-access";

/// Resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub source: String,
}

impl Settings {
    /// Resolve from CLI flags and the process environment.
    pub fn resolve(data_dir: Option<PathBuf>, source: Option<String>) -> Self {
        Self::resolve_with(data_dir, source, |key| std::env::var(key).ok())
    }

    /// Resolve with an explicit environment lookup.
    pub fn resolve_with<F>(data_dir: Option<PathBuf>, source: Option<String>, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = data_dir
            .or_else(|| env(DATA_DIR_ENV).filter(|v| !v.is_empty()).map(PathBuf::from))
            .unwrap_or_else(default_data_dir);

        let source = source
            .or_else(|| env(SOURCE_ENV).filter(|v| !v.is_empty()))
            .unwrap_or_else(|| data_dir.join(DEFAULT_CSV_NAME).display().to_string());

        debug!(data_dir = %data_dir.display(), source = %source, "settings resolved");
        Self { data_dir, source }
    }

    /// Build a session over file storage in the data dir.
    ///
    /// `dry_run` prints deep links instead of opening them.
    pub fn open_session(&self, dry_run: bool) -> Session {
        let launcher: Box<dyn Launcher> = if dry_run {
            Box::new(PrintLauncher)
        } else {
            Box::new(SystemLauncher)
        };
        self.open_session_with(launcher)
    }

    /// Build a session with an explicit launcher.
    pub fn open_session_with(&self, launcher: Box<dyn Launcher>) -> Session {
        let store = RosterStore::new(
            Box::new(FileStorage::new(&self.data_dir)),
            source::from_location(&self.source),
        );
        Session::new(store, Dispatcher::new(launcher))
    }
}

/// Platform data directory for this tool.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(format!(".{}", APP_DIR_NAME)))
}
