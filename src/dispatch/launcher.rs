//! Opening deep links.
//!
//! The system launcher hands the URL to the platform opener (`open` on
//! macOS, `xdg-open` elsewhere on Unix, the URL protocol handler on Windows).
//!
//! CHANGELOG:
//! - 10/17/2026 - Discarding launcher for the dry-run session loop
//! - 10/15/2026 - Print and recording launchers
//! - 10/14/2026 - Initial implementation

use crate::error::DispatchError;
use std::cell::RefCell;
use std::process::Command;
use std::rc::Rc;

/// Opens a URL in a new browsing context.
pub trait Launcher {
    fn open(&self, url: &str) -> Result<(), DispatchError>;
}

/// Build the platform command that opens `url`.
pub fn opener_command(url: &str) -> Command {
    if cfg!(target_os = "macos") {
        let mut cmd = Command::new("open");
        cmd.arg(url);
        cmd
    } else if cfg!(target_os = "windows") {
        // `cmd /C start` would split the URL on '&'
        let mut cmd = Command::new("rundll32");
        cmd.arg("url.dll,FileProtocolHandler").arg(url);
        cmd
    } else {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(url);
        cmd
    }
}

/// Launches the platform URL opener.
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn open(&self, url: &str) -> Result<(), DispatchError> {
        let mut cmd = opener_command(url);
        let output = cmd
            .output()
            .map_err(|e| DispatchError::Launch(format!("{:?}: {}", cmd.get_program(), e)))?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(DispatchError::Launch(stderr.trim().to_string()))
        }
    }
}

/// Prints the URL to stderr instead of opening it (`--dry-run`).
///
/// stdout is left to the command output so `--json` stays parseable.
pub struct PrintLauncher;

impl Launcher for PrintLauncher {
    fn open(&self, url: &str) -> Result<(), DispatchError> {
        eprintln!("{}", url);
        Ok(())
    }
}

/// Opens nothing. For the dry-run session loop, where the link is already
/// part of the response.
pub struct DiscardLauncher;

impl Launcher for DiscardLauncher {
    fn open(&self, _url: &str) -> Result<(), DispatchError> {
        Ok(())
    }
}

/// Keeps every URL it was asked to open.
#[derive(Default)]
pub struct RecordingLauncher {
    opened: RefCell<Vec<String>>,
}

impl RecordingLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.borrow().clone()
    }
}

impl Launcher for RecordingLauncher {
    fn open(&self, url: &str) -> Result<(), DispatchError> {
        self.opened.borrow_mut().push(url.to_string());
        Ok(())
    }
}

impl<T: Launcher + ?Sized> Launcher for Rc<T> {
    fn open(&self, url: &str) -> Result<(), DispatchError> {
        (**self).open(url)
    }
}
