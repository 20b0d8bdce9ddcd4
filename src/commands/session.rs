//! Interactive session: NDJSON events on stdin, responses on stdout.

use crate::dispatch::launcher::{DiscardLauncher, Launcher, SystemLauncher};
use crate::session::server::SessionServer;
use crate::settings::Settings;
use anyhow::Result;

/// Run the session loop until stdin closes.
///
/// The first output line reports the roster load (id `startup`). A load
/// failure does not stop the loop, so the view can show the error and offer
/// a refresh. With `dry_run` links are only reported in the responses;
/// stdout carries nothing but NDJSON.
pub fn run(settings: &Settings, dry_run: bool) -> Result<()> {
    let launcher: Box<dyn Launcher> = if dry_run {
        Box::new(DiscardLauncher)
    } else {
        Box::new(SystemLauncher)
    };

    let mut server = SessionServer::new(settings.open_session_with(launcher));
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout().lock();
    server.start(&mut stdout)?;
    server.serve(stdin.lock(), &mut stdout)
}
