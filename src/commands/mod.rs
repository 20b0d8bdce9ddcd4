//! Command implementations.
//!
//! Each command opens a `Session`, replays the operator's clicks as
//! `UiEvent`s, and prints the outcome.
//!
//! CHANGELOG:
//! - 10/16/2026 - Config panel commands
//! - 10/14/2026 - Initial module structure

pub mod admin;
pub mod lookup;
pub mod messaging;
pub mod session;

use crate::session::{Outcome, Session, UiEvent};
use crate::settings::Settings;
use anyhow::{anyhow, Context, Result};

/// Open a session and load config + roster, failing if no roster is available.
pub(crate) fn start_session(settings: &Settings, dry_run: bool) -> Result<Session> {
    let mut session = settings.open_session(dry_run);
    session
        .start()
        .with_context(|| format!("Roster unavailable (source: {})", settings.source))?;
    Ok(session)
}

/// Select `class_name` then the student best matching `student`.
///
/// Returns the `StudentSelected` outcome (record, message, markup).
pub(crate) fn select_student(session: &mut Session, class_name: &str, student: &str) -> Result<Outcome> {
    let id = session
        .store()
        .roster()
        .find_in_class(class_name, student)
        .map(|s| s.id)
        .ok_or_else(|| {
            anyhow!(
                "Student '{}' not found in class '{}'. Use 'not-registered' to request enrollment.",
                student,
                class_name
            )
        })?;

    session.handle(UiEvent::SelectClass {
        class_name: class_name.to_string(),
    })?;
    Ok(session.handle(UiEvent::SelectStudent { id })?)
}
