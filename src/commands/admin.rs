//! Configuration panel commands: refresh, config, add-student, remove-student.
//!
//! CHANGELOG:
//! - 10/16/2026 - Add/remove students
//! - 10/15/2026 - Initial implementation

use super::start_session;
use crate::output::OutputControls;
use crate::roster::{StudentId, StudentRecord};
use crate::session::{Outcome, Session, UiEvent};
use crate::settings::Settings;
use anyhow::{Context, Result};
use serde_json::json;
use tracing::warn;

fn unlock(session: &mut Session, password: &str) -> Result<()> {
    session
        .handle(UiEvent::UnlockConfig {
            password: password.to_string(),
        })
        .context("Could not open configuration panel")?;
    Ok(())
}

/// Re-download the roster source and replace the cached roster.
pub fn refresh(settings: &Settings, output: &OutputControls) -> Result<()> {
    let mut session = settings.open_session(true);
    if let Err(e) = session.start() {
        warn!(error = %e, "no usable roster before refresh");
    }

    let outcome = session.handle(UiEvent::Refresh).context("Refresh failed")?;
    let Outcome::Refreshed { report, .. } = &outcome else {
        return Ok(());
    };

    if output.json {
        output.print(&outcome);
    } else {
        println!(
            "Sucesso! Banco de dados atualizado com {} alunos.",
            report.students
        );
        if report.skipped_rows > 0 {
            println!(
                "Atenção: {} linha(s) ignorada(s) (menos de 4 colunas ou turma vazia).",
                report.skipped_rows
            );
        }
    }
    Ok(())
}

/// Show the configured contacts.
pub fn config_show(settings: &Settings, password: &str, output: &OutputControls) -> Result<()> {
    let mut session = settings.open_session(true);
    // Contacts load before the roster, so a roster failure does not matter here
    if let Err(e) = session.start() {
        warn!(error = %e, "roster unavailable");
    }

    let outcome = session
        .handle(UiEvent::UnlockConfig {
            password: password.to_string(),
        })
        .context("Could not open configuration panel")?;

    if output.json {
        output.print(&outcome);
    } else if let Outcome::ConfigUnlocked { config } = outcome {
        println!("primary:   {}", config.primary_contact);
        println!("secondary: {}", config.secondary_contact);
    }
    Ok(())
}

/// Change one or both contacts.
pub fn config_set(
    settings: &Settings,
    password: &str,
    primary: Option<String>,
    secondary: Option<String>,
    output: &OutputControls,
) -> Result<()> {
    let mut session = settings.open_session(true);
    if let Err(e) = session.start() {
        warn!(error = %e, "roster unavailable");
    }
    unlock(&mut session, password)?;

    let outcome = session.handle(UiEvent::UpdateConfig {
        primary_contact: primary,
        secondary_contact: secondary,
    })?;

    if output.json {
        output.print(&outcome);
    } else if let Outcome::ConfigSaved { config } = outcome {
        println!("Saved. primary: {}, secondary: {}", config.primary_contact, config.secondary_contact);
    }
    Ok(())
}

/// Add a student to the cached roster.
pub fn add_student(
    settings: &Settings,
    password: &str,
    record: StudentRecord,
    output: &OutputControls,
) -> Result<()> {
    let mut session = start_session(settings, true)?;
    unlock(&mut session, password)?;

    let name = record.name.clone();
    let outcome = session.handle(UiEvent::AddStudent { record })?;

    if output.json {
        output.print(&outcome);
    } else if let Outcome::StudentAdded { id } = outcome {
        println!("Added {} [{}]", name, id);
    }
    Ok(())
}

/// Remove a student from the cached roster.
///
/// Ids come from `students <class>` and are only valid for the current cache.
pub fn remove_student(
    settings: &Settings,
    password: &str,
    id: u32,
    output: &OutputControls,
) -> Result<()> {
    let mut session = start_session(settings, true)?;
    unlock(&mut session, password)?;

    let outcome = session.handle(UiEvent::RemoveStudent { id: StudentId(id) })?;

    if output.json {
        output.print(&json!({ "success": true, "removed": outcome }));
    } else if let Outcome::StudentRemoved { record } = outcome {
        println!("Removed {} ({})", record.name, record.class_name);
    }
    Ok(())
}
