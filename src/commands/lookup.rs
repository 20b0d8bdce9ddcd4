//! Lookup commands: classes, students, show.
//!
//! CHANGELOG:
//! - 10/14/2026 - Initial implementation

use super::{select_student, start_session};
use crate::output::OutputControls;
use crate::session::{Outcome, UiEvent};
use crate::settings::Settings;
use anyhow::{anyhow, Result};

/// List classes in display order.
pub fn classes(settings: &Settings, output: &OutputControls) -> Result<()> {
    let mut session = start_session(settings, true)?;

    let Outcome::Classes { classes } = session.handle(UiEvent::ListClasses)? else {
        return Err(anyhow!("Unexpected outcome listing classes"));
    };

    if output.json {
        output.print(&classes);
        return Ok(());
    }

    for class_name in &classes {
        let count = session.store().roster().students_in(class_name).len();
        println!("{} ({})", class_name, count);
    }
    Ok(())
}

/// List the students of one class, sorted by name.
pub fn students(settings: &Settings, class_name: &str, output: &OutputControls) -> Result<()> {
    let mut session = start_session(settings, true)?;

    let outcome = session.handle(UiEvent::SelectClass {
        class_name: class_name.to_string(),
    })?;
    let Outcome::ClassSelected { students, .. } = &outcome else {
        return Err(anyhow!("Unexpected outcome selecting class"));
    };

    if output.json {
        output.print(&outcome);
        return Ok(());
    }

    if students.is_empty() {
        println!("Nenhum aluno encontrado nesta turma.");
        return Ok(());
    }

    println!("{} ({}):", class_name, students.len());
    println!("{}", "-".repeat(50));
    for student in students {
        println!("[{}] {}", student.id, student.name);
    }
    Ok(())
}

/// Show the credentials message for one student.
pub fn show(
    settings: &Settings,
    class_name: &str,
    student: &str,
    markup: bool,
    output: &OutputControls,
) -> Result<()> {
    let mut session = start_session(settings, true)?;
    let outcome = select_student(&mut session, class_name, student)?;

    if output.json {
        output.print(&outcome);
        return Ok(());
    }

    if let Outcome::StudentSelected {
        message,
        markup: rendered,
        ..
    } = outcome
    {
        println!("{}", if markup { rendered } else { message });
    }
    Ok(())
}
