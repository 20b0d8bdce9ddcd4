//! Messaging commands: send, not-registered.
//!
//! CHANGELOG:
//! - 10/15/2026 - Enrollment request for students missing from the roster
//! - 10/14/2026 - Initial implementation

use super::{select_student, start_session};
use crate::output::OutputControls;
use crate::roster::ContactSlot;
use crate::session::{Outcome, UiEvent};
use crate::settings::Settings;
use anyhow::{Context, Result};
use serde_json::json;

/// Recipient of a credentials message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Contact(ContactSlot),
    Phone(String),
}

/// Parse `--to`: `primary`, `secondary`, or a phone number.
pub fn parse_target(value: &str) -> Result<Target, String> {
    match value.trim().to_lowercase().as_str() {
        "primary" => Ok(Target::Contact(ContactSlot::Primary)),
        "secondary" => Ok(Target::Contact(ContactSlot::Secondary)),
        "" => Err("expected 'primary', 'secondary' or a phone number".to_string()),
        _ => Ok(Target::Phone(value.trim().to_string())),
    }
}

/// Send a student's credentials to a contact or phone number.
pub fn send(
    settings: &Settings,
    class_name: &str,
    student: &str,
    target: &Target,
    dry_run: bool,
    output: &OutputControls,
) -> Result<()> {
    let mut session = start_session(settings, dry_run)?;
    select_student(&mut session, class_name, student)?;

    let event = match target {
        Target::Contact(slot) => UiEvent::SendToContact { slot: *slot },
        Target::Phone(phone) => UiEvent::SendToPhone {
            phone: phone.clone(),
        },
    };
    let outcome = session.handle(event).context("Failed to send message")?;

    report_sent(&outcome, output);
    Ok(())
}

/// Ask the primary contact to enroll a student missing from a class.
pub fn not_registered(
    settings: &Settings,
    class_name: &str,
    student_name: &str,
    student_phone: Option<&str>,
    dry_run: bool,
    output: &OutputControls,
) -> Result<()> {
    // The request needs only the contact config; a missing roster is fine
    let mut session = settings.open_session(dry_run);
    if let Err(e) = session.start() {
        tracing::warn!(error = %e, "roster unavailable, sending request anyway");
    }

    let outcome = session
        .handle(UiEvent::RequestInclusion {
            class_name: class_name.to_string(),
            student_name: student_name.to_string(),
            send_to_student: student_phone.is_some(),
            student_phone: student_phone.map(String::from),
        })
        .context("Failed to send enrollment request")?;

    report_sent(&outcome, output);
    Ok(())
}

fn report_sent(outcome: &Outcome, output: &OutputControls) {
    let Outcome::MessageSent { link } = outcome else {
        return;
    };

    if output.json {
        output.print(&json!({
            "success": true,
            "phone": link.phone,
            "url": link.url
        }));
    } else {
        eprintln!("Link opened for {}", link.phone);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_target_slots() {
        assert_eq!(parse_target("primary"), Ok(Target::Contact(ContactSlot::Primary)));
        assert_eq!(parse_target(" Secondary "), Ok(Target::Contact(ContactSlot::Secondary)));
    }

    #[test]
    fn test_parse_target_phone() {
        assert_eq!(
            parse_target("(66) 99999-9999"),
            Ok(Target::Phone("(66) 99999-9999".to_string()))
        );
        assert!(parse_target("  ").is_err());
    }
}
