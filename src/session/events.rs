//! Events the view layer sends to the session, and what comes back.
//!
//! CHANGELOG:
//! - 10/17/2026 - Startup `loaded` outcome
//! - 10/16/2026 - Config panel events (unlock, contacts, add/remove student)
//! - 10/15/2026 - Initial event set

use crate::dispatch::DeepLink;
use crate::roster::{ContactSlot, LoadReport, RosterConfig, Student, StudentId, StudentRecord};
use serde::{Deserialize, Serialize};

/// One operator action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiEvent {
    /// Class names in display order.
    ListClasses,

    /// Pick a class; clears any selected student.
    SelectClass { class_name: String },

    /// Pick a student of the current roster.
    SelectStudent { id: StudentId },

    /// Send the selected student's credentials to a configured contact.
    SendToContact { slot: ContactSlot },

    /// Send the selected student's credentials to an ad-hoc number.
    SendToPhone { phone: String },

    /// Ask the primary contact to enroll a student missing from the roster.
    RequestInclusion {
        class_name: String,
        student_name: String,
        #[serde(default)]
        send_to_student: bool,
        #[serde(default)]
        student_phone: Option<String>,
    },

    /// Re-fetch the roster source.
    Refresh,

    /// Open the configuration panel.
    UnlockConfig { password: String },

    /// Close the configuration panel.
    LockConfig,

    /// Change one or both contacts (panel must be unlocked).
    UpdateConfig {
        #[serde(default)]
        primary_contact: Option<String>,
        #[serde(default)]
        secondary_contact: Option<String>,
    },

    /// Add a student (panel must be unlocked).
    AddStudent { record: StudentRecord },

    /// Remove a student (panel must be unlocked).
    RemoveStudent { id: StudentId },
}

impl UiEvent {
    /// Wire name of the event, safe to log (no payload).
    pub fn name(&self) -> &'static str {
        match self {
            UiEvent::ListClasses => "list_classes",
            UiEvent::SelectClass { .. } => "select_class",
            UiEvent::SelectStudent { .. } => "select_student",
            UiEvent::SendToContact { .. } => "send_to_contact",
            UiEvent::SendToPhone { .. } => "send_to_phone",
            UiEvent::RequestInclusion { .. } => "request_inclusion",
            UiEvent::Refresh => "refresh",
            UiEvent::UnlockConfig { .. } => "unlock_config",
            UiEvent::LockConfig => "lock_config",
            UiEvent::UpdateConfig { .. } => "update_config",
            UiEvent::AddStudent { .. } => "add_student",
            UiEvent::RemoveStudent { .. } => "remove_student",
        }
    }
}

/// List entry for the student picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentSummary {
    pub id: StudentId,
    pub name: String,
}

impl From<&Student> for StudentSummary {
    fn from(student: &Student) -> Self {
        Self {
            id: student.id,
            name: student.record.name.clone(),
        }
    }
}

/// Result of handling a `UiEvent`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outcome {
    /// Startup roster load (unsolicited first line of the session loop).
    Loaded {
        report: LoadReport,
    },
    Classes {
        classes: Vec<String>,
    },
    ClassSelected {
        class_name: String,
        students: Vec<StudentSummary>,
    },
    StudentSelected {
        student: Student,
        message: String,
        markup: String,
    },
    MessageSent {
        link: DeepLink,
    },
    Refreshed {
        report: LoadReport,
        /// Re-rendered list for the selected class, if any.
        students: Option<Vec<StudentSummary>>,
    },
    ConfigUnlocked {
        config: RosterConfig,
    },
    ConfigLocked,
    ConfigSaved {
        config: RosterConfig,
    },
    StudentAdded {
        id: StudentId,
    },
    StudentRemoved {
        record: StudentRecord,
    },
}
