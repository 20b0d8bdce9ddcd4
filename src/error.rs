//! Error types shared by the roster store, dispatch and session layers.
//!
//! CHANGELOG:
//! - 10/17/2026 - Selection must come from the listed class
//! - 10/16/2026 - Added session errors (selection, config panel)
//! - 10/14/2026 - Initial error taxonomy

use thiserror::Error;

use crate::roster::StudentId;

/// Errors raised while reading or writing on-device storage.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O failed for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Stored value for key '{key}' is not valid JSON: {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised by the roster store.
#[derive(Error, Debug)]
pub enum RosterError {
    /// CSV fetch or parse failed; no roster replaces the current one.
    #[error("Failed to load roster from {source_name}: {reason}")]
    LoadError { source_name: String, reason: String },

    /// Refresh produced zero usable rows; the prior roster is kept.
    #[error("Roster source {0} is empty or invalid (no usable rows)")]
    EmptyOrInvalidData(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors raised while building or opening a deep link.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Phone number is not configured")]
    MissingConfiguredContact,

    #[error("Invalid phone number '{0}': at least 10 digits (area code + number) required")]
    InvalidPhoneNumber(String),

    #[error("Failed to open link: {0}")]
    Launch(String),
}

/// Errors surfaced to the operator by the session.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("No student selected")]
    NoStudentSelected,

    #[error("Unknown student id {0}")]
    UnknownStudent(StudentId),

    #[error("Student {0} is not in the selected class")]
    StudentNotInClass(StudentId),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Configuration panel is locked")]
    ConfigLocked,

    #[error("Wrong configuration password")]
    WrongPassword,
}

impl AppError {
    /// Stable machine-readable code for NDJSON responses.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Roster(RosterError::LoadError { .. }) => "LOAD_ERROR",
            AppError::Roster(RosterError::EmptyOrInvalidData(_)) => "EMPTY_OR_INVALID_DATA",
            AppError::Roster(RosterError::Storage(_)) | AppError::Storage(_) => "STORAGE_ERROR",
            AppError::Dispatch(DispatchError::MissingConfiguredContact) => {
                "MISSING_CONFIGURED_CONTACT"
            }
            AppError::Dispatch(DispatchError::InvalidPhoneNumber(_)) => "INVALID_PHONE",
            AppError::Dispatch(DispatchError::Launch(_)) => "LAUNCH_FAILED",
            AppError::NoStudentSelected => "NO_STUDENT_SELECTED",
            AppError::UnknownStudent(_) => "UNKNOWN_STUDENT",
            AppError::StudentNotInClass(_) => "STUDENT_NOT_IN_CLASS",
            AppError::MissingField(_) => "MISSING_FIELD",
            AppError::ConfigLocked => "CONFIG_LOCKED",
            AppError::WrongPassword => "WRONG_PASSWORD",
        }
    }
}
