//! Session - explicit application state and the UI-event dispatcher.
//!
//! The view layer (CLI subcommands, NDJSON loop) owns one `Session` and
//! feeds it `UiEvent`s. Nothing here knows about terminals or browsers.
//!
//! CHANGELOG:
//! - 10/17/2026 - Student selection scoped to the selected class
//! - 10/16/2026 - Config panel (password gate, contacts, add/remove)
//! - 10/15/2026 - Initial implementation

pub mod events;
pub mod protocol;
pub mod server;

pub use events::{Outcome, StudentSummary, UiEvent};

use crate::compose;
use crate::dispatch::{validate_adhoc_phone, Dispatcher};
use crate::error::AppError;
use crate::roster::{ContactSlot, LoadReport, RosterConfig, RosterStore, Student, StudentId, StudentRecord};
use serde::Serialize;
use tracing::{debug, info};

/// Shared password for the configuration panel.
///
/// A plain literal: anyone with the binary can read it. Not a security boundary.
pub const CONFIG_PASSWORD: &str = "plurall";

/// What the view should currently show.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub student_list_visible: bool,
    pub message_visible: bool,
    pub actions_visible: bool,
    pub config_unlocked: bool,
}

/// Application state for one operator.
pub struct Session {
    store: RosterStore,
    dispatcher: Dispatcher,
    selected_class: Option<String>,
    selected_student: Option<StudentId>,
    view: ViewState,
}

impl Session {
    pub fn new(store: RosterStore, dispatcher: Dispatcher) -> Self {
        Self {
            store,
            dispatcher,
            selected_class: None,
            selected_student: None,
            view: ViewState::default(),
        }
    }

    /// Startup: load the contact config, then the roster.
    ///
    /// On a load error the session stays usable with an empty roster.
    pub fn start(&mut self) -> Result<LoadReport, AppError> {
        self.store.load_config();
        let report = self.store.load()?;
        info!(students = report.students, origin = ?report.origin, "session started");
        Ok(report)
    }

    pub fn store(&self) -> &RosterStore {
        &self.store
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn selected_class(&self) -> Option<&str> {
        self.selected_class.as_deref()
    }

    pub fn selected_student(&self) -> Option<&Student> {
        self.selected_student
            .and_then(|id| self.store.roster().get(id))
    }

    /// Apply one event.
    pub fn handle(&mut self, event: UiEvent) -> Result<Outcome, AppError> {
        debug!(event = event.name(), "handling event");
        match event {
            UiEvent::ListClasses => Ok(Outcome::Classes {
                classes: self.store.roster().classes(),
            }),
            UiEvent::SelectClass { class_name } => Ok(self.select_class(class_name)),
            UiEvent::SelectStudent { id } => self.select_student(id),
            UiEvent::SendToContact { slot } => self.send_to_contact(slot),
            UiEvent::SendToPhone { phone } => self.send_to_phone(&phone),
            UiEvent::RequestInclusion {
                class_name,
                student_name,
                send_to_student,
                student_phone,
            } => self.request_inclusion(&class_name, &student_name, send_to_student, student_phone),
            UiEvent::Refresh => self.refresh(),
            UiEvent::UnlockConfig { password } => self.unlock_config(&password),
            UiEvent::LockConfig => {
                self.view.config_unlocked = false;
                Ok(Outcome::ConfigLocked)
            }
            UiEvent::UpdateConfig {
                primary_contact,
                secondary_contact,
            } => self.update_config(primary_contact, secondary_contact),
            UiEvent::AddStudent { record } => self.add_student(record),
            UiEvent::RemoveStudent { id } => self.remove_student(id),
        }
    }

    fn students_of(&self, class_name: &str) -> Vec<StudentSummary> {
        self.store
            .roster()
            .students_in(class_name)
            .into_iter()
            .map(StudentSummary::from)
            .collect()
    }

    fn clear_selection(&mut self) {
        self.selected_student = None;
        self.view.message_visible = false;
        self.view.actions_visible = false;
    }

    fn select_class(&mut self, class_name: String) -> Outcome {
        self.clear_selection();
        self.view.student_list_visible = true;

        let students = self.students_of(&class_name);
        self.selected_class = Some(class_name.clone());
        Outcome::ClassSelected {
            class_name,
            students,
        }
    }

    fn select_student(&mut self, id: StudentId) -> Result<Outcome, AppError> {
        let student = self
            .store
            .roster()
            .get(id)
            .cloned()
            .ok_or(AppError::UnknownStudent(id))?;

        // Only students of the listed class can be picked
        if self.selected_class.as_deref() != Some(student.record.class_name.as_str()) {
            return Err(AppError::StudentNotInClass(id));
        }

        let message = compose::compose_credentials_message(&student.record);
        let markup = compose::compose_display_markup(&message);

        self.selected_student = Some(id);
        self.view.message_visible = true;
        self.view.actions_visible = true;

        Ok(Outcome::StudentSelected {
            student,
            message,
            markup,
        })
    }

    fn selected_message(&self) -> Result<String, AppError> {
        let student = self.selected_student().ok_or(AppError::NoStudentSelected)?;
        Ok(compose::compose_credentials_message(&student.record))
    }

    fn send_to_contact(&mut self, slot: ContactSlot) -> Result<Outcome, AppError> {
        let message = self.selected_message()?;
        let phone = self.store.config().contact(slot);
        let link = self.dispatcher.send_message(phone, &message)?;
        Ok(Outcome::MessageSent { link })
    }

    fn send_to_phone(&mut self, phone: &str) -> Result<Outcome, AppError> {
        let message = self.selected_message()?;
        let digits = validate_adhoc_phone(phone)?;
        let link = self.dispatcher.send_message(&digits, &message)?;
        Ok(Outcome::MessageSent { link })
    }

    fn request_inclusion(
        &mut self,
        class_name: &str,
        student_name: &str,
        send_to_student: bool,
        student_phone: Option<String>,
    ) -> Result<Outcome, AppError> {
        if class_name.trim().is_empty() {
            return Err(AppError::MissingField("class_name"));
        }
        if student_name.trim().is_empty() {
            return Err(AppError::MissingField("student_name"));
        }

        let phone = if send_to_student {
            match student_phone.as_deref().map(str::trim) {
                Some(phone) if !phone.is_empty() => Some(phone),
                _ => return Err(AppError::MissingField("student_phone")),
            }
        } else {
            None
        };

        let message = compose::compose_missing_student_message(class_name, student_name, phone);
        let primary = self.store.config().contact(ContactSlot::Primary);
        let link = self.dispatcher.send_message(primary, &message)?;
        Ok(Outcome::MessageSent { link })
    }

    fn refresh(&mut self) -> Result<Outcome, AppError> {
        let report = self.store.refresh()?;

        // Ids were reassigned, so any selection is stale
        self.clear_selection();
        let students = self
            .selected_class
            .as_deref()
            .map(|class_name| self.students_of(class_name));

        Ok(Outcome::Refreshed { report, students })
    }

    fn unlock_config(&mut self, password: &str) -> Result<Outcome, AppError> {
        if password != CONFIG_PASSWORD {
            return Err(AppError::WrongPassword);
        }
        self.view.config_unlocked = true;
        Ok(Outcome::ConfigUnlocked {
            config: self.store.config().clone(),
        })
    }

    fn require_unlocked(&self) -> Result<(), AppError> {
        if self.view.config_unlocked {
            Ok(())
        } else {
            Err(AppError::ConfigLocked)
        }
    }

    fn update_config(
        &mut self,
        primary_contact: Option<String>,
        secondary_contact: Option<String>,
    ) -> Result<Outcome, AppError> {
        self.require_unlocked()?;

        let mut config: RosterConfig = self.store.config().clone();
        if let Some(primary) = primary_contact {
            config.primary_contact = primary;
        }
        if let Some(secondary) = secondary_contact {
            config.secondary_contact = secondary;
        }

        self.store.save_config(config.clone())?;
        Ok(Outcome::ConfigSaved { config })
    }

    fn add_student(&mut self, record: StudentRecord) -> Result<Outcome, AppError> {
        self.require_unlocked()?;
        if record.class_name.trim().is_empty() {
            return Err(AppError::MissingField("class_name"));
        }
        if record.name.trim().is_empty() {
            return Err(AppError::MissingField("name"));
        }

        let id = self.store.add_student(record)?;
        Ok(Outcome::StudentAdded { id })
    }

    fn remove_student(&mut self, id: StudentId) -> Result<Outcome, AppError> {
        self.require_unlocked()?;
        let record = self
            .store
            .remove_student(id)?
            .ok_or(AppError::UnknownStudent(id))?;

        if self.selected_student == Some(id) {
            self.clear_selection();
        }
        Ok(Outcome::StudentRemoved { record })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::launcher::RecordingLauncher;
    use crate::error::{DispatchError, RosterError};
    use crate::source::StaticSource;
    use crate::storage::MemoryStorage;
    use std::rc::Rc;

    const CSV: &str = "\
5º Ano,Maria Souza,maria.s,m123
5º Ano,Ana Lima,ana.l,a123
7º Ano,João Pedro,joao.p,j123
";

    struct Harness {
        session: Session,
        source: Rc<StaticSource>,
        launcher: Rc<RecordingLauncher>,
    }

    fn harness() -> Harness {
        let source = Rc::new(StaticSource::new(CSV));
        let launcher = Rc::new(RecordingLauncher::new());
        let store = RosterStore::new(Box::new(MemoryStorage::new()), Box::new(source.clone()));
        let mut session = Session::new(store, Dispatcher::new(Box::new(launcher.clone())));
        session.start().unwrap();
        Harness {
            session,
            source,
            launcher,
        }
    }

    fn select(session: &mut Session, class_name: &str, name: &str) -> StudentId {
        let id = session
            .store()
            .roster()
            .find_in_class(class_name, name)
            .map(|s| s.id)
            .unwrap();
        session.handle(UiEvent::SelectClass { class_name: class_name.to_string() }).unwrap();
        session.handle(UiEvent::SelectStudent { id }).unwrap();
        id
    }

    #[test]
    fn test_select_class_lists_sorted_students() {
        let mut h = harness();
        let outcome = h
            .session
            .handle(UiEvent::SelectClass { class_name: "5º Ano".into() })
            .unwrap();

        match outcome {
            Outcome::ClassSelected { students, .. } => {
                let names: Vec<&str> = students.iter().map(|s| s.name.as_str()).collect();
                assert_eq!(names, vec!["Ana Lima", "Maria Souza"]);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert!(h.session.view().student_list_visible);
        assert!(!h.session.view().message_visible);
    }

    #[test]
    fn test_select_student_shows_message() {
        let mut h = harness();
        h.session.handle(UiEvent::SelectClass { class_name: "5º Ano".into() }).unwrap();
        let outcome = h.session.handle(UiEvent::SelectStudent { id: StudentId(1) }).unwrap();

        match outcome {
            Outcome::StudentSelected { student, message, markup } => {
                assert_eq!(student.record.name, "Ana Lima");
                assert!(message.contains("*Usuário:* ana.l"));
                assert!(markup.contains("<strong>Ana Lima</strong>"));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert!(h.session.view().message_visible);
        assert!(h.session.view().actions_visible);
    }

    #[test]
    fn test_switching_class_clears_selection() {
        let mut h = harness();
        select(&mut h.session, "5º Ano", "Maria Souza");
        assert!(h.session.selected_student().is_some());

        h.session.handle(UiEvent::SelectClass { class_name: "7º Ano".into() }).unwrap();

        assert!(h.session.selected_student().is_none());
        assert!(!h.session.view().message_visible);
        assert!(!h.session.view().actions_visible);
        assert_eq!(h.session.selected_class(), Some("7º Ano"));
    }

    #[test]
    fn test_select_unknown_student() {
        let mut h = harness();
        let err = h.session.handle(UiEvent::SelectStudent { id: StudentId(42) }).unwrap_err();
        assert!(matches!(err, AppError::UnknownStudent(StudentId(42))));
    }

    #[test]
    fn test_select_student_outside_listed_class() {
        let mut h = harness();
        // João Pedro (id 2) is in 7º Ano
        let err = h.session.handle(UiEvent::SelectStudent { id: StudentId(2) }).unwrap_err();
        assert!(matches!(err, AppError::StudentNotInClass(StudentId(2))));

        h.session.handle(UiEvent::SelectClass { class_name: "5º Ano".into() }).unwrap();
        let err = h.session.handle(UiEvent::SelectStudent { id: StudentId(2) }).unwrap_err();

        assert_eq!(err.code(), "STUDENT_NOT_IN_CLASS");
        assert!(h.session.selected_student().is_none());
        assert!(!h.session.view().message_visible);
    }

    #[test]
    fn test_send_requires_selection() {
        let mut h = harness();
        let err = h
            .session
            .handle(UiEvent::SendToContact { slot: ContactSlot::Primary })
            .unwrap_err();
        assert!(matches!(err, AppError::NoStudentSelected));
        assert!(h.launcher.opened().is_empty());
    }

    #[test]
    fn test_send_to_primary_contact() {
        let mut h = harness();
        select(&mut h.session, "7º Ano", "João");

        let outcome = h
            .session
            .handle(UiEvent::SendToContact { slot: ContactSlot::Primary })
            .unwrap();

        let opened = h.launcher.opened();
        assert_eq!(opened.len(), 1);
        assert!(opened[0].starts_with("https://wa.me/5566992331535?text="));
        assert!(opened[0].contains("joao.p"));
        assert!(matches!(outcome, Outcome::MessageSent { .. }));
    }

    #[test]
    fn test_send_to_unset_contact() {
        let mut h = harness();
        h.session.handle(UiEvent::UnlockConfig { password: CONFIG_PASSWORD.into() }).unwrap();
        h.session
            .handle(UiEvent::UpdateConfig {
                primary_contact: None,
                secondary_contact: Some(String::new()),
            })
            .unwrap();
        select(&mut h.session, "5º Ano", "Ana Lima");

        let err = h
            .session
            .handle(UiEvent::SendToContact { slot: ContactSlot::Secondary })
            .unwrap_err();

        assert!(matches!(err, AppError::Dispatch(DispatchError::MissingConfiguredContact)));
        assert!(h.launcher.opened().is_empty());
    }

    #[test]
    fn test_send_to_adhoc_phone() {
        let mut h = harness();
        select(&mut h.session, "5º Ano", "Ana Lima");

        let err = h
            .session
            .handle(UiEvent::SendToPhone { phone: "9999-9999".into() })
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_PHONE");

        h.session
            .handle(UiEvent::SendToPhone { phone: "(66) 98888-7777".into() })
            .unwrap();
        assert!(h.launcher.opened()[0].starts_with("https://wa.me/5566988887777?text="));
    }

    #[test]
    fn test_request_inclusion_goes_to_primary() {
        let mut h = harness();
        h.session
            .handle(UiEvent::RequestInclusion {
                class_name: "4º Ano".into(),
                student_name: "Caio".into(),
                send_to_student: true,
                student_phone: Some("66 97777-6666".into()),
            })
            .unwrap();

        let opened = h.launcher.opened();
        assert!(opened[0].starts_with("https://wa.me/5566992331535?text="));
        assert!(opened[0].contains(&*urlencoding::encode("*66 97777-6666*")));
    }

    #[test]
    fn test_request_inclusion_validation() {
        let mut h = harness();
        let missing_name = h.session.handle(UiEvent::RequestInclusion {
            class_name: "4º Ano".into(),
            student_name: " ".into(),
            send_to_student: false,
            student_phone: None,
        });
        assert!(matches!(missing_name, Err(AppError::MissingField("student_name"))));

        let missing_phone = h.session.handle(UiEvent::RequestInclusion {
            class_name: "4º Ano".into(),
            student_name: "Caio".into(),
            send_to_student: true,
            student_phone: Some(String::new()),
        });
        assert!(matches!(missing_phone, Err(AppError::MissingField("student_phone"))));
        assert!(h.launcher.opened().is_empty());
    }

    #[test]
    fn test_refresh_rerenders_and_clears_selection() {
        let mut h = harness();
        select(&mut h.session, "5º Ano", "Ana Lima");

        h.source.set("5º Ano,Zeca,z,p\n5º Ano,Bia,b,p\n");
        let outcome = h.session.handle(UiEvent::Refresh).unwrap();

        match outcome {
            Outcome::Refreshed { report, students } => {
                assert_eq!(report.students, 2);
                let names: Vec<String> = students.unwrap().into_iter().map(|s| s.name).collect();
                assert_eq!(names, vec!["Bia", "Zeca"]);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert!(h.session.selected_student().is_none());
        assert!(!h.session.view().message_visible);
    }

    #[test]
    fn test_empty_refresh_keeps_state() {
        let mut h = harness();
        let id = select(&mut h.session, "5º Ano", "Ana Lima");
        let before = h.session.store().roster().clone();

        h.source.set("");
        let err = h.session.handle(UiEvent::Refresh).unwrap_err();

        assert!(matches!(err, AppError::Roster(RosterError::EmptyOrInvalidData(_))));
        assert_eq!(h.session.store().roster(), &before);
        assert_eq!(h.session.selected_student().map(|s| s.id), Some(id));
    }

    #[test]
    fn test_config_panel_gate() {
        let mut h = harness();
        let locked = h.session.handle(UiEvent::UpdateConfig {
            primary_contact: Some("1".into()),
            secondary_contact: None,
        });
        assert!(matches!(locked, Err(AppError::ConfigLocked)));

        let wrong = h.session.handle(UiEvent::UnlockConfig { password: "nope".into() });
        assert!(matches!(wrong, Err(AppError::WrongPassword)));
        assert!(!h.session.view().config_unlocked);

        h.session.handle(UiEvent::UnlockConfig { password: CONFIG_PASSWORD.into() }).unwrap();
        let saved = h
            .session
            .handle(UiEvent::UpdateConfig {
                primary_contact: Some("66 3333-4444".into()),
                secondary_contact: None,
            })
            .unwrap();
        match saved {
            Outcome::ConfigSaved { config } => {
                assert_eq!(config.primary_contact, "66 3333-4444");
                assert_eq!(config.secondary_contact, crate::roster::config::DEFAULT_SECONDARY_CONTACT);
            }
            other => panic!("unexpected outcome {:?}", other),
        }

        h.session.handle(UiEvent::LockConfig).unwrap();
        assert!(!h.session.view().config_unlocked);
    }

    #[test]
    fn test_add_and_remove_student() {
        let mut h = harness();
        h.session.handle(UiEvent::UnlockConfig { password: CONFIG_PASSWORD.into() }).unwrap();

        let added = h
            .session
            .handle(UiEvent::AddStudent {
                record: StudentRecord::new("5º Ano", "Caio", "caio.c", "c1"),
            })
            .unwrap();
        let id = match added {
            Outcome::StudentAdded { id } => id,
            other => panic!("unexpected outcome {:?}", other),
        };

        select(&mut h.session, "5º Ano", "Caio");
        h.session.handle(UiEvent::RemoveStudent { id }).unwrap();

        assert!(h.session.store().roster().get(id).is_none());
        assert!(h.session.selected_student().is_none());
        assert!(!h.session.view().actions_visible);

        let again = h.session.handle(UiEvent::RemoveStudent { id });
        assert!(matches!(again, Err(AppError::UnknownStudent(_))));
    }
}
