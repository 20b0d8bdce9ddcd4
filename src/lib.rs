//! plurall-access library
//!
//! Roster lookup for Plurall portal credentials: CSV roster cache,
//! message templates, and WhatsApp deep-link dispatch, driven through
//! an explicit `Session`.
//!
//! CHANGELOG:
//! - 10/14/2026 - Initial library structure

pub mod commands;
pub mod compose;
pub mod dispatch;
pub mod error;
pub mod output;
pub mod roster;
pub mod session;
pub mod settings;
pub mod source;
pub mod storage;
