//! Roster model: records, CSV parsing, contact config and the cached store.
//!
//! CHANGELOG:
//! - 10/14/2026 - Initial module structure

pub mod config;
pub mod fuzzy;
pub mod parse;
pub mod record;
pub mod store;

pub use config::{ContactSlot, RosterConfig};
pub use parse::{parse_roster_csv, ParsedRoster};
pub use record::{Roster, Student, StudentId, StudentRecord, CLASS_ORDER};
pub use store::{LoadReport, RosterOrigin, RosterStore};
