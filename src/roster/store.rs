//! Roster store - cached roster and contact config over on-device storage.
//!
//! CHANGELOG:
//! - 10/16/2026 - Add/remove students from the config panel
//! - 10/15/2026 - Refresh keeps the prior roster on empty or failed fetches
//! - 10/14/2026 - Initial implementation

use super::config::RosterConfig;
use super::parse::{parse_roster_csv, ParsedRoster};
use super::record::{Roster, StudentId, StudentRecord};
use crate::error::RosterError;
use crate::source::RosterSource;
use crate::storage::{get_json, set_json, Storage, CONFIG_KEY, ROSTER_KEY};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Where a loaded roster came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RosterOrigin {
    Cache,
    Source,
}

/// Summary of a successful load or refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub origin: RosterOrigin,
    pub students: usize,
    /// CSV rows dropped by the lenient row filter (always 0 for cache loads).
    pub skipped_rows: usize,
}

/// Holds the roster and contact config, persisting both through `Storage`.
pub struct RosterStore {
    storage: Box<dyn Storage>,
    source: Box<dyn RosterSource>,
    roster: Roster,
    config: RosterConfig,
}

impl RosterStore {
    /// Create a store with an empty roster and the default config.
    /// Call `load_config` and `load` to populate it.
    pub fn new(storage: Box<dyn Storage>, source: Box<dyn RosterSource>) -> Self {
        Self {
            storage,
            source,
            roster: Roster::default(),
            config: RosterConfig::default(),
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn config(&self) -> &RosterConfig {
        &self.config
    }

    pub fn source_name(&self) -> String {
        self.source.describe()
    }

    /// Load the roster: cached copy first, CSV source otherwise.
    ///
    /// A corrupt cache is logged and ignored. On fetch/parse failure the
    /// current roster is left untouched.
    pub fn load(&mut self) -> Result<LoadReport, RosterError> {
        match get_json::<Vec<StudentRecord>>(self.storage.as_ref(), ROSTER_KEY) {
            Ok(Some(records)) => {
                info!(students = records.len(), "roster loaded from cache");
                self.roster = Roster::from_records(records);
                return Ok(LoadReport {
                    origin: RosterOrigin::Cache,
                    students: self.roster.len(),
                    skipped_rows: 0,
                });
            }
            Ok(None) => debug!("no cached roster, reading source"),
            Err(e) => warn!(error = %e, "cached roster unreadable, reading source"),
        }

        let parsed = self.fetch_and_parse(false)?;
        self.replace(parsed)
    }

    /// Re-fetch the CSV bypassing caches and replace the roster if it has rows.
    pub fn refresh(&mut self) -> Result<LoadReport, RosterError> {
        let parsed = self.fetch_and_parse(true)?;

        if parsed.records.is_empty() {
            warn!(source = %self.source.describe(), skipped = parsed.skipped, "refresh yielded no rows, keeping current roster");
            return Err(RosterError::EmptyOrInvalidData(self.source.describe()));
        }

        self.replace(parsed)
    }

    /// Read the persisted config, falling back to the built-in default.
    pub fn load_config(&mut self) -> &RosterConfig {
        self.config = match get_json::<RosterConfig>(self.storage.as_ref(), CONFIG_KEY) {
            Ok(Some(config)) => config,
            Ok(None) => RosterConfig::default(),
            Err(e) => {
                warn!(error = %e, "stored config unreadable, using defaults");
                RosterConfig::default()
            }
        };
        &self.config
    }

    /// Persist the config immediately.
    pub fn save_config(&mut self, config: RosterConfig) -> Result<(), RosterError> {
        set_json(self.storage.as_ref(), CONFIG_KEY, &config)?;
        info!("contact config saved");
        self.config = config;
        Ok(())
    }

    /// Persist the full roster as a unit and make it current.
    pub fn save_roster(&mut self, records: Vec<StudentRecord>) -> Result<(), RosterError> {
        set_json(self.storage.as_ref(), ROSTER_KEY, &records)?;
        self.roster = Roster::from_records(records);
        Ok(())
    }

    /// Append one student and persist the roster.
    pub fn add_student(&mut self, record: StudentRecord) -> Result<StudentId, RosterError> {
        let mut roster = self.roster.clone();
        let id = roster.push(record);
        self.persist(roster)?;
        Ok(id)
    }

    /// Remove one student by id and persist the roster.
    pub fn remove_student(&mut self, id: StudentId) -> Result<Option<StudentRecord>, RosterError> {
        let mut roster = self.roster.clone();
        let removed = roster.remove(id);
        if removed.is_some() {
            self.persist(roster)?;
        }
        Ok(removed)
    }

    /// Write `roster` and swap it in, keeping ids stable.
    fn persist(&mut self, roster: Roster) -> Result<(), RosterError> {
        set_json(self.storage.as_ref(), ROSTER_KEY, &roster.records())?;
        self.roster = roster;
        Ok(())
    }

    fn fetch_and_parse(&self, bust_cache: bool) -> Result<ParsedRoster, RosterError> {
        let source_name = self.source.describe();

        let text = self
            .source
            .fetch(bust_cache)
            .map_err(|e| RosterError::LoadError {
                source_name: source_name.clone(),
                reason: format!("{:#}", e),
            })?;

        let parsed = parse_roster_csv(&text).map_err(|e| RosterError::LoadError {
            source_name: source_name.clone(),
            reason: e.to_string(),
        })?;

        if parsed.skipped > 0 {
            warn!(source = %source_name, skipped = parsed.skipped, "dropped malformed roster rows");
        }

        Ok(parsed)
    }

    fn replace(&mut self, parsed: ParsedRoster) -> Result<LoadReport, RosterError> {
        set_json(self.storage.as_ref(), ROSTER_KEY, &parsed.records)?;
        self.roster = Roster::from_records(parsed.records);

        info!(students = self.roster.len(), source = %self.source.describe(), "roster loaded from source");
        Ok(LoadReport {
            origin: RosterOrigin::Source,
            students: self.roster.len(),
            skipped_rows: parsed.skipped,
        })
    }
}
