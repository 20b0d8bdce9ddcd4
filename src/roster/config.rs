//! Recipient contact configuration.

use serde::{Deserialize, Serialize};

/// Built-in primary contact number.
pub const DEFAULT_PRIMARY_CONTACT: &str = "5566992331535";

/// Built-in secondary contact number.
pub const DEFAULT_SECONDARY_CONTACT: &str = "5566996622907";

/// The two fixed recipients. Reads the legacy `rodrigo`/`socorro` keys too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterConfig {
    #[serde(alias = "rodrigo", default)]
    pub primary_contact: String,
    #[serde(alias = "socorro", default)]
    pub secondary_contact: String,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            primary_contact: DEFAULT_PRIMARY_CONTACT.to_string(),
            secondary_contact: DEFAULT_SECONDARY_CONTACT.to_string(),
        }
    }
}

/// Which configured contact to address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactSlot {
    Primary,
    Secondary,
}

impl RosterConfig {
    pub fn contact(&self, slot: ContactSlot) -> &str {
        match slot {
            ContactSlot::Primary => &self.primary_contact,
            ContactSlot::Secondary => &self.secondary_contact,
        }
    }
}
