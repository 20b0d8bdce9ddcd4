//! Dispatch: phone normalization and messaging deep links.
//!
//! CHANGELOG:
//! - 10/15/2026 - Launcher seam for dry runs and tests
//! - 10/14/2026 - Initial implementation

pub mod launcher;

use crate::error::DispatchError;
use launcher::Launcher;
use serde::Serialize;
use tracing::info;

/// Messaging host for deep links.
pub const MESSAGING_HOST: &str = "wa.me";

/// Country code prefixed to bare domestic numbers.
pub const COUNTRY_CODE: &str = "55";

/// Minimum digits for an ad-hoc number (area code + subscriber number).
pub const MIN_ADHOC_DIGITS: usize = 10;

fn digits_only(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Normalize a phone number for a deep link.
///
/// Strips non-digit characters. 10 or 11 digits (area code + landline or
/// mobile) get the country code prefixed; anything else is left as is.
pub fn normalize_phone(phone: &str) -> String {
    let digits = digits_only(phone);
    if digits.len() == 10 || digits.len() == 11 {
        format!("{}{}", COUNTRY_CODE, digits)
    } else {
        digits
    }
}

/// Check an operator-typed number and return its digits.
pub fn validate_adhoc_phone(phone: &str) -> Result<String, DispatchError> {
    let digits = digits_only(phone);
    if digits.len() < MIN_ADHOC_DIGITS {
        return Err(DispatchError::InvalidPhoneNumber(phone.to_string()));
    }
    Ok(digits)
}

/// `https://wa.me/<normalized>?text=<percent-encoded>`
pub fn deep_link(phone: &str, text: &str) -> String {
    format!(
        "https://{}/{}?text={}",
        MESSAGING_HOST,
        normalize_phone(phone),
        urlencoding::encode(text)
    )
}

/// A link that was handed to the launcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeepLink {
    pub phone: String,
    pub url: String,
}

/// Sends messages by opening deep links.
pub struct Dispatcher {
    launcher: Box<dyn Launcher>,
}

impl Dispatcher {
    pub fn new(launcher: Box<dyn Launcher>) -> Self {
        Self { launcher }
    }

    /// Open a deep link for `text` addressed to `phone`.
    ///
    /// Success means the link was opened, not that anything was delivered.
    pub fn send_message(&self, phone: &str, text: &str) -> Result<DeepLink, DispatchError> {
        if phone.trim().is_empty() {
            return Err(DispatchError::MissingConfiguredContact);
        }

        let link = DeepLink {
            phone: normalize_phone(phone),
            url: deep_link(phone, text),
        };
        self.launcher.open(&link.url)?;

        info!(phone = %link.phone, chars = text.chars().count(), "deep link opened");
        Ok(link)
    }
}
