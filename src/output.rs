//! Output formatting for CLI commands.
//!
//! CHANGELOG:
//! - 10/14/2026 - Initial implementation

use serde::Serialize;
use serde_json::json;

/// Output control settings from CLI flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputControls {
    pub json: bool,
    pub compact: bool,
}

impl OutputControls {
    /// Render data as JSON according to the controls.
    pub fn emit<T: Serialize>(&self, data: &T) -> String {
        let rendered = if self.compact {
            serde_json::to_string(data)
        } else {
            serde_json::to_string_pretty(data)
        };
        rendered.unwrap_or_else(|e| format_error(&e.to_string()))
    }

    /// Print data to stdout as JSON.
    pub fn print<T: Serialize>(&self, data: &T) {
        println!("{}", self.emit(data));
    }
}

/// Format error as JSON.
pub fn format_error(error: &str) -> String {
    json!({
        "error": error,
        "success": false
    })
    .to_string()
}
