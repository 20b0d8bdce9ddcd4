//! NDJSON protocol for the interactive session loop.
//!
//! One request per line in, one response per line out:
//!
//! ```json
//! {"id": "1", "event": {"type": "select_class", "class_name": "5º Ano"}}
//! {"id": "1", "ok": true, "result": {...}, "error": null, "view": {...}, "meta": {...}}
//! ```
//!
//! CHANGELOG:
//! - 10/15/2026 - Initial implementation

use super::{Outcome, UiEvent, ViewState};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Protocol version reported in every response.
pub const PROTOCOL_VERSION: u8 = 1;

/// NDJSON request from the view.
#[derive(Debug, Serialize, Deserialize)]
pub struct Request {
    /// Caller-chosen id, echoed back
    #[serde(default)]
    pub id: String,
    pub event: UiEvent,
}

/// NDJSON response to the view.
#[derive(Debug, Serialize)]
pub struct Response {
    pub id: String,
    pub ok: bool,
    pub result: Option<Outcome>,
    pub error: Option<ErrorInfo>,
    /// View state after the event was applied
    pub view: ViewState,
    pub meta: ResponseMeta,
}

/// Error details in response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Error code (e.g., "INVALID_PHONE", "INVALID_JSON")
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

/// Response metadata.
#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    /// Handling time in milliseconds
    pub server_ms: f64,
    pub protocol_v: u8,
}

impl Request {
    /// Parse request from NDJSON line.
    pub fn from_ndjson_line(line: &str) -> Result<Self> {
        serde_json::from_str(line).context("Failed to parse request JSON")
    }
}

impl Response {
    pub fn success(id: String, result: Outcome, view: ViewState, server_ms: f64) -> Self {
        Self {
            id,
            ok: true,
            result: Some(result),
            error: None,
            view,
            meta: ResponseMeta {
                server_ms,
                protocol_v: PROTOCOL_VERSION,
            },
        }
    }

    pub fn error(id: String, code: &str, message: String, view: ViewState, server_ms: f64) -> Self {
        Self {
            id,
            ok: false,
            result: None,
            error: Some(ErrorInfo {
                code: code.to_string(),
                message,
            }),
            view,
            meta: ResponseMeta {
                server_ms,
                protocol_v: PROTOCOL_VERSION,
            },
        }
    }

    /// Serialize response to NDJSON line.
    pub fn to_ndjson_line(&self) -> Result<String> {
        let json = serde_json::to_string(self)?;
        Ok(format!("{}\n", json))
    }
}
