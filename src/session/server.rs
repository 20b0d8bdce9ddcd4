//! Line-oriented session server.
//!
//! Reads NDJSON requests from a reader (stdin for the `session` command),
//! applies them to the session in order, and writes one response per line.
//!
//! Before the first request, `start` writes one unsolicited line with id
//! `startup`: a `loaded` result, or the load error (e.g. `LOAD_ERROR`) so the
//! view can tell a missing roster from an empty one.
//!
//! CHANGELOG:
//! - 10/17/2026 - Startup line reports the initial roster load
//! - 10/15/2026 - Initial implementation

use anyhow::Result;
use std::io::{BufRead, Write};
use std::time::Instant;
use tracing::{debug, info, warn};

use super::protocol::{Request, Response};
use super::{Outcome, Session};

/// Request id of the unsolicited startup line.
pub const STARTUP_ID: &str = "startup";

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Drives a `Session` from a stream of NDJSON requests.
pub struct SessionServer {
    session: Session,
}

impl SessionServer {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Load config and roster, then report the result on `writer`.
    ///
    /// A load failure is reported, not returned: the loop still serves so
    /// the view can offer a refresh.
    pub fn start<W: Write>(&mut self, mut writer: W) -> Result<()> {
        let start = Instant::now();
        let response = match self.session.start() {
            Ok(report) => {
                info!(students = report.students, "session ready");
                Response::success(
                    STARTUP_ID.to_string(),
                    Outcome::Loaded { report },
                    self.session.view().clone(),
                    elapsed_ms(start),
                )
            }
            Err(e) => {
                warn!(error = %e, code = e.code(), "session started without roster");
                Response::error(
                    STARTUP_ID.to_string(),
                    e.code(),
                    e.to_string(),
                    self.session.view().clone(),
                    elapsed_ms(start),
                )
            }
        };

        writer.write_all(response.to_ndjson_line()?.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Serve until the reader hits EOF. Requests are handled sequentially.
    pub fn serve<R: BufRead, W: Write>(&mut self, reader: R, mut writer: W) -> Result<()> {
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let response = self.handle_line(&line);
            writer.write_all(response.to_ndjson_line()?.as_bytes())?;
            writer.flush()?;
        }

        debug!("session input closed");
        Ok(())
    }

    /// Handle one request line.
    fn handle_line(&mut self, line: &str) -> Response {
        let start = Instant::now();

        let request = match Request::from_ndjson_line(line) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "rejected request line");
                return Response::error(
                    String::new(),
                    "INVALID_JSON",
                    format!("{:#}", e),
                    self.session.view().clone(),
                    elapsed_ms(start),
                );
            }
        };

        match self.session.handle(request.event) {
            Ok(outcome) => Response::success(
                request.id,
                outcome,
                self.session.view().clone(),
                elapsed_ms(start),
            ),
            Err(e) => Response::error(
                request.id,
                e.code(),
                e.to_string(),
                self.session.view().clone(),
                elapsed_ms(start),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::launcher::RecordingLauncher;
    use crate::dispatch::Dispatcher;
    use crate::roster::RosterStore;
    use crate::source::StaticSource;
    use crate::storage::MemoryStorage;
    use serde_json::Value;
    use std::rc::Rc;

    fn server() -> (SessionServer, Rc<RecordingLauncher>) {
        let launcher = Rc::new(RecordingLauncher::new());
        let store = RosterStore::new(
            Box::new(MemoryStorage::new()),
            Box::new(StaticSource::new("5º Ano,Ana Lima,ana.l,a1\n5º Ano,Bruno,bruno.b,b1\n")),
        );
        let mut session = Session::new(store, Dispatcher::new(Box::new(launcher.clone())));
        session.start().unwrap();
        (SessionServer::new(session), launcher)
    }

    fn run(server: &mut SessionServer, input: &str) -> Vec<Value> {
        let mut out = Vec::new();
        server.serve(input.as_bytes(), &mut out).unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_select_and_send_flow() {
        let (mut server, launcher) = server();
        let input = concat!(
            r#"{"id":"1","event":{"type":"select_class","class_name":"5º Ano"}}"#, "\n",
            "\n",
            r#"{"id":"2","event":{"type":"select_student","id":1}}"#, "\n",
            r#"{"id":"3","event":{"type":"send_to_phone","phone":"(66) 99999-9999"}}"#, "\n",
        );

        let responses = run(&mut server, input);

        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0]["result"]["students"][0]["name"], "Ana Lima");
        assert_eq!(responses[1]["result"]["student"]["login"], "bruno.b");
        assert_eq!(responses[1]["view"]["message_visible"], true);
        assert_eq!(responses[2]["ok"], true);
        assert_eq!(responses[2]["result"]["link"]["phone"], "5566999999999");
        assert_eq!(launcher.opened().len(), 1);
    }

    fn unstarted(source: StaticSource) -> SessionServer {
        let store = RosterStore::new(Box::new(MemoryStorage::new()), Box::new(source));
        let launcher = Box::new(RecordingLauncher::new());
        SessionServer::new(Session::new(store, Dispatcher::new(launcher)))
    }

    fn startup_line(server: &mut SessionServer) -> Value {
        let mut out = Vec::new();
        server.start(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);
        serde_json::from_str(text.trim_end()).unwrap()
    }

    #[test]
    fn test_startup_reports_load_error() {
        let mut server = unstarted(StaticSource::failing("HTTP 404"));

        let line = startup_line(&mut server);

        assert_eq!(line["id"], STARTUP_ID);
        assert_eq!(line["ok"], false);
        assert_eq!(line["error"]["code"], "LOAD_ERROR");
        assert!(line["error"]["message"].as_str().unwrap().contains("HTTP 404"));

        // Still serving after the failed load
        let responses = run(&mut server, "{\"id\":\"1\",\"event\":{\"type\":\"select_class\",\"class_name\":\"5º Ano\"}}\n");
        assert_eq!(responses[0]["ok"], true);
        assert_eq!(responses[0]["result"]["students"], serde_json::json!([]));
    }

    #[test]
    fn test_startup_reports_loaded_roster() {
        let mut server = unstarted(StaticSource::new("5º Ano,Ana Lima,ana.l,a1\n,x,y,z\n"));

        let line = startup_line(&mut server);

        assert_eq!(line["ok"], true);
        assert_eq!(line["result"]["type"], "loaded");
        assert_eq!(line["result"]["report"]["students"], 1);
        assert_eq!(line["result"]["report"]["skipped_rows"], 1);
        assert_eq!(line["result"]["report"]["origin"], "source");
    }

    #[test]
    fn test_errors_keep_serving() {
        let (mut server, _launcher) = server();
        let input = concat!(
            "not json\n",
            r#"{"id":"a","event":{"type":"send_to_contact","slot":"primary"}}"#, "\n",
            r#"{"id":"b","event":{"type":"list_classes"}}"#, "\n",
        );

        let responses = run(&mut server, input);

        assert_eq!(responses[0]["error"]["code"], "INVALID_JSON");
        assert_eq!(responses[1]["id"], "a");
        assert_eq!(responses[1]["error"]["code"], "NO_STUDENT_SELECTED");
        assert_eq!(responses[2]["ok"], true);
        assert_eq!(responses[2]["result"]["classes"][0], "3º Ano A");
    }
}
