//! `tycheck serve` — a line-oriented request loop over stdio.
//!
//! Every non-empty stdin line is one edit batch; every batch gets exactly one
//! JSON line on stdout. All requests share one session, so the overlay and
//! the checker's caches carry over from request to request.

use std::io::{BufRead, Write};

use serde::Serialize;
use tycheck_session::SharedSession;

use crate::request::parse_edits;
use crate::GlobalArgs;

/// One response line.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Response {
    /// Whether the batch was checked.
    pub success: bool,
    /// Rendered diagnostics; absent when clean or on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<String>,
    /// Failure description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Response {
    fn failed(message: impl ToString) -> Self {
        Self {
            success: false,
            diagnostics: None,
            message: Some(message.to_string()),
        }
    }
}

/// Runs the `tycheck serve` command until stdin closes.
pub fn run(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let session = SharedSession::open(&global.root);
    tracing::info!(root = %global.root.display(), "serving edit batches on stdin");

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let response = handle_line(&session, &line);
        writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
        stdout.flush()?;
    }
    Ok(0)
}

/// Checks one request line.
pub fn handle_line(session: &SharedSession, line: &str) -> Response {
    let edits = match parse_edits(line) {
        Ok(edits) => edits,
        Err(e) => return Response::failed(format!("invalid request: {e}")),
    };
    match session.check(&edits) {
        Ok(report) => Response {
            success: true,
            diagnostics: report.diagnostics,
            message: None,
        },
        Err(e) => {
            tracing::warn!(error = %e, "check failed");
            Response::failed(e)
        }
    }
}
