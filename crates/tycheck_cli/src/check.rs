//! `tycheck check` — apply one edit batch and report.

use std::io::Read;
use std::path::Path;

use tycheck_overlay::RawEdit;
use tycheck_session::Session;

use crate::request::parse_edits;
use crate::{CheckArgs, GlobalArgs, ReportFormat};

/// Edits applied by default when `--edits` is not given.
const DEFAULT_EDITS_FILE: &str = "overrides.json";

/// Runs the `tycheck check` command.
///
/// Returns exit code 0 if no errors remain, 1 if diagnostics were reported.
pub fn run(args: &CheckArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let edits = load_edits(args.edits.as_deref(), &global.root)?;
    tracing::debug!(edits = edits.len(), root = %global.root.display(), "checking project");

    let mut session = Session::new(&global.root);
    let report = session.check(&edits)?;

    match args.format {
        ReportFormat::Json => println!("{}", serde_json::to_string(&report)?),
        ReportFormat::Text => match &report.diagnostics {
            Some(text) => print!("{text}"),
            None if !global.quiet => eprintln!("No errors found."),
            None => {}
        },
    }
    Ok(if report.is_clean() { 0 } else { 1 })
}

/// Reads the batch from `source` (`-` for stdin), or from `overrides.json`
/// in the project root if it exists.
fn load_edits(source: Option<&str>, root: &Path) -> Result<Vec<RawEdit>, Box<dyn std::error::Error>> {
    let text = match source {
        Some("-") => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            text
        }
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read edits from {path}: {e}"))?,
        None => {
            let default = root.join(DEFAULT_EDITS_FILE);
            if !default.is_file() {
                return Ok(Vec::new());
            }
            std::fs::read_to_string(&default)?
        }
    };
    Ok(parse_edits(&text)?)
}
