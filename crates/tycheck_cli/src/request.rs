//! Edit batches as they arrive on the wire.

use serde::Deserialize;
use tycheck_overlay::RawEdit;

/// Either a bare array of edits or an object wrapping them in `files`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EditRequest {
    Batch(Vec<RawEdit>),
    Envelope { files: Vec<RawEdit> },
}

/// Parses one JSON edit batch.
pub fn parse_edits(text: &str) -> Result<Vec<RawEdit>, serde_json::Error> {
    let request: EditRequest = serde_json::from_str(text)?;
    Ok(match request {
        EditRequest::Batch(edits) | EditRequest::Envelope { files: edits } => edits,
    })
}
