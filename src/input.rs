//! JSON Lines event input
//!
//! One [`EventRecord`] per line; blank lines are skipped. Validation
//! failures keep their own error kind and gain the offending line number.

use crate::error::{ErrorCode, ProcMinerError, Result};
use crate::model::{Event, EventRecord};
use std::path::Path;
use tracing::debug;

/// Parse every non-blank line of `content` into a validated event
pub fn parse_events(content: &str) -> Result<Vec<Event>> {
    let mut events = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }

        let record: EventRecord = serde_json::from_str(line).map_err(|e| {
            ProcMinerError::input_with_code(
                ErrorCode::INPUT_MALFORMED_RECORD,
                format!("malformed event record: {}", e),
                Some(line_no),
            )
            .with_source(e)
        })?;
        let event = Event::try_from(record)
            .map_err(|e| e.with_context(format!("line {}", line_no)))?;
        events.push(event);
    }
    Ok(events)
}

/// Read and parse an event file
pub async fn read_events(path: &Path) -> Result<Vec<Event>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ProcMinerError::from(e).with_context(path.display()))?;
    let events = parse_events(&content)?;
    debug!("Read {} events from {}", events.len(), path.display());
    Ok(events)
}
