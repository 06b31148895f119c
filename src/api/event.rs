//! Event records as returned by the API

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// Field carrying the event identifier
pub const EVENT_ID_FIELD: &str = "event_id";

/// Opaque event object. Kept as raw JSON so the output file holds
/// exactly what the API returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Event(pub Value);

impl Event {
    /// Identifier value, if present
    pub fn id(&self) -> Option<&Value> {
        self.0.get(EVENT_ID_FIELD)
    }
}

impl From<Value> for Event {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Number of distinct identifiers across `events`.
/// Records without an identifier all count as one missing value.
pub fn unique_event_ids(events: &[Event]) -> usize {
    events
        .iter()
        .map(|e| e.id().map(Value::to_string))
        .collect::<HashSet<Option<String>>>()
        .len()
}
