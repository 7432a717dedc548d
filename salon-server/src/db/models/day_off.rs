//! Day-Off Model (singleton calendar)

use super::{serde_helpers, serde_thing};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use surrealdb::sql::Thing;

/// One date-keyed closure entry
///
/// Presence with `active = true` blocks all bookings on that date,
/// regardless of the weekly schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayOffEntry {
    /// Calendar date (`YYYY-MM-DD`), same value as the map key
    pub date: String,
    #[serde(default = "default_true", deserialize_with = "serde_helpers::bool_true")]
    pub active: bool,
    pub reason: String,
}

fn default_true() -> bool {
    true
}

/// Day-off calendar (singleton document): date string → entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayOffCalendar {
    #[serde(
        default,
        with = "serde_thing::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<Thing>,
    #[serde(default)]
    pub entries: BTreeMap<String, DayOffEntry>,
    #[serde(default)]
    pub updated_at: i64,
}

/// Create day-off payload; new entries start active
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayOffCreate {
    pub date: String,
    pub reason: String,
}
