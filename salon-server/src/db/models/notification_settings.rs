//! Notification Settings Model (singleton)

use super::{serde_helpers, serde_thing};
use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;

/// Reminder configuration (singleton document)
///
/// `lead_time` is the `HH:MM` form the settings screen edits;
/// `lead_minutes` is the same value in minutes and is what the reminder
/// scheduler reads. The server recomputes `lead_minutes` whenever
/// `lead_time` changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationSettings {
    #[serde(
        default,
        with = "serde_thing::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<Thing>,
    pub lead_time: String,
    pub lead_minutes: i64,
    #[serde(default = "default_true", deserialize_with = "serde_helpers::bool_true")]
    pub is_active: bool,
    #[serde(default)]
    pub updated_at: i64,
}

fn default_true() -> bool {
    true
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            id: None,
            lead_time: "01:00".to_string(),
            lead_minutes: 60,
            is_active: true,
            updated_at: 0,
        }
    }
}

/// Update payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationSettingsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_minutes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
