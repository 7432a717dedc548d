//! Service Model

use super::{serde_helpers, serde_thing};
use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;

/// Service entity (a bookable treatment with a fixed duration and price)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    #[serde(
        default,
        with = "serde_thing::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<Thing>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Appointment length in minutes, always > 0
    pub duration_minutes: i64,
    /// Current list price; appointments snapshot it at booking time
    pub price: f64,
    /// Deactivated services are hidden from new bookings only
    #[serde(default = "default_true", deserialize_with = "serde_helpers::bool_true")]
    pub is_active: bool,
    /// Created timestamp (milliseconds since epoch)
    #[serde(default)]
    pub created_at: i64,
}

fn default_true() -> bool {
    true
}

/// Create service payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceCreate {
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: i64,
    pub price: f64,
}

/// Update service payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
