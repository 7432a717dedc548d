//! Appointment Model

use super::{serde_helpers, serde_thing};
use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;

/// Appointment status
///
/// New appointments start as `AWAITING_CONFIRMATION`; staff may set any
/// status afterwards (no transition graph is enforced). Cancelled and
/// no-show appointments release their time slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    AwaitingConfirmation,
    Confirmed,
    Completed,
    NoShow,
    Cancelled,
}

impl Default for AppointmentStatus {
    fn default() -> Self {
        Self::AwaitingConfirmation
    }
}

impl AppointmentStatus {
    /// Whether an appointment in this status still occupies its time slot
    pub fn blocks_slot(&self) -> bool {
        !matches!(self, Self::Cancelled | Self::NoShow)
    }

    /// Whether this status counts toward booked revenue
    pub fn counts_revenue(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Completed)
    }
}

/// Appointment entity
///
/// `end_time` is always derived from `start_time + service.duration_minutes`
/// when the record is written, never taken from client input. The
/// `*_minutes` fields are the same instants as minutes since midnight and
/// exist for the overlap queries and ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(
        default,
        with = "serde_thing::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<Thing>,
    /// Booked client
    #[serde(with = "serde_thing")]
    pub client: Thing,
    /// Client name snapshot for list rendering
    pub client_name: String,
    /// Booked service
    #[serde(with = "serde_thing")]
    pub service: Thing,
    /// Service name snapshot for list rendering
    pub service_name: String,
    /// Calendar date (`YYYY-MM-DD`)
    pub date: String,
    /// Start of the slot (`HH:MM`)
    pub start_time: String,
    /// End of the slot (`HH:MM`), derived
    pub end_time: String,
    /// Start as minutes since midnight
    pub start_minutes: i64,
    /// End as minutes since midnight
    pub end_minutes: i64,
    /// Price snapshot of the service at booking time; later price changes
    /// do not touch existing appointments
    pub price: f64,
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(default)]
    pub note: Option<String>,
    /// Created timestamp (milliseconds since epoch), immutable
    #[serde(default)]
    pub created_at: i64,
    /// Set once the reminder scheduler has fired for this appointment
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub reminded: bool,
}

/// Create appointment payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentCreate {
    /// Client id (`client:xxx`)
    pub client: String,
    /// Service id (`service:xxx`)
    pub service: String,
    pub date: String,
    pub start_time: String,
    pub note: Option<String>,
}

/// Full-edit appointment payload; the request is revalidated against the
/// schedule with the appointment itself excluded from the overlap scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Status-only update payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentStatusUpdate {
    pub status: AppointmentStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serde_names() {
        assert_eq!(
            serde_json::to_string(&AppointmentStatus::AwaitingConfirmation).unwrap(),
            "\"AWAITING_CONFIRMATION\""
        );
        assert_eq!(
            serde_json::to_string(&AppointmentStatus::NoShow).unwrap(),
            "\"NO_SHOW\""
        );
    }

    #[test]
    fn test_blocks_slot() {
        assert!(AppointmentStatus::AwaitingConfirmation.blocks_slot());
        assert!(AppointmentStatus::Confirmed.blocks_slot());
        assert!(AppointmentStatus::Completed.blocks_slot());
        assert!(!AppointmentStatus::Cancelled.blocks_slot());
        assert!(!AppointmentStatus::NoShow.blocks_slot());
    }

    #[test]
    fn test_counts_revenue() {
        assert!(AppointmentStatus::Confirmed.counts_revenue());
        assert!(AppointmentStatus::Completed.counts_revenue());
        assert!(!AppointmentStatus::AwaitingConfirmation.counts_revenue());
        assert!(!AppointmentStatus::Cancelled.counts_revenue());
    }
}
