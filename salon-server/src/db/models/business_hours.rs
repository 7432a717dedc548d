//! Business Hours Model (singleton)

use super::serde_thing;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use surrealdb::sql::Thing;

/// Weekday keys in document order; the configuration documents keep the
/// Portuguese day keys the mobile app writes.
pub const WEEKDAY_KEYS: [&str; 7] = [
    "segunda", "terca", "quarta", "quinta", "sexta", "sabado", "domingo",
];

/// Opening configuration for one weekday
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayHours {
    pub active: bool,
    /// Opening time (`HH:MM`)
    pub open: String,
    /// Closing time (`HH:MM`); must come after `open` when active
    pub close: String,
}

/// Weekly business hours (singleton document)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessHours {
    #[serde(
        default,
        with = "serde_thing::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<Thing>,
    /// Weekday key → opening config
    pub days: BTreeMap<String, DayHours>,
    #[serde(default)]
    pub updated_at: i64,
}

impl BusinessHours {
    /// Default week: open 09:00–18:00 every day except Sunday
    pub fn default_week() -> BTreeMap<String, DayHours> {
        WEEKDAY_KEYS
            .iter()
            .map(|&day| {
                (
                    day.to_string(),
                    DayHours {
                        active: day != "domingo",
                        open: "09:00".to_string(),
                        close: "18:00".to_string(),
                    },
                )
            })
            .collect()
    }
}

/// Replace-all update payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessHoursUpdate {
    pub days: BTreeMap<String, DayHours>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_week() {
        let week = BusinessHours::default_week();
        assert_eq!(week.len(), 7);
        assert!(week["segunda"].active);
        assert!(!week["domingo"].active);
        assert_eq!(week["sabado"].open, "09:00");
        assert_eq!(week["sabado"].close, "18:00");
    }
}
