//! Booking Validator
//!
//! Decides whether a candidate appointment fits the salon schedule: day-off
//! overrides first, then weekly business hours, then interval overlap
//! against the date's existing appointments. The first failing check wins.
//!
//! This is a pure function over already-fetched data; it performs no I/O.
//! Format errors (bad date or time strings in the stored configuration)
//! surface as `AppError`, business outcomes as [`Decision`].

use std::collections::BTreeMap;

use crate::db::models::{Appointment, DayHours, DayOffEntry};
use crate::utils::time::{add_minutes, parse_date, time_to_minutes, weekday_key};
use crate::utils::{AppError, AppResult, ErrorCode};

/// A candidate booking to validate
#[derive(Debug, Clone)]
pub struct BookingRequest<'a> {
    /// Calendar date (`YYYY-MM-DD`)
    pub date: &'a str,
    /// Requested start (`HH:MM`)
    pub start_time: &'a str,
    /// Length of the requested service in minutes
    pub duration_minutes: u32,
    /// Set when validating an edit so the appointment being edited does not
    /// collide with itself (`"appointment:xxx"`)
    pub exclude_id: Option<&'a str>,
}

/// Read-only snapshot of the schedule configuration
#[derive(Debug, Clone, Copy)]
pub struct SchedulePolicy<'a> {
    /// Date string → closure entry
    pub days_off: &'a BTreeMap<String, DayOffEntry>,
    /// Weekday key → opening config
    pub business_hours: &'a BTreeMap<String, DayHours>,
}

/// Why a booking was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The date is an active day-off entry
    DayOff { reason: String },
    /// The weekly schedule has no active entry for that weekday
    ClosedDay { weekday: String },
    /// The start instant falls outside `[open, close)`
    OutsideHours { open: String, close: String },
    /// The slot overlaps an existing appointment
    Conflict { start: String, end: String },
}

impl Rejection {
    /// Human-readable reason for the rejection
    pub fn message(&self) -> String {
        match self {
            Rejection::DayOff { reason } => {
                format!("The salon is closed on that date: {reason}")
            }
            Rejection::ClosedDay { weekday } => {
                format!("The salon does not open on {weekday}")
            }
            Rejection::OutsideHours { open, close } => {
                format!("Requested time is outside business hours ({open}–{close})")
            }
            Rejection::Conflict { start, end } => {
                format!("Requested time conflicts with an appointment from {start} to {end}")
            }
        }
    }
}

impl From<Rejection> for AppError {
    fn from(rejection: Rejection) -> Self {
        let message = rejection.message();
        match rejection {
            Rejection::DayOff { reason } => {
                AppError::with_message(ErrorCode::BookingDayOff, message)
                    .with_detail("reason", reason)
            }
            Rejection::ClosedDay { weekday } => {
                AppError::with_message(ErrorCode::BookingClosedDay, message)
                    .with_detail("weekday", weekday)
            }
            Rejection::OutsideHours { open, close } => {
                AppError::with_message(ErrorCode::BookingOutsideHours, message)
                    .with_detail("open", open)
                    .with_detail("close", close)
            }
            Rejection::Conflict { start, end } => {
                AppError::with_message(ErrorCode::BookingConflict, message)
                    .with_detail("start", start)
                    .with_detail("end", end)
            }
        }
    }
}

/// Accepted booking with the computed slot boundaries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accepted {
    /// Derived end time (`HH:MM`); persisted alongside the request
    pub end_time: String,
    /// Start as minutes since midnight
    pub start_minutes: u32,
    /// End as minutes since midnight
    pub end_minutes: u32,
}

/// Validation outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Accepted(Accepted),
    Rejected(Rejection),
}

/// Validate a booking request against the schedule policy and the date's
/// existing appointments.
///
/// Checks run in order and short-circuit on the first failure:
///
/// 1. day-off override for the exact date
/// 2. weekly business hours; only the start instant is bounds-checked, so
///    a booking may legally extend past closing
/// 3. overlap against existing appointments, skipping the excluded id and
///    any appointment whose status has released its slot; touching
///    endpoints do not count as overlap
pub fn validate(
    request: &BookingRequest,
    policy: &SchedulePolicy,
    existing: &[Appointment],
) -> AppResult<Decision> {
    // 1. Day-off override
    if let Some(entry) = policy.days_off.get(request.date)
        && entry.active
    {
        return Ok(Decision::Rejected(Rejection::DayOff {
            reason: entry.reason.clone(),
        }));
    }

    // 2. Weekly business hours
    let weekday = weekday_key(parse_date(request.date)?);
    let day = match policy.business_hours.get(weekday) {
        Some(day) if day.active => day,
        _ => {
            return Ok(Decision::Rejected(Rejection::ClosedDay {
                weekday: weekday.to_string(),
            }));
        }
    };

    let start_min = time_to_minutes(request.start_time)?;
    let open_min = time_to_minutes(&day.open)?;
    let close_min = time_to_minutes(&day.close)?;
    if start_min < open_min || start_min >= close_min {
        return Ok(Decision::Rejected(Rejection::OutsideHours {
            open: day.open.clone(),
            close: day.close.clone(),
        }));
    }

    // 3. Overlap scan
    let end_time = add_minutes(request.start_time, request.duration_minutes)?;
    let new_start = start_min;
    let new_end = time_to_minutes(&end_time)?;

    for booked in existing {
        if is_excluded(booked, request.exclude_id) || !booked.status.blocks_slot() {
            continue;
        }

        let exist_start = time_to_minutes(&booked.start_time)?;
        let exist_end = time_to_minutes(&booked.end_time)?;

        // Half-open intervals: touching endpoints are not a conflict
        if new_start < exist_end && new_end > exist_start {
            return Ok(Decision::Rejected(Rejection::Conflict {
                start: booked.start_time.clone(),
                end: booked.end_time.clone(),
            }));
        }
    }

    Ok(Decision::Accepted(Accepted {
        end_time,
        start_minutes: new_start,
        end_minutes: new_end,
    }))
}

/// Whether this stored appointment is the one being edited
fn is_excluded(booked: &Appointment, exclude_id: Option<&str>) -> bool {
    let (Some(exclude), Some(id)) = (exclude_id, booked.id.as_ref()) else {
        return false;
    };
    id.to_string() == exclude || id.id.to_raw() == exclude
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{AppointmentStatus, BusinessHours};
    use surrealdb::sql::Thing;

    fn make_appointment(id: &str, start: &str, end: &str, status: AppointmentStatus) -> Appointment {
        Appointment {
            id: Some(Thing::from(("appointment", id))),
            client: Thing::from(("client", "c1")),
            client_name: "Ana".to_string(),
            service: Thing::from(("service", "s1")),
            service_name: "Corte".to_string(),
            date: "2024-06-03".to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            start_minutes: time_to_minutes(start).unwrap() as i64,
            end_minutes: time_to_minutes(end).unwrap() as i64,
            price: 80.0,
            status,
            note: None,
            created_at: 0,
            reminded: false,
        }
    }

    fn week_hours() -> BTreeMap<String, DayHours> {
        BusinessHours::default_week()
    }

    fn no_days_off() -> BTreeMap<String, DayOffEntry> {
        BTreeMap::new()
    }

    fn request<'a>(date: &'a str, start: &'a str, duration: u32) -> BookingRequest<'a> {
        BookingRequest {
            date,
            start_time: start,
            duration_minutes: duration,
            exclude_id: None,
        }
    }

    fn assert_accepted(decision: Decision) -> Accepted {
        match decision {
            Decision::Accepted(accepted) => accepted,
            Decision::Rejected(rejection) => panic!("expected acceptance, got {rejection:?}"),
        }
    }

    fn assert_rejected(decision: Decision) -> Rejection {
        match decision {
            Decision::Rejected(rejection) => rejection,
            Decision::Accepted(accepted) => panic!("expected rejection, got {accepted:?}"),
        }
    }

    #[test]
    fn test_accepts_open_slot_and_computes_end() {
        let hours = week_hours();
        let days_off = no_days_off();
        let policy = SchedulePolicy {
            days_off: &days_off,
            business_hours: &hours,
        };

        // 2024-06-03 is a Monday (segunda), open 09:00-18:00
        let decision = validate(&request("2024-06-03", "10:00", 30), &policy, &[]).unwrap();
        let accepted = assert_accepted(decision);
        assert_eq!(accepted.end_time, "10:30");
        assert_eq!(accepted.start_minutes, 600);
        assert_eq!(accepted.end_minutes, 630);
    }

    #[test]
    fn test_rejects_closed_weekday() {
        let hours = week_hours();
        let days_off = no_days_off();
        let policy = SchedulePolicy {
            days_off: &days_off,
            business_hours: &hours,
        };

        // 2024-06-09 is a Sunday (domingo), inactive by default
        let decision = validate(&request("2024-06-09", "10:00", 30), &policy, &[]).unwrap();
        assert_eq!(
            assert_rejected(decision),
            Rejection::ClosedDay {
                weekday: "domingo".to_string()
            }
        );
    }

    #[test]
    fn test_rejects_missing_weekday_entry() {
        let mut hours = week_hours();
        hours.remove("segunda");
        let days_off = no_days_off();
        let policy = SchedulePolicy {
            days_off: &days_off,
            business_hours: &hours,
        };

        let decision = validate(&request("2024-06-03", "10:00", 30), &policy, &[]).unwrap();
        assert!(matches!(
            assert_rejected(decision),
            Rejection::ClosedDay { .. }
        ));
    }

    #[test]
    fn test_rejects_day_off() {
        let hours = week_hours();
        let mut days_off = no_days_off();
        days_off.insert(
            "2024-06-03".to_string(),
            DayOffEntry {
                date: "2024-06-03".to_string(),
                active: true,
                reason: "Feriado".to_string(),
            },
        );
        let policy = SchedulePolicy {
            days_off: &days_off,
            business_hours: &hours,
        };

        let decision = validate(&request("2024-06-03", "10:00", 30), &policy, &[]).unwrap();
        assert_eq!(
            assert_rejected(decision),
            Rejection::DayOff {
                reason: "Feriado".to_string()
            }
        );
    }

    #[test]
    fn test_inactive_day_off_does_not_block() {
        let hours = week_hours();
        let mut days_off = no_days_off();
        days_off.insert(
            "2024-06-03".to_string(),
            DayOffEntry {
                date: "2024-06-03".to_string(),
                active: false,
                reason: "Feriado".to_string(),
            },
        );
        let policy = SchedulePolicy {
            days_off: &days_off,
            business_hours: &hours,
        };

        let decision = validate(&request("2024-06-03", "10:00", 30), &policy, &[]).unwrap();
        assert_accepted(decision);
    }

    #[test]
    fn test_day_off_checked_before_business_hours() {
        // A date that is both a day off AND outside hours must report the
        // day off
        let hours = week_hours();
        let mut days_off = no_days_off();
        days_off.insert(
            "2024-06-03".to_string(),
            DayOffEntry {
                date: "2024-06-03".to_string(),
                active: true,
                reason: "Reforma".to_string(),
            },
        );
        let policy = SchedulePolicy {
            days_off: &days_off,
            business_hours: &hours,
        };

        let decision = validate(&request("2024-06-03", "23:00", 30), &policy, &[]).unwrap();
        assert!(matches!(
            assert_rejected(decision),
            Rejection::DayOff { .. }
        ));
    }

    #[test]
    fn test_hours_boundaries() {
        let hours = week_hours();
        let days_off = no_days_off();
        let policy = SchedulePolicy {
            days_off: &days_off,
            business_hours: &hours,
        };

        // start == open accepts
        let decision = validate(&request("2024-06-03", "09:00", 30), &policy, &[]).unwrap();
        assert_accepted(decision);

        // start == close rejects
        let decision = validate(&request("2024-06-03", "18:00", 30), &policy, &[]).unwrap();
        assert_eq!(
            assert_rejected(decision),
            Rejection::OutsideHours {
                open: "09:00".to_string(),
                close: "18:00".to_string()
            }
        );

        // before opening rejects
        let decision = validate(&request("2024-06-03", "08:59", 30), &policy, &[]).unwrap();
        assert!(matches!(
            assert_rejected(decision),
            Rejection::OutsideHours { .. }
        ));
    }

    #[test]
    fn test_booking_may_extend_past_closing() {
        // Only the start instant is bounds-checked
        let hours = week_hours();
        let days_off = no_days_off();
        let policy = SchedulePolicy {
            days_off: &days_off,
            business_hours: &hours,
        };

        let decision = validate(&request("2024-06-03", "17:30", 120), &policy, &[]).unwrap();
        let accepted = assert_accepted(decision);
        assert_eq!(accepted.end_time, "19:30");
    }

    #[test]
    fn test_overlap_conflicts() {
        let hours = week_hours();
        let days_off = no_days_off();
        let policy = SchedulePolicy {
            days_off: &days_off,
            business_hours: &hours,
        };
        let existing = [make_appointment(
            "a1",
            "09:00",
            "10:00",
            AppointmentStatus::Confirmed,
        )];

        let decision = validate(&request("2024-06-03", "09:30", 30), &policy, &existing).unwrap();
        assert_eq!(
            assert_rejected(decision),
            Rejection::Conflict {
                start: "09:00".to_string(),
                end: "10:00".to_string()
            }
        );

        // Straddling the whole slot also conflicts
        let decision = validate(&request("2024-06-03", "09:00", 90), &policy, &existing).unwrap();
        assert!(matches!(
            assert_rejected(decision),
            Rejection::Conflict { .. }
        ));
    }

    #[test]
    fn test_touching_endpoints_do_not_conflict() {
        let hours = week_hours();
        let days_off = no_days_off();
        let policy = SchedulePolicy {
            days_off: &days_off,
            business_hours: &hours,
        };
        let existing = [make_appointment(
            "a1",
            "09:00",
            "10:00",
            AppointmentStatus::Confirmed,
        )];

        // [10:00, 10:30) right after [09:00, 10:00)
        let decision = validate(&request("2024-06-03", "10:00", 30), &policy, &existing).unwrap();
        let accepted = assert_accepted(decision);
        assert_eq!(accepted.end_time, "10:30");

        // [08:00, 09:00) right before; open earlier to exercise the leading
        // touch
        let mut hours = week_hours();
        hours.get_mut("segunda").unwrap().open = "08:00".to_string();
        let policy = SchedulePolicy {
            days_off: &days_off,
            business_hours: &hours,
        };
        let decision = validate(&request("2024-06-03", "08:00", 60), &policy, &existing).unwrap();
        assert_accepted(decision);
    }

    #[test]
    fn test_cancelled_and_no_show_release_the_slot() {
        let hours = week_hours();
        let days_off = no_days_off();
        let policy = SchedulePolicy {
            days_off: &days_off,
            business_hours: &hours,
        };

        for status in [AppointmentStatus::Cancelled, AppointmentStatus::NoShow] {
            let existing = [make_appointment("a1", "09:00", "10:00", status)];
            let decision =
                validate(&request("2024-06-03", "09:00", 60), &policy, &existing).unwrap();
            assert_accepted(decision);
        }
    }

    #[test]
    fn test_edit_excludes_itself() {
        // Re-validating an unchanged appointment against its own stored
        // state must accept
        let hours = week_hours();
        let days_off = no_days_off();
        let policy = SchedulePolicy {
            days_off: &days_off,
            business_hours: &hours,
        };
        let existing = [make_appointment(
            "a1",
            "09:00",
            "10:00",
            AppointmentStatus::Confirmed,
        )];

        let decision = validate(
            &BookingRequest {
                date: "2024-06-03",
                start_time: "09:00",
                duration_minutes: 60,
                exclude_id: Some("appointment:a1"),
            },
            &policy,
            &existing,
        )
        .unwrap();
        assert_accepted(decision);

        // Without the exclusion the same request conflicts
        let decision = validate(&request("2024-06-03", "09:00", 60), &policy, &existing).unwrap();
        assert!(matches!(
            assert_rejected(decision),
            Rejection::Conflict { .. }
        ));
    }

    #[test]
    fn test_end_to_end_scenario() {
        // Existing Confirmed booking 09:00-10:00 on a Monday: a 09:30/30min
        // request conflicts, a 10:00/30min request is accepted with end 10:30
        let hours = week_hours();
        let days_off = no_days_off();
        let policy = SchedulePolicy {
            days_off: &days_off,
            business_hours: &hours,
        };
        let existing = [make_appointment(
            "a1",
            "09:00",
            "10:00",
            AppointmentStatus::Confirmed,
        )];

        let decision = validate(&request("2024-06-03", "09:30", 30), &policy, &existing).unwrap();
        assert!(matches!(
            assert_rejected(decision),
            Rejection::Conflict { .. }
        ));

        let decision = validate(&request("2024-06-03", "10:00", 30), &policy, &existing).unwrap();
        let accepted = assert_accepted(decision);
        assert_eq!(accepted.end_time, "10:30");
    }

    #[test]
    fn test_rejection_error_codes() {
        let conflict: AppError = Rejection::Conflict {
            start: "09:00".to_string(),
            end: "10:00".to_string(),
        }
        .into();
        assert_eq!(conflict.code, ErrorCode::BookingConflict);

        let day_off: AppError = Rejection::DayOff {
            reason: "Feriado".to_string(),
        }
        .into();
        assert_eq!(day_off.code, ErrorCode::BookingDayOff);
    }
}
