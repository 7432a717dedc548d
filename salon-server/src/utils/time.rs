//! Wall-clock helpers for the booking domain
//!
//! Appointment documents carry dates as `YYYY-MM-DD` strings and times as
//! zero-padded `HH:MM` strings. All conversion between that format and
//! minutes-since-midnight lives here; the validator and the repositories
//! only see converted values.

use chrono::{Datelike, NaiveDate};
use chrono_tz::Tz;

use super::{AppError, AppResult, ErrorCode};

/// Minutes in a calendar day
pub const MINUTES_PER_DAY: u32 = 1440;

/// Parse a zero-padded `HH:MM` string into minutes since midnight
pub fn time_to_minutes(t: &str) -> AppResult<u32> {
    let invalid =
        || AppError::with_message(ErrorCode::InvalidFormat, format!("Invalid time format: {t}"));

    let (h, m) = t.split_once(':').ok_or_else(invalid)?;
    if h.len() != 2 || m.len() != 2 {
        return Err(invalid());
    }
    let hours: u32 = h.parse().map_err(|_| invalid())?;
    let minutes: u32 = m.parse().map_err(|_| invalid())?;
    if hours >= 24 || minutes >= 60 {
        return Err(invalid());
    }
    Ok(hours * 60 + minutes)
}

/// Format minutes since midnight as zero-padded `HH:MM`
pub fn minutes_to_time(minutes: u32) -> String {
    let minutes = minutes % MINUTES_PER_DAY;
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Add a duration in minutes to an `HH:MM` start time
///
/// Wraps modulo 24h: a 30-minute booking starting at 23:50 ends at 00:20 on
/// the same calendar date. The stored documents have always carried the
/// wrapped value; callers that care about the wrap must check it themselves.
pub fn add_minutes(start: &str, duration: u32) -> AppResult<String> {
    let start_min = time_to_minutes(start)?;
    Ok(minutes_to_time((start_min + duration) % MINUTES_PER_DAY))
}

/// Parse a `YYYY-MM-DD` date string
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// Weekday key for the business-hours document
///
/// The configuration documents keep the Portuguese day keys the mobile app
/// writes (`segunda`..`domingo`).
pub fn weekday_key(date: NaiveDate) -> &'static str {
    match date.weekday() {
        chrono::Weekday::Mon => "segunda",
        chrono::Weekday::Tue => "terca",
        chrono::Weekday::Wed => "quarta",
        chrono::Weekday::Thu => "quinta",
        chrono::Weekday::Fri => "sexta",
        chrono::Weekday::Sat => "sabado",
        chrono::Weekday::Sun => "domingo",
    }
}

/// Date + minutes-since-midnight → Unix millis in the business timezone
///
/// DST gap fallback: if the local time does not exist, fall back to UTC.
pub fn date_minutes_to_millis(date: NaiveDate, minutes: u32, tz: Tz) -> i64 {
    // minutes is reduced below 24h, so the construction cannot fail
    let minutes = minutes % MINUTES_PER_DAY;
    let naive = date.and_hms_opt(minutes / 60, minutes % 60, 0).unwrap();
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_to_minutes() {
        assert_eq!(time_to_minutes("00:00").unwrap(), 0);
        assert_eq!(time_to_minutes("09:00").unwrap(), 540);
        assert_eq!(time_to_minutes("18:30").unwrap(), 1110);
        assert_eq!(time_to_minutes("23:59").unwrap(), 1439);
    }

    #[test]
    fn test_time_to_minutes_rejects_malformed() {
        for bad in ["", "9:00", "09:0", "24:00", "12:60", "ab:cd", "0900"] {
            assert!(time_to_minutes(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_minutes_to_time_padding() {
        assert_eq!(minutes_to_time(0), "00:00");
        assert_eq!(minutes_to_time(540), "09:00");
        assert_eq!(minutes_to_time(1439), "23:59");
    }

    #[test]
    fn test_add_minutes() {
        assert_eq!(add_minutes("09:00", 30).unwrap(), "09:30");
        assert_eq!(add_minutes("09:45", 30).unwrap(), "10:15");
        assert_eq!(add_minutes("10:00", 90).unwrap(), "11:30");
    }

    #[test]
    fn test_add_minutes_wraps_past_midnight() {
        assert_eq!(add_minutes("23:50", 30).unwrap(), "00:20");
        assert_eq!(add_minutes("23:00", 1440).unwrap(), "23:00");
    }

    #[test]
    fn test_parse_date() {
        assert!(parse_date("2024-06-03").is_ok());
        assert!(parse_date("03/06/2024").is_err());
        assert!(parse_date("2024-13-01").is_err());
    }

    #[test]
    fn test_weekday_key() {
        // 2024-06-03 is a Monday
        assert_eq!(weekday_key(parse_date("2024-06-03").unwrap()), "segunda");
        assert_eq!(weekday_key(parse_date("2024-06-08").unwrap()), "sabado");
        assert_eq!(weekday_key(parse_date("2024-06-09").unwrap()), "domingo");
    }
}
