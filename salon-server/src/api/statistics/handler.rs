//! Statistics API Handlers
//!
//! Finance and load rollups: pure folds over the appointment collection,
//! expressed as SurrealQL aggregates. Revenue counts CONFIRMED and
//! COMPLETED appointments; received counts COMPLETED only.

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::utils::time::{parse_date, weekday_key};
use crate::utils::{AppError, AppResult};

// ============================================================================
// Response Types
// ============================================================================

/// Overview statistics for the requested range
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverviewStats {
    /// Σ price over CONFIRMED + COMPLETED
    pub revenue: f64,
    /// Σ price over COMPLETED only
    pub received: f64,
    /// Count of CONFIRMED + COMPLETED appointments
    pub appointments: i64,
    /// revenue / appointments (0 when empty)
    pub average_ticket: f64,
}

/// Per-status tally
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

/// Appointments per weekday within the range
#[derive(Debug, Clone, Serialize)]
pub struct WeekdayLoad {
    pub weekday: String,
    pub count: i64,
}

/// Monthly revenue data point (trailing six months)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyRevenuePoint {
    /// `YYYY-MM`
    pub month: String,
    pub revenue: f64,
    pub appointments: i64,
}

/// Full statistics response
#[derive(Debug, Clone, Serialize)]
pub struct StatisticsResponse {
    pub overview: OverviewStats,
    pub status_counts: Vec<StatusCount>,
    pub weekday_load: Vec<WeekdayLoad>,
    pub monthly_trend: Vec<MonthlyRevenuePoint>,
}

// ============================================================================
// Query Parameters
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StatisticsQuery {
    #[serde(rename = "timeRange")]
    pub time_range: String,
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
}

// ============================================================================
// Time Range Calculation
// ============================================================================

/// Resolve the requested range to inclusive date strings in the business
/// timezone
fn resolve_range(
    time_range: &str,
    custom_start: Option<&str>,
    custom_end: Option<&str>,
    tz: chrono_tz::Tz,
) -> AppResult<(String, String)> {
    let today = chrono::Utc::now().with_timezone(&tz).date_naive();

    let (from, to) = match time_range {
        "week" => {
            let weekday = today.weekday().num_days_from_monday();
            let week_start = today
                .checked_sub_days(Days::new(weekday as u64))
                .unwrap_or(today);
            (week_start, today)
        }
        "month" => (today.with_day(1).unwrap_or(today), today),
        "custom" => {
            let (Some(start), Some(end)) = (custom_start, custom_end) else {
                return Err(AppError::validation(
                    "custom range requires startDate and endDate",
                ));
            };
            (parse_date(start)?, parse_date(end)?)
        }
        // "today" and anything unknown fall back to the single current day
        _ => (today, today),
    };

    Ok((format_date(from), format_date(to)))
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/statistics - finance and load overview
pub async fn get_statistics(
    State(state): State<ServerState>,
    Query(query): Query<StatisticsQuery>,
) -> AppResult<Json<StatisticsResponse>> {
    let tz = state.config.timezone;
    let (from, to) = resolve_range(
        &query.time_range,
        query.start_date.as_deref(),
        query.end_date.as_deref(),
        tz,
    )?;

    tracing::debug!(
        time_range = %query.time_range,
        from = %from,
        to = %to,
        "Fetching statistics"
    );

    // Overview rollup
    let mut result = state
        .db
        .query(
            "LET $all = (SELECT price, status FROM appointment \
                 WHERE date >= $from AND date <= $to);
             LET $booked = (SELECT * FROM $all WHERE status IN ['CONFIRMED', 'COMPLETED']);
             LET $done = (SELECT * FROM $all WHERE status = 'COMPLETED');
             LET $revenue = math::sum($booked.price) OR 0;
             LET $received = math::sum($done.price) OR 0;
             LET $count = count($booked);
             LET $avg = IF $count > 0 THEN $revenue / $count ELSE 0 END;
             RETURN {
                 revenue: $revenue,
                 received: $received,
                 appointments: $count,
                 average_ticket: $avg
             };",
        )
        .bind(("from", from.clone()))
        .bind(("to", to.clone()))
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    let overview: OverviewStats = result
        .take::<Option<OverviewStats>>(7)
        .map_err(|e| AppError::database(e.to_string()))?
        .unwrap_or(OverviewStats {
            revenue: 0.0,
            received: 0.0,
            appointments: 0,
            average_ticket: 0.0,
        });

    // Status tally
    let mut status_result = state
        .db
        .query(
            "SELECT status, count() AS count FROM appointment \
             WHERE date >= $from AND date <= $to \
             GROUP BY status",
        )
        .bind(("from", from.clone()))
        .bind(("to", to.clone()))
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    let status_counts: Vec<StatusCount> = status_result
        .take(0)
        .map_err(|e| AppError::database(e.to_string()))?;

    // Per-date counts, folded to weekdays in business-timezone terms
    #[derive(Deserialize)]
    struct DateCount {
        date: String,
        count: i64,
    }

    let mut date_result = state
        .db
        .query(
            "SELECT date, count() AS count FROM appointment \
             WHERE date >= $from AND date <= $to AND status != 'CANCELLED' \
             GROUP BY date",
        )
        .bind(("from", from.clone()))
        .bind(("to", to.clone()))
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    let date_counts: Vec<DateCount> = date_result
        .take(0)
        .map_err(|e| AppError::database(e.to_string()))?;

    let mut per_weekday: BTreeMap<&'static str, i64> = BTreeMap::new();
    for entry in date_counts {
        if let Ok(date) = parse_date(&entry.date) {
            *per_weekday.entry(weekday_key(date)).or_insert(0) += entry.count;
        }
    }
    let weekday_load: Vec<WeekdayLoad> = crate::db::models::WEEKDAY_KEYS
        .iter()
        .filter_map(|&day| {
            per_weekday.get(day).map(|&count| WeekdayLoad {
                weekday: day.to_string(),
                count,
            })
        })
        .collect();

    // Trailing six-month revenue trend, independent of the requested range
    let today = chrono::Utc::now().with_timezone(&tz).date_naive();
    let trend_start = today
        .checked_sub_months(Months::new(5))
        .unwrap_or(today)
        .with_day(1)
        .unwrap_or(today);

    let mut trend_result = state
        .db
        .query(
            "SELECT string::slice(date, 0, 7) AS month, \
                    math::sum(price) AS revenue, \
                    count() AS appointments \
             FROM appointment \
             WHERE status IN ['CONFIRMED', 'COMPLETED'] \
               AND date >= $trend_from AND date <= $trend_to \
             GROUP BY month \
             ORDER BY month",
        )
        .bind(("trend_from", format_date(trend_start)))
        .bind(("trend_to", format_date(today)))
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    let monthly_trend: Vec<MonthlyRevenuePoint> = trend_result
        .take(0)
        .map_err(|e| AppError::database(e.to_string()))?;

    Ok(Json(StatisticsResponse {
        overview,
        status_counts,
        weekday_load,
        monthly_trend,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_range_custom_requires_dates() {
        let tz = chrono_tz::America::Sao_Paulo;
        assert!(resolve_range("custom", None, None, tz).is_err());
        let (from, to) =
            resolve_range("custom", Some("2024-06-01"), Some("2024-06-30"), tz).unwrap();
        assert_eq!(from, "2024-06-01");
        assert_eq!(to, "2024-06-30");
    }

    #[test]
    fn test_resolve_range_today_is_single_day() {
        let tz = chrono_tz::America::Sao_Paulo;
        let (from, to) = resolve_range("today", None, None, tz).unwrap();
        assert_eq!(from, to);
    }
}
