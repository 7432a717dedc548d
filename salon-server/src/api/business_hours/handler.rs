//! Business Hours API Handlers
//!
//! The weekly schedule is loosely-typed on the wire; validation happens
//! here at the storage boundary so the booking validator can trust it.

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::db::models::{BusinessHours, BusinessHoursUpdate, WEEKDAY_KEYS};
use crate::db::repository::BusinessHoursRepository;
use crate::utils::time::time_to_minutes;
use crate::utils::{AppError, AppResult, ErrorCode};

const RESOURCE: &str = "business_hours";

/// GET /api/business-hours - the weekly schedule
pub async fn get(State(state): State<ServerState>) -> AppResult<Json<BusinessHours>> {
    let repo = BusinessHoursRepository::new(state.get_db());
    let hours = repo.get_or_create().await?;
    Ok(Json(hours))
}

/// PUT /api/business-hours - replace the weekly schedule
pub async fn update(
    State(state): State<ServerState>,
    Json(payload): Json<BusinessHoursUpdate>,
) -> AppResult<Json<BusinessHours>> {
    for (day, config) in &payload.days {
        if !WEEKDAY_KEYS.contains(&day.as_str()) {
            return Err(
                AppError::with_message(ErrorCode::UnknownWeekday, format!("Unknown weekday: {day}"))
                    .with_detail("weekday", day.clone()),
            );
        }

        let open = time_to_minutes(&config.open)?;
        let close = time_to_minutes(&config.close)?;
        if config.active && open >= close {
            return Err(AppError::with_message(
                ErrorCode::BusinessHoursInvalid,
                format!("{day}: opening time {} must precede closing time {}", config.open, config.close),
            )
            .with_detail("weekday", day.clone()));
        }
    }

    let repo = BusinessHoursRepository::new(state.get_db());
    let hours = repo.update(payload).await?;

    state.broadcast_sync(RESOURCE, "updated", "main", Some(&hours));

    Ok(Json(hours))
}
