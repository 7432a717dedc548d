//! Day-Off API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{DayOffCalendar, DayOffCreate, DayOffEntry};
use crate::db::repository::{DayOffRepository, RepoError};
use crate::utils::time::parse_date;
use crate::utils::validation::{MAX_NOTE_LEN, validate_required_text};
use crate::utils::{AppError, AppResult, ErrorCode};

const RESOURCE: &str = "day_off";

/// GET /api/days-off - all closure entries, ordered by date
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<DayOffEntry>>> {
    let repo = DayOffRepository::new(state.get_db());
    let calendar = repo.get_or_create().await?;
    Ok(Json(calendar.entries.into_values().collect()))
}

/// POST /api/days-off - add a closure entry (starts active)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DayOffCreate>,
) -> AppResult<Json<DayOffCalendar>> {
    parse_date(&payload.date)?;
    validate_required_text(&payload.reason, "reason", MAX_NOTE_LEN)?;

    let repo = DayOffRepository::new(state.get_db());
    let calendar = repo
        .add_entry(&payload.date, payload.reason.trim())
        .await
        .map_err(|e| match e {
            RepoError::Validation(_) => AppError::with_message(
                ErrorCode::DayOffExists,
                format!("Day off already exists for {}", payload.date),
            ),
            other => other.into(),
        })?;

    state.broadcast_sync(RESOURCE, "created", &payload.date, Some(&calendar));

    Ok(Json(calendar))
}

/// PATCH /api/days-off/:date - toggle an entry's active flag
pub async fn toggle(
    State(state): State<ServerState>,
    Path(date): Path<String>,
) -> AppResult<Json<DayOffCalendar>> {
    let repo = DayOffRepository::new(state.get_db());
    let calendar = repo.toggle_entry(&date).await.map_err(not_found_code)?;

    state.broadcast_sync(RESOURCE, "updated", &date, Some(&calendar));

    Ok(Json(calendar))
}

/// DELETE /api/days-off/:date - remove an entry
pub async fn delete(
    State(state): State<ServerState>,
    Path(date): Path<String>,
) -> AppResult<Json<DayOffCalendar>> {
    let repo = DayOffRepository::new(state.get_db());
    let calendar = repo.remove_entry(&date).await.map_err(not_found_code)?;

    state.broadcast_sync(RESOURCE, "deleted", &date, Some(&calendar));

    Ok(Json(calendar))
}

fn not_found_code(err: RepoError) -> AppError {
    match err {
        RepoError::NotFound(msg) => AppError::with_message(ErrorCode::DayOffNotFound, msg),
        other => other.into(),
    }
}
