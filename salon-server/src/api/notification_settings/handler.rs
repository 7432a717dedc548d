//! Notification Settings API Handlers

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::db::models::{NotificationSettings, NotificationSettingsUpdate};
use crate::db::repository::NotificationSettingsRepository;
use crate::utils::time::time_to_minutes;
use crate::utils::AppResult;

const RESOURCE: &str = "notification_settings";

/// GET /api/notification-settings - reminder configuration
pub async fn get(State(state): State<ServerState>) -> AppResult<Json<NotificationSettings>> {
    let repo = NotificationSettingsRepository::new(state.get_db());
    let settings = repo.get_or_create().await?;
    Ok(Json(settings))
}

/// PUT /api/notification-settings - update the reminder configuration
///
/// When `lead_time` is given the server recomputes `lead_minutes` from it;
/// the two fields never drift apart.
pub async fn update(
    State(state): State<ServerState>,
    Json(mut payload): Json<NotificationSettingsUpdate>,
) -> AppResult<Json<NotificationSettings>> {
    if let Some(ref lead_time) = payload.lead_time {
        let minutes = time_to_minutes(lead_time)?;
        payload.lead_minutes = Some(minutes as i64);
    }

    let repo = NotificationSettingsRepository::new(state.get_db());
    let settings = repo.update(payload).await?;

    state.broadcast_sync(RESOURCE, "updated", "main", Some(&settings));
    state.notify_reminder_scheduler();

    Ok(Json(settings))
}
