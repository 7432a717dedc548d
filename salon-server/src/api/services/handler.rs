//! Service API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::core::ServerState;
use crate::db::models::{Service, ServiceCreate, ServiceUpdate};
use crate::db::repository::{Repository, ServiceRepository};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

const RESOURCE: &str = "service";

#[derive(serde::Deserialize)]
pub struct ListQuery {
    /// When true, only services available for new bookings
    #[serde(default)]
    pub active: bool,
}

/// GET /api/services - list services (all, or only active with ?active=true)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Service>>> {
    let repo = ServiceRepository::new(state.get_db());
    let services = if query.active {
        repo.find_active().await?
    } else {
        repo.find_all().await?
    };
    Ok(Json(services))
}

/// GET /api/services/:id - fetch one service
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Service>> {
    let repo = ServiceRepository::new(state.get_db());
    let service = repo.find_by_id(&id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::ServiceNotFound, format!("Service {}", id))
    })?;
    Ok(Json(service))
}

/// POST /api/services - create a service
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ServiceCreate>,
) -> AppResult<Json<Service>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    if payload.duration_minutes <= 0 {
        return Err(AppError::new(ErrorCode::ServiceInvalidDuration));
    }
    if payload.price < 0.0 {
        return Err(AppError::new(ErrorCode::ServiceInvalidPrice));
    }

    let repo = ServiceRepository::new(state.get_db());
    let service = repo.create(payload).await?;

    let id = service.id.as_ref().map(|t| t.to_string()).unwrap_or_default();
    state.broadcast_sync(RESOURCE, "created", &id, Some(&service));

    Ok(Json(service))
}

/// PUT /api/services/:id - update a service
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ServiceUpdate>,
) -> AppResult<Json<Service>> {
    if let Some(ref name) = payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    if let Some(d) = payload.duration_minutes
        && d <= 0
    {
        return Err(AppError::new(ErrorCode::ServiceInvalidDuration));
    }
    if let Some(p) = payload.price
        && p < 0.0
    {
        return Err(AppError::new(ErrorCode::ServiceInvalidPrice));
    }

    let repo = ServiceRepository::new(state.get_db());
    let service = repo.update(&id, payload).await?;

    state.broadcast_sync(RESOURCE, "updated", &id, Some(&service));

    Ok(Json(service))
}

/// DELETE /api/services/:id - deactivate a service
///
/// Existing appointments keep their snapshot of the service; only new
/// bookings stop offering it.
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = ServiceRepository::new(state.get_db());
    let deactivated = repo.delete(&id).await?;

    if deactivated {
        state.broadcast_sync::<()>(RESOURCE, "deleted", &id, None);
    }

    Ok(Json(deactivated))
}
