//! Client API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::core::ServerState;
use crate::db::models::{Client, ClientCreate, ClientUpdate};
use crate::db::repository::{ClientRepository, Repository};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

const RESOURCE: &str = "client";

#[derive(serde::Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

/// GET /api/clients - list all clients
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Client>>> {
    let repo = ClientRepository::new(state.get_db());
    let clients = repo.find_all().await?;
    Ok(Json(clients))
}

/// GET /api/clients/search?q=xxx - search by name or phone
pub async fn search(
    State(state): State<ServerState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Client>>> {
    let repo = ClientRepository::new(state.get_db());
    let clients = repo.search(&query.q).await?;
    Ok(Json(clients))
}

/// GET /api/clients/:id - fetch one client
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Client>> {
    let repo = ClientRepository::new(state.get_db());
    let client = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::with_message(ErrorCode::ClientNotFound, format!("Client {}", id)))?;
    Ok(Json(client))
}

/// POST /api/clients - create a client
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ClientCreate>,
) -> AppResult<Json<Client>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.photo_url, "photo_url", MAX_URL_LEN)?;

    let repo = ClientRepository::new(state.get_db());
    let client = repo.create(payload).await?;

    let id = client.id.as_ref().map(|t| t.to_string()).unwrap_or_default();
    state.broadcast_sync(RESOURCE, "created", &id, Some(&client));

    Ok(Json(client))
}

/// PUT /api/clients/:id - update a client
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ClientUpdate>,
) -> AppResult<Json<Client>> {
    if let Some(ref name) = payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(ref phone) = payload.phone {
        validate_required_text(phone, "phone", MAX_SHORT_TEXT_LEN)?;
    }
    validate_optional_text(&payload.photo_url, "photo_url", MAX_URL_LEN)?;

    let repo = ClientRepository::new(state.get_db());
    let client = repo.update(&id, payload).await?;

    state.broadcast_sync(RESOURCE, "updated", &id, Some(&client));

    Ok(Json(client))
}

/// DELETE /api/clients/:id - delete a client
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = ClientRepository::new(state.get_db());
    let deleted = repo.delete(&id).await?;

    if deleted {
        state.broadcast_sync::<()>(RESOURCE, "deleted", &id, None);
    }

    Ok(Json(deleted))
}
