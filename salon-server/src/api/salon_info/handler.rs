//! Salon Info API Handlers

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::db::models::{SalonInfo, SalonInfoUpdate};
use crate::db::repository::SalonInfoRepository;
use crate::utils::AppResult;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN, validate_optional_text,
    validate_required_text,
};

const RESOURCE: &str = "salon_info";

/// GET /api/salon-info - salon profile
pub async fn get(State(state): State<ServerState>) -> AppResult<Json<SalonInfo>> {
    let repo = SalonInfoRepository::new(state.get_db());
    let info = repo.get_or_create().await?;
    Ok(Json(info))
}

/// PUT /api/salon-info - update the salon profile
pub async fn update(
    State(state): State<ServerState>,
    Json(payload): Json<SalonInfoUpdate>,
) -> AppResult<Json<SalonInfo>> {
    if let Some(ref name) = payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(ref phone) = payload.phone {
        validate_required_text(phone, "phone", MAX_SHORT_TEXT_LEN)?;
    }
    validate_optional_text(&payload.address, "address", MAX_ADDRESS_LEN)?;
    validate_optional_text(&payload.logo_url, "logo_url", MAX_URL_LEN)?;

    let repo = SalonInfoRepository::new(state.get_db());
    let info = repo.update(payload).await?;

    state.broadcast_sync(RESOURCE, "updated", "main", Some(&info));

    Ok(Json(info))
}
