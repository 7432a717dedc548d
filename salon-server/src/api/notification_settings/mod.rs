//! Notification Settings API module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route(
        "/api/notification-settings",
        get(handler::get).put(handler::update),
    )
}
