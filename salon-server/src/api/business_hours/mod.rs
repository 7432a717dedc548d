//! Business Hours API module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route(
        "/api/business-hours",
        get(handler::get).put(handler::update),
    )
}
