//! Salon Info API module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/salon-info", get(handler::get).put(handler::update))
}
