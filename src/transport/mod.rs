// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP + WebSocket transport binding §6's external interfaces to the core.

pub mod http;
pub mod ws;

use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::fleet::Fleet;

/// Build the axum `Router` with all fleet routes.
pub fn build_router(fleet: Arc<Fleet>) -> Router {
    Router::new()
        .route("/api/v1/cars", post(http::add_car))
        .route("/api/v1/cars/{name}", delete(http::delete_car))
        .route("/api/v1/requests", post(http::request_elevator))
        .route("/api/v1/status", get(http::status))
        .route("/api/v1/health", get(http::health))
        .route("/api/v1/metrics", get(http::metrics))
        .route("/ws/status", get(ws::ws_status_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(fleet)
}
