// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP handlers binding the fleet's core operations (§6) to JSON over HTTP.
//!
//! Handlers are thin: decode the body, call the core operation, map
//! `CoreError` to an HTTP status + JSON error body. No rate limiting, CORS,
//! or auth — those are the responsibility of a production transport layer
//! fronting this reference binary, per the Non-goals in §1.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::fleet::Fleet;

#[derive(Debug, Deserialize)]
pub struct AddCarRequest {
    pub name: String,
    pub min_floor: i64,
    pub max_floor: i64,
    #[serde(default)]
    pub floor_traversal_ms: Option<u64>,
    #[serde(default)]
    pub door_open_ms: Option<u64>,
    #[serde(default)]
    pub overload_threshold: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct AddCarResponse {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteCarResponse {
    pub name: String,
    pub removed: bool,
}

#[derive(Debug, Deserialize)]
pub struct RequestElevatorRequest {
    pub from: i64,
    pub to: i64,
}

#[derive(Debug, Serialize)]
pub struct RequestElevatorResponse {
    pub car: String,
}

/// `POST /api/v1/cars` — add a car to the fleet.
pub async fn add_car(
    State(fleet): State<Arc<Fleet>>,
    Json(req): Json<AddCarRequest>,
) -> Result<impl IntoResponse, CoreError> {
    let floor_traversal = req.floor_traversal_ms.map(Duration::from_millis);
    let door_open = req.door_open_ms.map(Duration::from_millis);
    fleet
        .add(req.name.clone(), req.min_floor, req.max_floor, floor_traversal, door_open, req.overload_threshold)
        .await?;
    tracing::info!(name = %req.name, min_floor = req.min_floor, max_floor = req.max_floor, "car added");
    Ok(Json(AddCarResponse { name: req.name }))
}

/// `DELETE /api/v1/cars/{name}` — gracefully drain and remove a car.
pub async fn delete_car(
    State(fleet): State<Arc<Fleet>>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, CoreError> {
    fleet.delete(&name).await?;
    tracing::info!(%name, "car deleted");
    Ok(Json(DeleteCarResponse { name, removed: true }))
}

/// `POST /api/v1/requests` — dispatch a pickup→destination request.
pub async fn request_elevator(
    State(fleet): State<Arc<Fleet>>,
    Json(req): Json<RequestElevatorRequest>,
) -> Result<impl IntoResponse, CoreError> {
    let car = fleet.request_elevator(req.from, req.to).await?;
    Ok(Json(RequestElevatorResponse { car }))
}

/// `GET /api/v1/status` — snapshot of every car's externally visible state.
pub async fn status(State(fleet): State<Arc<Fleet>>) -> Result<impl IntoResponse, CoreError> {
    let status = fleet.status().await?;
    Ok(Json(status))
}

/// `GET /api/v1/health` — fleet-wide health verdict.
pub async fn health(State(fleet): State<Arc<Fleet>>) -> Result<impl IntoResponse, CoreError> {
    let health = fleet.health().await?;
    Ok(Json(health))
}

/// `GET /api/v1/metrics` — monotonic counters snapshot.
pub async fn metrics(State(fleet): State<Arc<Fleet>>) -> impl IntoResponse {
    Json(fleet.metrics().await)
}
