// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Streaming status WebSocket: pushes a `Fleet::status` snapshot on a
//! configurable interval, per §4.7/§6's streaming-status requirement.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;

use crate::fleet::Fleet;

/// `GET /ws/status` — upgrades to a WebSocket that pushes a status snapshot
/// every `ws_status_interval`.
pub async fn ws_status_handler(State(fleet): State<Arc<Fleet>>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| stream_status(socket, fleet))
}

async fn stream_status(mut socket: WebSocket, fleet: Arc<Fleet>) {
    let mut interval = tokio::time::interval(fleet.config().ws_status_interval());
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let status = match fleet.status().await {
                    Ok(status) => status,
                    Err(e) => {
                        tracing::warn!(err = %e, "status collection failed for ws push");
                        continue;
                    }
                };
                let payload = match serde_json::to_string(&status) {
                    Ok(payload) => payload,
                    Err(e) => {
                        tracing::warn!(err = %e, "failed to encode status snapshot");
                        continue;
                    }
                };
                if socket.send(Message::Text(payload.into())).await.is_err() {
                    break;
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(_)) => break,
                    _ => {}
                }
            }
        }
    }
}
