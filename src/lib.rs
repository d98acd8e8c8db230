// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Elevator fleet dispatch-and-motion engine, plus a reference axum
//! transport binding the operations of §6 to HTTP/WebSocket.

pub mod car;
pub mod car_state;
pub mod circuit_breaker;
pub mod config;
pub mod error;
pub mod fleet;
pub mod floor;
pub mod health;
pub mod metrics;
pub mod request_book;
pub mod transport;

use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::FleetConfig;
use crate::fleet::Fleet;
use crate::transport::build_router;

/// Run the elevator fleet service until shutdown.
pub async fn run(config: FleetConfig) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let fleet = Arc::new(Fleet::new(config));

    tracing::info!(%addr, "elevator-fleet listening");
    let router = build_router(fleet);
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(e) => tracing::warn!(err = %e, "failed to install ctrl-c handler"),
    }
}
