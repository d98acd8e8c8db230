// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use super::{CircuitBreaker, CircuitBreakerConfig, CircuitState, ExecuteError};

fn breaker(max_failures: u32, half_open_limit: u32) -> CircuitBreaker {
    CircuitBreaker::new(CircuitBreakerConfig {
        max_failures,
        reset_timeout: Duration::from_millis(20),
        half_open_limit,
    })
}

async fn ok() -> Result<(), &'static str> {
    Ok(())
}

async fn fail() -> Result<(), &'static str> {
    Err("boom")
}

#[tokio::test]
async fn starts_closed_and_allows_calls() {
    let mut b = breaker(2, 1);
    assert_eq!(b.state(), CircuitState::Closed);
    assert!(b.execute("A", ok).await.is_ok());
    assert_eq!(b.state(), CircuitState::Closed);
}

#[tokio::test]
async fn exactly_max_failures_trips_open() {
    let mut b = breaker(2, 1);
    assert!(b.execute("A", fail).await.is_err());
    assert_eq!(b.state(), CircuitState::Closed);
    assert!(b.execute("A", fail).await.is_err());
    assert_eq!(b.state(), CircuitState::Open);
}

#[tokio::test]
async fn open_breaker_fails_fast_without_running_op() {
    let mut b = breaker(1, 1);
    assert!(b.execute("A", fail).await.is_err());
    assert_eq!(b.state(), CircuitState::Open);

    match b.execute("A", ok).await {
        Err(ExecuteError::Rejected) => {}
        other => panic!("expected fast-fail rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn half_open_after_reset_timeout_then_closes_on_success() {
    let mut b = breaker(1, 1);
    assert!(b.execute("A", fail).await.is_err());
    assert_eq!(b.state(), CircuitState::Open);

    tokio::time::sleep(Duration::from_millis(30)).await;

    assert!(b.execute("A", ok).await.is_ok());
    assert_eq!(b.state(), CircuitState::Closed);
}

#[tokio::test]
async fn half_open_limit_gates_probe_count_then_closes() {
    let mut b = breaker(1, 2);
    assert!(b.execute("A", fail).await.is_err());
    tokio::time::sleep(Duration::from_millis(30)).await;

    assert!(b.execute("A", ok).await.is_ok());
    assert_eq!(b.state(), CircuitState::HalfOpen);
    assert!(b.execute("A", ok).await.is_ok());
    assert_eq!(b.state(), CircuitState::Closed);
}

#[tokio::test]
async fn any_half_open_failure_reopens() {
    let mut b = breaker(1, 3);
    assert!(b.execute("A", fail).await.is_err());
    tokio::time::sleep(Duration::from_millis(30)).await;

    assert!(b.execute("A", ok).await.is_ok());
    assert_eq!(b.state(), CircuitState::HalfOpen);
    assert!(b.execute("A", fail).await.is_err());
    assert_eq!(b.state(), CircuitState::Open);
}

#[tokio::test]
async fn success_in_closed_resets_failure_count() {
    let mut b = breaker(2, 1);
    assert!(b.execute("A", fail).await.is_err());
    assert!(b.execute("A", ok).await.is_ok());
    assert_eq!(b.failure_count(), 0);
    // Two more failures are needed to trip, not one, since the counter reset.
    assert!(b.execute("A", fail).await.is_err());
    assert_eq!(b.state(), CircuitState::Closed);
}
