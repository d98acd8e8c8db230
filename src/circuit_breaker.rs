// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-car fault boundary.
//!
//! Isolates a misbehaving car from the fleet: sustained `Step` failures trip
//! the breaker open, future steps fail fast, and the car reports unhealthy
//! via `Fleet::health` while keeping its last committed position.

use std::time::{Duration, Instant};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug, Clone, Copy)]
pub struct CircuitBreakerConfig {
    pub max_failures: u32,
    pub reset_timeout: Duration,
    pub half_open_limit: u32,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            max_failures: 3,
            reset_timeout: Duration::from_secs(30),
            half_open_limit: 1,
        }
    }
}

#[derive(Debug)]
pub struct CircuitBreaker {
    config: CircuitBreakerConfig,
    state: CircuitState,
    failure_count: u32,
    success_count: u32,
    next_retry_at: Option<Instant>,
}

/// Error returned when the breaker rejects a call outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakerOpen;

/// Outcome of `CircuitBreaker::execute`: distinguishes a fast-fail rejection
/// (the op never ran) from the op itself failing (the breaker still records
/// the failure, but the caller's original error is preserved).
#[derive(Debug)]
pub enum ExecuteError<E> {
    Rejected,
    Failed(E),
}

impl CircuitBreaker {
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            config,
            state: CircuitState::Closed,
            failure_count: 0,
            success_count: 0,
            next_retry_at: None,
        }
    }

    pub fn state(&self) -> CircuitState {
        self.state
    }

    pub fn failure_count(&self) -> u32 {
        self.failure_count
    }

    pub fn success_count(&self) -> u32 {
        self.success_count
    }

    pub fn is_healthy(&self) -> bool {
        self.state != CircuitState::Open
    }

    /// Decide whether a call may proceed right now, advancing
    /// `Open -> HalfOpen` on timer expiry as a side effect.
    fn allow_call(&mut self, car: &str, now: Instant) -> Result<(), BreakerOpen> {
        match self.state {
            CircuitState::Closed => Ok(()),
            CircuitState::Open => {
                let retry_at = self.next_retry_at.unwrap_or(now);
                if now < retry_at {
                    return Err(BreakerOpen);
                }
                let from = self.state;
                self.state = CircuitState::HalfOpen;
                self.success_count = 0;
                self.next_retry_at = None;
                tracing::info!(car, ?from, to = ?self.state, reason = "cooldown_expired", "circuit transition");
                Ok(())
            }
            CircuitState::HalfOpen => {
                if self.success_count >= self.config.half_open_limit {
                    // Probe budget spent; deny further probes until the
                    // in-flight outcome resolves.
                    Err(BreakerOpen)
                } else {
                    Ok(())
                }
            }
        }
    }

    fn on_success(&mut self, car: &str) {
        match self.state {
            CircuitState::Closed => {
                self.failure_count = 0;
            }
            CircuitState::HalfOpen => {
                self.success_count += 1;
                if self.success_count >= self.config.half_open_limit {
                    self.reset_closed(car);
                }
            }
            CircuitState::Open => {}
        }
    }

    fn on_failure(&mut self, car: &str, now: Instant) {
        match self.state {
            CircuitState::Closed => {
                self.failure_count += 1;
                if self.failure_count >= self.config.max_failures {
                    self.trip_open(car, now, "failure_threshold_exceeded");
                }
            }
            CircuitState::HalfOpen => {
                self.trip_open(car, now, "half_open_failure");
            }
            CircuitState::Open => {}
        }
    }

    fn trip_open(&mut self, car: &str, now: Instant, reason: &'static str) {
        let from = self.state;
        self.state = CircuitState::Open;
        self.next_retry_at = Some(now + self.config.reset_timeout);
        self.failure_count = 0;
        self.success_count = 0;
        tracing::warn!(car, ?from, to = ?self.state, reason, "circuit transition");
    }

    fn reset_closed(&mut self, car: &str) {
        let from = self.state;
        self.state = CircuitState::Closed;
        self.failure_count = 0;
        self.success_count = 0;
        self.next_retry_at = None;
        tracing::info!(car, ?from, to = ?self.state, reason = "success_threshold_reached", "circuit transition");
    }

    /// Run `op`, gating it by the breaker state and recording the outcome.
    ///
    /// `car` is used only for structured log context.
    pub async fn execute<F, Fut, T, E>(&mut self, car: &str, op: F) -> Result<T, ExecuteError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
    {
        let now = Instant::now();
        self.allow_call(car, now).map_err(|_| ExecuteError::Rejected)?;
        match op().await {
            Ok(value) => {
                self.on_success(car);
                Ok(value)
            }
            Err(err) => {
                self.on_failure(car, Instant::now());
                Err(ExecuteError::Failed(err))
            }
        }
    }
}

#[cfg(test)]
#[path = "circuit_breaker_tests.rs"]
mod tests;
