// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration for the elevator fleet service.

use std::time::Duration;

use crate::circuit_breaker::CircuitBreakerConfig;

/// Configuration for the elevator fleet service.
#[derive(Debug, Clone, clap::Parser)]
pub struct FleetConfig {
    /// Host to bind on.
    #[arg(long, default_value = "127.0.0.1", env = "ELEVATOR_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 8080, env = "ELEVATOR_PORT")]
    pub port: u16,

    /// Absolute lowest floor any car may be declared with.
    #[arg(long, default_value_t = -100, env = "ELEVATOR_MIN_FLOOR_LIMIT")]
    pub min_floor_limit: i64,

    /// Absolute highest floor any car may be declared with.
    #[arg(long, default_value_t = 200, env = "ELEVATOR_MAX_FLOOR_LIMIT")]
    pub max_floor_limit: i64,

    /// Time to travel between adjacent floors, in milliseconds.
    #[arg(long, default_value_t = 1000, env = "ELEVATOR_FLOOR_TRAVERSAL_MS")]
    pub floor_traversal_ms: u64,

    /// Time doors remain open at a stop, in milliseconds.
    #[arg(long, default_value_t = 2000, env = "ELEVATOR_DOOR_OPEN_MS")]
    pub door_open_ms: u64,

    /// Default pending-request threshold past which a car is excluded from
    /// dispatcher selection.
    #[arg(long, default_value_t = 8, env = "ELEVATOR_OVERLOAD_THRESHOLD")]
    pub overload_threshold: usize,

    /// Timeout guarding a single `Car::step`, wrapped by the circuit breaker.
    #[arg(long, default_value_t = 10000, env = "ELEVATOR_OPERATION_TIMEOUT_MS")]
    pub operation_timeout_ms: u64,

    /// Consecutive step failures before a car's breaker trips open.
    #[arg(long, default_value_t = 3, env = "ELEVATOR_BREAKER_MAX_FAILURES")]
    pub breaker_max_failures: u32,

    /// Cooldown before an open breaker allows a half-open probe, in
    /// milliseconds.
    #[arg(long, default_value_t = 30000, env = "ELEVATOR_BREAKER_RESET_TIMEOUT_MS")]
    pub breaker_reset_timeout_ms: u64,

    /// Consecutive half-open successes required to close the breaker.
    #[arg(long, default_value_t = 1, env = "ELEVATOR_BREAKER_HALF_OPEN_LIMIT")]
    pub breaker_half_open_limit: u32,

    /// Wall-clock bound on the dispatcher's car-selection step, in
    /// milliseconds.
    #[arg(long, default_value_t = 250, env = "ELEVATOR_SELECTION_TIMEOUT_MS")]
    pub selection_timeout_ms: u64,

    /// Bound on how long `Fleet::delete` polls a draining car before giving
    /// up, in milliseconds.
    #[arg(long, default_value_t = 30000, env = "ELEVATOR_DELETE_TIMEOUT_MS")]
    pub delete_timeout_ms: u64,

    /// Poll interval `Fleet::delete` uses while waiting for a car to drain,
    /// in milliseconds.
    #[arg(long, default_value_t = 50, env = "ELEVATOR_DELETE_POLL_MS")]
    pub delete_poll_ms: u64,

    /// Wall-clock bound on `Fleet::status`/`Fleet::health`, in milliseconds.
    #[arg(long, default_value_t = 250, env = "ELEVATOR_STATUS_TIMEOUT_MS")]
    pub status_timeout_ms: u64,

    /// Interval at which `/ws/status` pushes snapshots, in milliseconds.
    #[arg(long, default_value_t = 500, env = "ELEVATOR_WS_STATUS_INTERVAL_MS")]
    pub ws_status_interval_ms: u64,
}

impl FleetConfig {
    pub fn floor_traversal(&self) -> Duration {
        Duration::from_millis(self.floor_traversal_ms)
    }

    pub fn door_open(&self) -> Duration {
        Duration::from_millis(self.door_open_ms)
    }

    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }

    pub fn selection_timeout(&self) -> Duration {
        Duration::from_millis(self.selection_timeout_ms)
    }

    pub fn delete_timeout(&self) -> Duration {
        Duration::from_millis(self.delete_timeout_ms)
    }

    pub fn delete_poll_interval(&self) -> Duration {
        Duration::from_millis(self.delete_poll_ms)
    }

    pub fn status_timeout(&self) -> Duration {
        Duration::from_millis(self.status_timeout_ms)
    }

    pub fn ws_status_interval(&self) -> Duration {
        Duration::from_millis(self.ws_status_interval_ms)
    }

    pub fn breaker_config(&self) -> CircuitBreakerConfig {
        CircuitBreakerConfig {
            max_failures: self.breaker_max_failures,
            reset_timeout: Duration::from_millis(self.breaker_reset_timeout_ms),
            half_open_limit: self.breaker_half_open_limit,
        }
    }

    /// Whether `floor` lies within the configured absolute limits (not a
    /// specific car's range, which is narrower).
    pub fn in_absolute_limits(&self, floor: i64) -> bool {
        floor >= self.min_floor_limit && floor <= self.max_floor_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn defaults_parse_from_empty_args() {
        let config = FleetConfig::parse_from(["elevator-fleet"]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.min_floor_limit, -100);
        assert_eq!(config.max_floor_limit, 200);
        assert!(config.in_absolute_limits(0));
        assert!(!config.in_absolute_limits(500));
    }
}
