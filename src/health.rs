// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pure snapshot reader producing a fleet-wide health verdict.
//!
//! A car is healthy iff its breaker is not `Open`; the fleet as a whole is
//! healthy iff it has no cars yet (nothing can be unhealthy) or at least one
//! of its cars is healthy.

use std::time::SystemTime;

use serde::Serialize;

use crate::circuit_breaker::CircuitState;
use crate::floor::Direction;

/// Health snapshot for a single car, as reported in `FleetHealth::per_car`.
#[derive(Debug, Clone, Serialize)]
pub struct CarHealth {
    pub is_healthy: bool,
    pub circuit_breaker_state: CircuitState,
    pub pending_requests: usize,
    pub current_floor: i64,
    pub direction: Direction,
    pub min_floor: i64,
    pub max_floor: i64,
}

/// Fleet-wide health, per §4.6/§6.
#[derive(Debug, Clone, Serialize)]
pub struct FleetHealth {
    pub total_elevators: usize,
    pub healthy_elevators: usize,
    pub active_requests: usize,
    pub system_healthy: bool,
    pub timestamp: u64,
    pub per_elevator: std::collections::BTreeMap<String, CarHealth>,
}

pub(crate) fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_healthy_with_zero_cars() {
        let health = FleetHealth {
            total_elevators: 0,
            healthy_elevators: 0,
            active_requests: 0,
            system_healthy: true,
            timestamp: 0,
            per_elevator: Default::default(),
        };
        assert!(health.system_healthy);
    }
}
