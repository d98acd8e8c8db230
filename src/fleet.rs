// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fleet dispatcher: holds cars, selects one for an incoming request, and
//! coordinates car lifecycle (add/delete).

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexMap;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::car::{Car, CarConfig};
use crate::config::FleetConfig;
use crate::error::CoreError;
use crate::floor::{Direction, Floor};
use crate::health::{epoch_millis, CarHealth, FleetHealth};
use crate::metrics::{FleetCounters, FleetMetrics};

/// Status shape for a single car, per §6.
#[derive(Debug, Clone, Serialize)]
pub struct CarStatus {
    pub name: String,
    pub current_floor: i64,
    pub direction: Direction,
    pub requests: usize,
    pub min_floor: i64,
    pub max_floor: i64,
    pub is_deleting: bool,
}

/// Ordered collection of cars keyed by name, plus the dispatcher that routes
/// new requests to them.
pub struct Fleet {
    cars: RwLock<IndexMap<String, Arc<Car>>>,
    config: FleetConfig,
    counters: FleetCounters,
}

impl Fleet {
    pub fn new(config: FleetConfig) -> Self {
        Self { cars: RwLock::new(IndexMap::new()), config, counters: FleetCounters::default() }
    }

    pub fn config(&self) -> &FleetConfig {
        &self.config
    }

    /// Add a car to the fleet and start its event loop. Overrides fall back
    /// to the fleet's configured defaults when omitted.
    pub async fn add(
        &self,
        name: String,
        min_floor: i64,
        max_floor: i64,
        floor_traversal: Option<Duration>,
        door_open: Option<Duration>,
        overload_threshold: Option<usize>,
    ) -> Result<(), CoreError> {
        if name.trim().is_empty() {
            return Err(CoreError::validation("car name must not be empty"));
        }
        if min_floor >= max_floor {
            return Err(CoreError::validation(format!(
                "minFloor ({min_floor}) must be less than maxFloor ({max_floor})"
            )));
        }
        if !self.config.in_absolute_limits(min_floor) || !self.config.in_absolute_limits(max_floor) {
            return Err(CoreError::validation(format!(
                "car range [{min_floor}, {max_floor}] exceeds absolute limits [{}, {}]",
                self.config.min_floor_limit, self.config.max_floor_limit
            )));
        }

        let mut cars = self.cars.write().await;
        if cars.contains_key(&name) {
            return Err(CoreError::conflict(format!("car {name} already exists")));
        }

        let car_config = CarConfig {
            floor_traversal: floor_traversal.unwrap_or_else(|| self.config.floor_traversal()),
            door_open: door_open.unwrap_or_else(|| self.config.door_open()),
            operation_timeout: self.config.operation_timeout(),
            overload_threshold: overload_threshold.unwrap_or(self.config.overload_threshold),
            breaker: self.config.breaker_config(),
        };
        let car = Car::spawn(name.clone(), min_floor, max_floor, car_config);
        cars.insert(name, car);
        self.counters.record_car_added();
        Ok(())
    }

    /// Gracefully delete a car: mark it `Deleting`, wait for its request
    /// book to drain, then remove it and stop its event loop.
    pub async fn delete(&self, name: &str) -> Result<(), CoreError> {
        let car = {
            let cars = self.cars.read().await;
            match cars.get(name) {
                Some(car) => Arc::clone(car),
                None => return Err(CoreError::not_found(format!("car {name} not found"))),
            }
        };
        if car.is_deleting().await {
            return Err(CoreError::conflict(format!("car {name} is already deleting")));
        }
        car.mark_for_deletion().await;

        let drained = tokio::time::timeout(self.config.delete_timeout(), async {
            let mut interval = tokio::time::interval(self.config.delete_poll_interval());
            loop {
                interval.tick().await;
                if car.is_idle().await {
                    return;
                }
            }
        })
        .await;

        if drained.is_err() {
            return Err(CoreError::internal(format!(
                "car {name} did not drain within the delete timeout"
            )));
        }

        car.shutdown();
        self.cars.write().await.shift_remove(name);
        self.counters.record_car_deleted();
        Ok(())
    }

    /// Route a pickup→destination request to a car, per §4.5.
    pub async fn request_elevator(&self, from: i64, to: i64) -> Result<String, CoreError> {
        self.counters.record_request();
        match self.request_elevator_inner(from, to).await {
            Ok(name) => Ok(name),
            Err(err) => {
                self.counters.record_request_failed();
                Err(err)
            }
        }
    }

    async fn request_elevator_inner(&self, from: i64, to: i64) -> Result<String, CoreError> {
        if from == to {
            return Err(CoreError::validation("from and to must differ"));
        }
        let dir = if from < to { Direction::Up } else { Direction::Down };

        let snapshot: Vec<Arc<Car>> = self.cars.read().await.values().cloned().collect();
        if snapshot.is_empty() {
            return Err(CoreError::internal("no elevators available"));
        }

        for car in &snapshot {
            if car.contains_request(dir, from, to).await {
                return Ok(car.name().to_owned());
            }
        }

        let selected = tokio::time::timeout(
            self.config.selection_timeout(),
            select_car(&snapshot, dir, from, to),
        )
        .await
        .map_err(|_| CoreError::internal("selection timed out"))??;

        if !selected.in_range(from) || !selected.in_range(to) {
            return Err(CoreError::validation(format!(
                "selected car {} cannot service floors {from}/{to}",
                selected.name()
            )));
        }

        selected.request(dir, from, to).await;
        Ok(selected.name().to_owned())
    }

    /// Snapshot of every car's externally visible status, per §6.
    pub async fn status(&self) -> Result<BTreeMap<String, CarStatus>, CoreError> {
        tokio::time::timeout(self.config.status_timeout(), async {
            let cars: Vec<Arc<Car>> = self.cars.read().await.values().cloned().collect();
            let mut out = BTreeMap::new();
            for car in cars {
                let snap = car.snapshot().await;
                let pending = car.pending_count().await;
                out.insert(
                    snap.name.clone(),
                    CarStatus {
                        name: snap.name,
                        current_floor: snap.current_floor,
                        direction: snap.direction,
                        requests: pending,
                        min_floor: snap.min_floor,
                        max_floor: snap.max_floor,
                        is_deleting: snap.is_deleting,
                    },
                );
            }
            out
        })
        .await
        .map_err(|_| CoreError::internal("status collection timed out"))
    }

    /// Fleet-wide health verdict, per §4.6.
    pub async fn health(&self) -> Result<FleetHealth, CoreError> {
        tokio::time::timeout(self.config.status_timeout(), async {
            let cars: Vec<Arc<Car>> = self.cars.read().await.values().cloned().collect();
            let mut per_elevator = BTreeMap::new();
            let mut healthy = 0usize;
            let mut active_requests = 0usize;
            for car in cars {
                let is_healthy = car.is_healthy().await;
                if is_healthy {
                    healthy += 1;
                }
                let pending = car.pending_count().await;
                active_requests += pending;
                per_elevator.insert(
                    car.name().to_owned(),
                    CarHealth {
                        is_healthy,
                        circuit_breaker_state: car.breaker_state().await,
                        pending_requests: pending,
                        current_floor: car.current_floor().await,
                        direction: car.direction().await,
                        min_floor: car.min_floor(),
                        max_floor: car.max_floor(),
                    },
                );
            }
            let total = per_elevator.len();
            FleetHealth {
                total_elevators: total,
                healthy_elevators: healthy,
                active_requests,
                system_healthy: total == 0 || healthy > 0,
                timestamp: epoch_millis(),
                per_elevator,
            }
        })
        .await
        .map_err(|_| CoreError::internal("health collection timed out"))
    }

    /// Point-in-time counters snapshot. Not subject to the status timeout —
    /// a cheap atomic read.
    pub async fn metrics(&self) -> FleetMetrics {
        let total = self.cars.read().await.len();
        self.counters.snapshot(total)
    }
}

/// The selection algorithm of §4.5, run under the dispatcher's bounded
/// timeout. Partitions in-range, non-deleting, non-overloaded cars into
/// idle and moving groups and picks among them in the documented order.
async fn select_car(
    cars: &[Arc<Car>],
    dir: Direction,
    from: i64,
    to: i64,
) -> Result<Arc<Car>, CoreError> {
    let mut idle: Vec<(Arc<Car>, i64)> = Vec::new();
    let mut moving_same_eligible: Vec<(Arc<Car>, i64)> = Vec::new();
    let mut moving_opposite: Vec<Arc<Car>> = Vec::new();
    let mut moving_total = 0usize;

    for car in cars {
        if car.is_deleting().await {
            continue;
        }
        if !car.in_range(from) || !car.in_range(to) {
            continue;
        }
        if car.is_overloaded().await {
            continue;
        }

        let floor = car.current_floor().await;
        let car_dir = car.direction().await;
        match car_dir {
            Direction::Idle => idle.push((Arc::clone(car), floor)),
            Direction::Up | Direction::Down => {
                moving_total += 1;
                if car_dir == dir {
                    let passed = match dir {
                        Direction::Up => floor > from,
                        Direction::Down => floor < from,
                        _ => unreachable!("dir is always Up or Down"),
                    };
                    if !passed {
                        moving_same_eligible.push((Arc::clone(car), floor));
                    }
                } else {
                    moving_opposite.push(Arc::clone(car));
                }
            }
            Direction::Deleting => unreachable!("deleting cars are filtered above"),
        }
    }

    if let Some((car, _)) =
        idle.into_iter().min_by_key(|(_, floor)| Floor(*floor).distance(Floor(from)))
    {
        return Ok(car);
    }

    if moving_total == 0 {
        return Err(CoreError::validation("floors out of range for all cars"));
    }

    if let Some((car, _)) = moving_same_eligible
        .into_iter()
        .min_by_key(|(_, floor)| Floor(*floor).distance(Floor(from)))
    {
        return Ok(car);
    }

    if !moving_opposite.is_empty() {
        if let [only] = moving_opposite.as_slice() {
            return Ok(Arc::clone(only));
        }
        let mut best: Option<(Arc<Car>, usize, usize)> = None;
        for car in moving_opposite {
            let dir_pending = car.pending_count_for(dir).await;
            let total_pending = car.pending_count().await;
            let candidate = (car, dir_pending, total_pending);
            best = Some(match best {
                None => candidate,
                Some(current) => {
                    if (candidate.1, candidate.2) < (current.1, current.2) {
                        candidate
                    } else {
                        current
                    }
                }
            });
        }
        if let Some((car, _, _)) = best {
            return Ok(car);
        }
    }

    Err(CoreError::validation("no elevator available"))
}

#[cfg(test)]
#[path = "fleet_tests.rs"]
mod tests;
