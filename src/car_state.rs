// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mutable per-car position/direction/bounds under a reader-writer discipline.

use serde::Serialize;
use tokio::sync::RwLock;

use crate::floor::Direction;

/// Immutable snapshot of a car's position and lifecycle, safe to hand out
/// to readers without holding any lock.
#[derive(Debug, Clone, Serialize)]
pub struct CarSnapshot {
    pub name: String,
    pub current_floor: i64,
    pub direction: Direction,
    pub min_floor: i64,
    pub max_floor: i64,
    pub is_deleting: bool,
}

#[derive(Debug)]
struct Fields {
    current_floor: i64,
    /// Motion direction only: never set to `Direction::Deleting`. Lifecycle
    /// is tracked separately in `deleting` so a draining car keeps reporting
    /// the direction it's finishing its sweep in everywhere except the
    /// externally-visible snapshot, which overrides to `Deleting`.
    direction: Direction,
    deleting: bool,
}

/// Reader-writer guarded car position, bounds, and lifecycle direction.
///
/// `name`, `min_floor`, and `max_floor` are fixed at construction and never
/// mutated, so they live outside the lock; only `current_floor`, `direction`,
/// and `deleting` change over the car's lifetime.
pub struct CarState {
    name: String,
    min_floor: i64,
    max_floor: i64,
    fields: RwLock<Fields>,
}

impl CarState {
    pub fn new(name: impl Into<String>, min_floor: i64, max_floor: i64) -> Self {
        Self {
            name: name.into(),
            min_floor,
            max_floor,
            fields: RwLock::new(Fields {
                current_floor: min_floor,
                direction: Direction::Idle,
                deleting: false,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn min_floor(&self) -> i64 {
        self.min_floor
    }

    pub fn max_floor(&self) -> i64 {
        self.max_floor
    }

    pub fn in_range(&self, floor: i64) -> bool {
        floor >= self.min_floor && floor <= self.max_floor
    }

    pub async fn current_floor(&self) -> i64 {
        self.fields.read().await.current_floor
    }

    /// Motion direction (`Up`/`Down`/`Idle`), ignoring the deletion flag.
    pub async fn direction(&self) -> Direction {
        self.fields.read().await.direction
    }

    pub async fn is_at_top(&self) -> bool {
        self.fields.read().await.current_floor == self.max_floor
    }

    pub async fn is_at_bottom(&self) -> bool {
        self.fields.read().await.current_floor == self.min_floor
    }

    pub async fn is_deleting(&self) -> bool {
        self.fields.read().await.deleting
    }

    pub async fn set_direction(&self, direction: Direction) {
        debug_assert!(direction.is_moving() || direction == Direction::Idle);
        self.fields.write().await.direction = direction;
    }

    pub async fn set_current_floor(&self, floor: i64) {
        debug_assert!(self.in_range(floor), "car {} moved out of range to {floor}", self.name);
        self.fields.write().await.current_floor = floor;
    }

    pub async fn mark_for_deletion(&self) {
        self.fields.write().await.deleting = true;
    }

    pub async fn snapshot(&self) -> CarSnapshot {
        let fields = self.fields.read().await;
        let direction = if fields.deleting { Direction::Deleting } else { fields.direction };
        CarSnapshot {
            name: self.name.clone(),
            current_floor: fields.current_floor,
            direction,
            min_floor: self.min_floor,
            max_floor: self.max_floor,
            is_deleting: fields.deleting,
        }
    }
}

#[cfg(test)]
#[path = "car_state_tests.rs"]
mod tests;
