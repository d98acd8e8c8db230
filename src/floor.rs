// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded floor and direction value types.

use serde::{Deserialize, Serialize};

/// A building floor, bounded by the fleet's configured absolute limits.
///
/// `Floor` carries no bounds of its own — range validation against a car's
/// or the fleet's limits happens where the bounds are known (`CarState`,
/// `FleetConfig`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Floor(pub i64);

impl Floor {
    pub fn distance(self, other: Floor) -> i64 {
        (self.0 - other.0).abs()
    }
}

impl std::fmt::Display for Floor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Floor {
    fn from(value: i64) -> Self {
        Floor(value)
    }
}

/// A car's direction of travel, including the two lifecycle states that
/// aren't really "travel" at all.
///
/// `Deleting` is distinct from `Idle` so a draining car can be excluded from
/// dispatch without losing the ability to finish work already on its book.
///
/// `Serialize` is hand-written rather than derived: the §6 wire shape wants
/// `Idle` to serialize as an empty string, not `"idle"`, which
/// `#[serde(rename_all = "lowercase")]` cannot express for a single variant
/// without also changing how `Deserialize` reads it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Idle,
    Deleting,
}

impl Serialize for Direction {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_wire_str())
    }
}

impl Direction {
    pub fn is_moving(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            other => other,
        }
    }

    /// Wire-facing label, matching the §6 status shape
    /// (`up`, `down`, `""`, `deleting`).
    pub fn as_wire_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Idle => "",
            Direction::Deleting => "deleting",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Idle => "idle",
            Direction::Deleting => "deleting",
        })
    }
}

#[cfg(test)]
#[path = "floor_tests.rs"]
mod tests;
