// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-car pickup/drop-off book.
//!
//! A plain set of pending floors would lose the fact that a pickup arriving
//! at a floor the car has just departed (or is about to flush as a pure
//! drop-off) must still be remembered. Keyed maps per direction, where an
//! empty value means "standing drop-off marker" and a non-empty value means
//! "pickup with these destinations", let a fresh pickup coexist with an
//! in-flight drop-off at the same floor and survive a flush.

use std::collections::BTreeMap;

use crate::floor::Direction;

#[derive(Debug, Default, Clone)]
pub struct RequestBook {
    up: BTreeMap<i64, Vec<i64>>,
    down: BTreeMap<i64, Vec<i64>>,
}

impl RequestBook {
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self, dir: Direction) -> &BTreeMap<i64, Vec<i64>> {
        match dir {
            Direction::Up => &self.up,
            Direction::Down => &self.down,
            Direction::Idle | Direction::Deleting => {
                unreachable!("request book is only indexed by Up or Down")
            }
        }
    }

    fn map_mut(&mut self, dir: Direction) -> &mut BTreeMap<i64, Vec<i64>> {
        match dir {
            Direction::Up => &mut self.up,
            Direction::Down => &mut self.down,
            Direction::Idle | Direction::Deleting => {
                unreachable!("request book is only indexed by Up or Down")
            }
        }
    }

    /// Record a pickup at `from` with destination `to`. No validation —
    /// callers are responsible for `from != to` and range checks.
    pub fn append(&mut self, dir: Direction, from: i64, to: i64) {
        self.map_mut(dir).entry(from).or_default().push(to);
    }

    /// Commit arrival at `floor` in direction `dir`: every destination
    /// queued there becomes a fresh drop-off marker (unless already a key),
    /// then the arrival key itself is removed.
    pub fn flush(&mut self, dir: Direction, floor: i64) {
        let destinations = match self.map_mut(dir).remove(&floor) {
            Some(d) => d,
            None => return,
        };
        let map = self.map_mut(dir);
        for dest in destinations {
            map.entry(dest).or_default();
        }
    }

    pub fn has_up(&self) -> bool {
        !self.up.is_empty()
    }

    pub fn has_down(&self) -> bool {
        !self.down.is_empty()
    }

    pub fn is_idle(&self) -> bool {
        self.up.is_empty() && self.down.is_empty()
    }

    pub fn has_floor(&self, dir: Direction, floor: i64) -> bool {
        self.map(dir).contains_key(&floor)
    }

    /// Smallest key present for `dir`, if any.
    pub fn smallest_key(&self, dir: Direction) -> Option<i64> {
        self.map(dir).keys().next().copied()
    }

    /// Largest key present for `dir`, if any.
    pub fn largest_key(&self, dir: Direction) -> Option<i64> {
        self.map(dir).keys().next_back().copied()
    }

    /// Whether the exact trip `from -> to` in direction `dir` is already
    /// queued (used by the dispatcher's existing-trip fast path).
    pub fn contains_request(&self, dir: Direction, from: i64, to: i64) -> bool {
        self.map(dir).get(&from).is_some_and(|dests| dests.contains(&to))
    }

    /// Sum over all entries of `max(len(destinations), 1)`: every standing
    /// drop-off marker counts as one pending stop, every pickup counts its
    /// distinct destinations.
    pub fn pending_count(&self) -> usize {
        self.pending_count_for(Direction::Up) + self.pending_count_for(Direction::Down)
    }

    /// Pending count restricted to a single direction's map, used by the
    /// dispatcher's opposite-direction tie-break (§4.5d).
    pub fn pending_count_for(&self, dir: Direction) -> usize {
        self.map(dir).values().map(|dests| dests.len().max(1)).sum()
    }
}

#[cfg(test)]
#[path = "request_book_tests.rs"]
mod tests;
