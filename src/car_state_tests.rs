// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::CarState;
use crate::floor::Direction;

#[tokio::test]
async fn starts_idle_at_min_floor() {
    let state = CarState::new("A", 0, 10);
    assert_eq!(state.current_floor().await, 0);
    assert_eq!(state.direction().await, Direction::Idle);
    assert!(state.is_at_bottom().await);
    assert!(!state.is_at_top().await);
}

#[tokio::test]
async fn in_range_checks_inclusive_bounds() {
    let state = CarState::new("A", 0, 10);
    assert!(state.in_range(0));
    assert!(state.in_range(10));
    assert!(!state.in_range(-1));
    assert!(!state.in_range(11));
}

#[tokio::test]
async fn mark_for_deletion_is_terminal_in_snapshot() {
    let state = CarState::new("A", 0, 10);
    state.mark_for_deletion().await;
    let snap = state.snapshot().await;
    assert!(snap.is_deleting);
    assert_eq!(snap.direction, Direction::Deleting);
    assert!(state.is_deleting().await);
}

#[tokio::test]
async fn set_current_floor_updates_top_bottom_checks() {
    let state = CarState::new("A", 0, 10);
    state.set_current_floor(10).await;
    assert!(state.is_at_top().await);
    assert!(!state.is_at_bottom().await);
}
