// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{Direction, Floor};

#[test]
fn distance_is_symmetric() {
    assert_eq!(Floor(3).distance(Floor(7)), 4);
    assert_eq!(Floor(7).distance(Floor(3)), 4);
    assert_eq!(Floor(-2).distance(Floor(5)), 7);
}

#[test]
fn ordering_matches_integer_ordering() {
    let mut floors = vec![Floor(5), Floor(-1), Floor(3)];
    floors.sort();
    assert_eq!(floors, vec![Floor(-1), Floor(3), Floor(5)]);
}

#[test]
fn direction_opposite_is_involution() {
    assert_eq!(Direction::Up.opposite(), Direction::Down);
    assert_eq!(Direction::Down.opposite(), Direction::Up);
    assert_eq!(Direction::Idle.opposite(), Direction::Idle);
    assert_eq!(Direction::Deleting.opposite(), Direction::Deleting);
}

#[test]
fn only_up_and_down_are_moving() {
    assert!(Direction::Up.is_moving());
    assert!(Direction::Down.is_moving());
    assert!(!Direction::Idle.is_moving());
    assert!(!Direction::Deleting.is_moving());
}

#[test]
fn wire_str_matches_status_shape() {
    assert_eq!(Direction::Up.as_wire_str(), "up");
    assert_eq!(Direction::Down.as_wire_str(), "down");
    assert_eq!(Direction::Idle.as_wire_str(), "");
    assert_eq!(Direction::Deleting.as_wire_str(), "deleting");
}

#[test]
fn json_serialization_uses_wire_str_not_the_derived_variant_name() {
    assert_eq!(serde_json::to_string(&Direction::Up).expect("serialize"), "\"up\"");
    assert_eq!(serde_json::to_string(&Direction::Down).expect("serialize"), "\"down\"");
    assert_eq!(serde_json::to_string(&Direction::Idle).expect("serialize"), "\"\"");
    assert_eq!(serde_json::to_string(&Direction::Deleting).expect("serialize"), "\"deleting\"");
}
