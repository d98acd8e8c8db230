// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::RequestBook;
use crate::floor::Direction;

#[test]
fn fresh_book_is_idle() {
    let book = RequestBook::new();
    assert!(book.is_idle());
    assert!(!book.has_up());
    assert!(!book.has_down());
}

#[test]
fn append_then_contains_request() {
    let mut book = RequestBook::new();
    book.append(Direction::Up, 0, 5);
    assert!(book.contains_request(Direction::Up, 0, 5));
    assert!(!book.contains_request(Direction::Up, 0, 6));
    assert!(!book.contains_request(Direction::Down, 0, 5));
    assert!(book.has_up());
    assert!(!book.is_idle());
}

#[test]
fn flush_converts_destinations_into_markers_and_removes_source() {
    let mut book = RequestBook::new();
    book.append(Direction::Up, 0, 5);
    book.append(Direction::Up, 0, 7);
    book.flush(Direction::Up, 0);

    assert!(!book.has_floor(Direction::Up, 0));
    assert!(book.has_floor(Direction::Up, 5));
    assert!(book.has_floor(Direction::Up, 7));
    // Markers are empty-valued, i.e. not treated as further pickups.
    assert!(!book.contains_request(Direction::Up, 5, 5));
}

#[test]
fn flushing_pure_marker_is_a_single_delete_then_noop() {
    let mut book = RequestBook::new();
    book.append(Direction::Up, 0, 5);
    book.flush(Direction::Up, 0); // creates marker at 5
    assert!(book.has_floor(Direction::Up, 5));

    book.flush(Direction::Up, 5); // deletes the marker
    assert!(!book.has_floor(Direction::Up, 5));
    assert!(book.is_idle());

    // Flushing again is a no-op, not a panic or resurrection.
    book.flush(Direction::Up, 5);
    assert!(book.is_idle());
}

#[test]
fn pickup_reappearing_at_an_in_flight_dropoff_floor_survives_flush() {
    // U5: a pickup at a floor currently a drop-off marker must not be lost.
    let mut book = RequestBook::new();
    book.append(Direction::Up, 0, 5);
    book.flush(Direction::Up, 0); // up[5] = [] (marker)

    // A new pickup arrives at 5 before the car flushes there.
    book.append(Direction::Up, 5, 9);
    assert!(book.contains_request(Direction::Up, 5, 9));

    // Flushing 5 now must create a marker for 9, not just vanish the pickup.
    book.flush(Direction::Up, 5);
    assert!(book.has_floor(Direction::Up, 9));
    assert!(!book.is_idle());
}

#[test]
fn smallest_and_largest_key_span_the_book() {
    let mut book = RequestBook::new();
    assert_eq!(book.smallest_key(Direction::Up), None);
    assert_eq!(book.largest_key(Direction::Up), None);

    book.append(Direction::Up, 3, 8);
    book.append(Direction::Up, 1, 2);
    book.append(Direction::Up, 6, 6 + 1);

    assert_eq!(book.smallest_key(Direction::Up), Some(1));
    assert_eq!(book.largest_key(Direction::Up), Some(6));
}

#[test]
fn pending_count_counts_markers_as_one_and_pickups_by_destination_count() {
    let mut book = RequestBook::new();
    book.append(Direction::Up, 0, 5);
    book.append(Direction::Up, 0, 7); // up[0] = [5, 7] -> counts as 2
    assert_eq!(book.pending_count(), 2);

    book.flush(Direction::Up, 0); // up[5] = [], up[7] = [] -> two markers
    assert_eq!(book.pending_count(), 2);

    book.flush(Direction::Up, 5);
    assert_eq!(book.pending_count(), 1);

    book.flush(Direction::Up, 7);
    assert_eq!(book.pending_count(), 0);
    assert!(book.is_idle());
}

#[test]
fn pending_count_for_direction_is_scoped() {
    let mut book = RequestBook::new();
    book.append(Direction::Up, 0, 5);
    book.append(Direction::Down, 9, 2);
    book.append(Direction::Down, 9, 3);
    assert_eq!(book.pending_count_for(Direction::Up), 1);
    assert_eq!(book.pending_count_for(Direction::Down), 2);
}

#[test]
fn up_and_down_books_are_independent() {
    let mut book = RequestBook::new();
    book.append(Direction::Up, 2, 9);
    book.append(Direction::Down, 9, 2);
    assert_eq!(book.pending_count(), 2);
    assert!(book.has_up());
    assert!(book.has_down());

    book.flush(Direction::Up, 2);
    assert!(!book.has_up() || book.has_floor(Direction::Up, 9));
    assert!(book.has_down());
}
