// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use tokio::sync::mpsc;

use super::{Car, CarConfig};
use crate::circuit_breaker::{CircuitBreakerConfig, CircuitState};
use crate::floor::Direction;

fn test_config() -> CarConfig {
    CarConfig {
        floor_traversal: Duration::from_millis(1),
        door_open: Duration::from_millis(1),
        operation_timeout: Duration::from_secs(5),
        overload_threshold: 100,
        breaker: CircuitBreakerConfig {
            max_failures: 100,
            reset_timeout: Duration::from_secs(30),
            half_open_limit: 1,
        },
    }
}

/// A car with no event loop attached — tests drive `step()` directly so
/// scenario traces are deterministic instead of racing a background task.
fn bare_car(name: &str, min: i64, max: i64, config: CarConfig) -> Car {
    let (tx, _rx) = mpsc::channel(10);
    Car::new(name, min, max, config, tx)
}

async fn run_until_idle(car: &Car, max_steps: usize) {
    for _ in 0..max_steps {
        if car.state.direction().await == Direction::Idle {
            return;
        }
        car.step().await;
    }
    panic!("car did not settle idle within {max_steps} steps");
}

#[tokio::test]
async fn s1_single_pickup_reaches_destination_then_idles() {
    let car = bare_car("A", 0, 10, test_config());
    car.request(Direction::Up, 0, 3).await;

    run_until_idle(&car, 20).await;

    assert_eq!(car.state.current_floor().await, 3);
    assert_eq!(car.state.direction().await, Direction::Idle);
    assert_eq!(car.pending_count().await, 0);
}

#[tokio::test]
async fn s2_same_floor_pickup_arriving_mid_sweep_is_not_lost() {
    let car = bare_car("A", 0, 10, test_config());
    car.request(Direction::Up, 0, 5).await;

    // First step flushes the floor-0 pickup and advances to 1; second
    // advances to 2 — matching "at floor 2" in the scenario.
    car.step().await;
    car.step().await;
    assert_eq!(car.state.current_floor().await, 2);

    car.request(Direction::Up, 0, 7).await;
    run_until_idle(&car, 50).await;

    assert_eq!(car.state.current_floor().await, 7);
    assert_eq!(car.state.direction().await, Direction::Idle);
    assert_eq!(car.pending_count().await, 0);
}

#[tokio::test]
async fn s3_overshoot_recovers_via_pivot() {
    let car = bare_car("A", 0, 10, test_config());
    car.state.set_current_floor(7).await;
    car.state.set_direction(Direction::Up).await;
    car.book.write().await.append(Direction::Up, 3, 5);

    run_until_idle(&car, 50).await;

    assert_eq!(car.state.current_floor().await, 5);
    assert_eq!(car.state.direction().await, Direction::Idle);
    assert_eq!(car.pending_count().await, 0);
}

#[tokio::test]
async fn idle_car_heads_toward_pickup_before_its_own_direction() {
    let car = bare_car("A", 0, 10, test_config());
    car.state.set_current_floor(5).await;

    // Caller wants to go Down (8 -> 2), but the car must first go Up to
    // reach the pickup floor 8.
    car.request(Direction::Down, 8, 2).await;

    assert_eq!(car.state.direction().await, Direction::Up);
    assert!(car.book.read().await.has_floor(Direction::Down, 8));
}

#[tokio::test]
async fn idle_car_matches_caller_direction_when_already_correct() {
    let car = bare_car("A", 0, 10, test_config());
    car.state.set_current_floor(5).await;

    // Caller wants Up (8 -> 9); 8 is already above the car, so no detour.
    car.request(Direction::Up, 8, 9).await;

    assert_eq!(car.state.direction().await, Direction::Up);
}

#[tokio::test]
async fn repeated_operation_timeouts_trip_the_breaker() {
    let config = CarConfig {
        floor_traversal: Duration::from_millis(20),
        door_open: Duration::from_millis(20),
        // Shorter than a single floor traversal tick: every step times out.
        operation_timeout: Duration::from_millis(1),
        overload_threshold: 100,
        breaker: CircuitBreakerConfig {
            max_failures: 2,
            reset_timeout: Duration::from_millis(50),
            half_open_limit: 1,
        },
    };
    let car = Car::spawn("A", 0, 10, config);
    car.request(Direction::Up, 0, 5).await;

    let mut tripped = false;
    for _ in 0..100 {
        tokio::time::sleep(Duration::from_millis(5)).await;
        if !car.is_healthy().await {
            tripped = true;
            break;
        }
    }

    assert!(tripped, "breaker never tripped despite sustained step timeouts");
    assert_eq!(car.breaker_state().await, CircuitState::Open);
    car.shutdown();
}
