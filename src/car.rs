// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-car motion engine: a LOOK-style scheduler driven by an async event
//! loop, one per car, talked to via `request`/`shutdown`/`mark_for_deletion`.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

use crate::car_state::{CarSnapshot, CarState};
use crate::circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState, ExecuteError};
use crate::floor::Direction;
use crate::request_book::RequestBook;

/// Capacity of the per-car wake channel. Deliberately small: the channel
/// exists only to coalesce many wakeups into "the worker should iterate
/// at least once more", not to queue up work.
const SIGNAL_CHANNEL_CAPACITY: usize = 10;

#[derive(Debug, Clone, Copy)]
pub struct CarConfig {
    pub floor_traversal: Duration,
    pub door_open: Duration,
    pub operation_timeout: Duration,
    pub overload_threshold: usize,
    pub breaker: CircuitBreakerConfig,
}

/// Whether a completed `Step` left more work for the event loop to pick up
/// immediately, or the car settled (idle, or waiting for an external signal).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepOutcome {
    Resignal,
    Settled,
}

/// Marker error: the circuit breaker's guarded operation timeout elapsed
/// before `Car::step` returned. Carries no detail — the breaker only needs
/// to know success/failure.
#[derive(Debug, Clone, Copy)]
struct StepTimedOut;

/// A single elevator car: owned state, request book, and fault boundary,
/// driven by a dedicated background task.
pub struct Car {
    state: CarState,
    book: tokio::sync::RwLock<RequestBook>,
    breaker: Mutex<CircuitBreaker>,
    config: CarConfig,
    signal_tx: mpsc::Sender<()>,
    cancel: CancellationToken,
}

impl Car {
    fn new(
        name: impl Into<String>,
        min_floor: i64,
        max_floor: i64,
        config: CarConfig,
        signal_tx: mpsc::Sender<()>,
    ) -> Self {
        Car {
            state: CarState::new(name, min_floor, max_floor),
            book: tokio::sync::RwLock::new(RequestBook::new()),
            breaker: Mutex::new(CircuitBreaker::new(config.breaker)),
            config,
            signal_tx,
            cancel: CancellationToken::new(),
        }
    }

    /// Construct a car and spawn its event loop task. The returned `Arc`
    /// is the handle the fleet keeps; dropping it does not stop the loop —
    /// call `shutdown()` for that.
    pub fn spawn(name: impl Into<String>, min_floor: i64, max_floor: i64, config: CarConfig) -> Arc<Car> {
        let (signal_tx, signal_rx) = mpsc::channel(SIGNAL_CHANNEL_CAPACITY);
        let car = Arc::new(Car::new(name, min_floor, max_floor, config, signal_tx));
        tokio::spawn(event_loop(Arc::clone(&car), signal_rx));
        car
    }

    pub fn name(&self) -> &str {
        self.state.name()
    }

    pub fn min_floor(&self) -> i64 {
        self.state.min_floor()
    }

    pub fn max_floor(&self) -> i64 {
        self.state.max_floor()
    }

    pub fn in_range(&self, floor: i64) -> bool {
        self.state.in_range(floor)
    }

    pub async fn current_floor(&self) -> i64 {
        self.state.current_floor().await
    }

    pub async fn direction(&self) -> Direction {
        self.state.direction().await
    }

    pub async fn is_deleting(&self) -> bool {
        self.state.is_deleting().await
    }

    pub async fn snapshot(&self) -> CarSnapshot {
        self.state.snapshot().await
    }

    pub async fn contains_request(&self, dir: Direction, from: i64, to: i64) -> bool {
        self.book.read().await.contains_request(dir, from, to)
    }

    pub async fn pending_count(&self) -> usize {
        self.book.read().await.pending_count()
    }

    pub async fn pending_count_for(&self, dir: Direction) -> usize {
        self.book.read().await.pending_count_for(dir)
    }

    pub async fn is_overloaded(&self) -> bool {
        self.pending_count().await > self.config.overload_threshold
    }

    pub async fn breaker_state(&self) -> CircuitState {
        self.breaker.lock().await.state()
    }

    pub async fn is_healthy(&self) -> bool {
        self.breaker.lock().await.is_healthy()
    }

    async fn is_book_idle(&self) -> bool {
        self.book.read().await.is_idle()
    }

    /// Whether the request book is empty, i.e. the car has no pending
    /// pickups or standing drop-offs left to serve. Used by `Fleet::delete`
    /// to poll for a safe drain point.
    pub async fn is_idle(&self) -> bool {
        self.is_book_idle().await
    }

    /// Record a pickup and wake the event loop. `dir` is the caller's
    /// direction of travel (`from < to` ⇒ `Up`), not necessarily the
    /// direction the car ends up moving first.
    pub async fn request(&self, dir: Direction, from: i64, to: i64) {
        if self.state.direction().await == Direction::Idle {
            // A car standing idle may need to head the "wrong" way first to
            // reach the pickup floor before it can serve the request's
            // actual direction.
            let initial = match dir {
                Direction::Up if from < self.state.current_floor().await => Direction::Down,
                Direction::Down if from > self.state.current_floor().await => Direction::Up,
                _ => dir,
            };
            self.state.set_direction(initial).await;
        }
        self.book.write().await.append(dir, from, to);
        let _ = self.signal_tx.try_send(());
    }

    /// Mark the car as draining: excluded from dispatch, but still serviced
    /// by the event loop until its book empties.
    pub async fn mark_for_deletion(&self) {
        self.state.mark_for_deletion().await;
    }

    /// Cancel the event loop. In-flight suspensions (floor/door waits, the
    /// breaker-guarded step) unwind promptly without further state change.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// One iteration of the LOOK scheduler, per spec §4.4. Always waits one
    /// `floor_traversal` tick first (the only non-door suspension point,
    /// besides the breaker's own timeout), then applies the first matching
    /// rule for the car's current direction.
    async fn step(&self) -> StepOutcome {
        tokio::select! {
            _ = self.cancel.cancelled() => return StepOutcome::Settled,
            _ = tokio::time::sleep(self.config.floor_traversal) => {}
        }
        if self.cancel.is_cancelled() {
            return StepOutcome::Settled;
        }

        match self.state.direction().await {
            Direction::Up => self.step_up().await,
            Direction::Down => self.step_down().await,
            Direction::Idle | Direction::Deleting => StepOutcome::Settled,
        }
    }

    /// Open doors, wait `door_open`, and flush `dir` at `floor`. A
    /// cancellation during the wait leaves the book untouched — the flush
    /// is the state change, and it only happens after the wait completes.
    async fn open_and_flush(&self, dir: Direction, floor: i64) {
        tokio::select! {
            _ = self.cancel.cancelled() => return,
            _ = tokio::time::sleep(self.config.door_open) => {}
        }
        if self.cancel.is_cancelled() {
            return;
        }
        self.book.write().await.flush(dir, floor);
        tracing::debug!(car = self.name(), floor, direction = %dir, "doors cycled, flushed");
    }

    async fn settle_or_idle(&self) -> StepOutcome {
        if self.is_book_idle().await {
            self.state.set_direction(Direction::Idle).await;
        }
        StepOutcome::Settled
    }

    /// Rules 1, 2, 6, 7 — the up-moving half of the scheduler.
    async fn step_up(&self) -> StepOutcome {
        let floor = self.state.current_floor().await;
        let max_floor = self.state.max_floor();

        // Rule 2a: flush a standing up-stop at the current floor.
        if self.book.read().await.has_floor(Direction::Up, floor) {
            self.open_and_flush(Direction::Up, floor).await;
        }

        let has_up = self.book.read().await.has_up();
        let has_down = self.book.read().await.has_down();

        if has_up {
            if floor == max_floor {
                // Rule 2b, at the top.
                if has_down {
                    self.state.set_direction(Direction::Down).await;
                    return StepOutcome::Resignal;
                }
                let smallest = self.book.read().await.smallest_key(Direction::Up);
                if smallest.is_some_and(|s| s < floor) {
                    self.state.set_direction(Direction::Down).await;
                    return StepOutcome::Resignal;
                }
                // Nothing left to do at the top; fall through to rule 9.
            } else {
                let largest = self.book.read().await.largest_key(Direction::Up);
                if largest.is_some_and(|l| l > floor) {
                    // Rule 2c: keep climbing toward the farthest up-stop.
                    self.state.set_current_floor(floor + 1).await;
                    return StepOutcome::Resignal;
                }
                if largest.is_some_and(|l| l < floor) {
                    // Rule 7: overshot the only remaining up-work.
                    self.state.set_direction(Direction::Down).await;
                    return StepOutcome::Resignal;
                }
            }
        } else if floor == max_floor {
            // Rule 1: at the top with no up work.
            if has_down {
                self.state.set_direction(Direction::Down).await;
                return StepOutcome::Resignal;
            }
        } else if has_down {
            // Rule 6: no up work left, but down work exists — pivot.
            return self.pivot_up_to_down(floor).await;
        }

        self.settle_or_idle().await
    }

    /// Rules 3, 4, 5, 8 — the down-moving half of the scheduler, symmetric
    /// to `step_up`.
    async fn step_down(&self) -> StepOutcome {
        let floor = self.state.current_floor().await;
        let min_floor = self.state.min_floor();

        if self.book.read().await.has_floor(Direction::Down, floor) {
            self.open_and_flush(Direction::Down, floor).await;
        }

        let has_down = self.book.read().await.has_down();
        let has_up = self.book.read().await.has_up();

        if has_down {
            if floor == min_floor {
                if has_up {
                    self.state.set_direction(Direction::Up).await;
                    return StepOutcome::Resignal;
                }
                let largest = self.book.read().await.largest_key(Direction::Down);
                if largest.is_some_and(|l| l > floor) {
                    self.state.set_direction(Direction::Up).await;
                    return StepOutcome::Resignal;
                }
            } else {
                let smallest = self.book.read().await.smallest_key(Direction::Down);
                if smallest.is_some_and(|s| s < floor) {
                    self.state.set_current_floor(floor - 1).await;
                    return StepOutcome::Resignal;
                }
                if smallest.is_some_and(|s| s > floor) {
                    self.state.set_direction(Direction::Up).await;
                    return StepOutcome::Resignal;
                }
            }
        } else if floor == min_floor {
            if has_up {
                self.state.set_direction(Direction::Up).await;
                return StepOutcome::Resignal;
            }
        } else if has_up {
            return self.pivot_down_to_up(floor).await;
        }

        self.settle_or_idle().await
    }

    /// Rule 6: moving up, no up work anywhere, down work pending. Keep
    /// climbing toward the farthest down-stop, or flip direction once
    /// there's nothing above left to collect on the way.
    async fn pivot_up_to_down(&self, floor: i64) -> StepOutcome {
        let largest = self.book.read().await.largest_key(Direction::Down);
        if largest.is_some_and(|l| l > floor) {
            self.state.set_current_floor(floor + 1).await;
        } else {
            self.state.set_direction(Direction::Down).await;
        }
        StepOutcome::Resignal
    }

    /// Rule 5: moving down, no down work anywhere, up work pending.
    async fn pivot_down_to_up(&self, floor: i64) -> StepOutcome {
        let smallest = self.book.read().await.smallest_key(Direction::Up);
        if smallest.is_some_and(|s| s < floor) {
            self.state.set_current_floor(floor - 1).await;
        } else {
            self.state.set_direction(Direction::Up).await;
        }
        StepOutcome::Resignal
    }
}

/// The car's long-lived task: wait for a signal, run one breaker-guarded
/// step if there's work, resignal itself if the step left more to do.
async fn event_loop(car: Arc<Car>, mut signal_rx: mpsc::Receiver<()>) {
    loop {
        tokio::select! {
            _ = car.cancel.cancelled() => break,
            signal = signal_rx.recv() => {
                if signal.is_none() {
                    break;
                }
            }
        }

        if car.is_book_idle().await {
            car.state.set_direction(Direction::Idle).await;
            continue;
        }

        let step_car = Arc::clone(&car);
        let operation_timeout = car.config.operation_timeout;
        let outcome = {
            let mut breaker = car.breaker.lock().await;
            breaker
                .execute(car.name(), move || async move {
                    match tokio::time::timeout(operation_timeout, step_car.step()).await {
                        Ok(outcome) => Ok(outcome),
                        Err(_) => Err(StepTimedOut),
                    }
                })
                .await
        };

        match outcome {
            Ok(StepOutcome::Resignal) => {
                let _ = car.signal_tx.try_send(());
            }
            Ok(StepOutcome::Settled) => {}
            Err(ExecuteError::Rejected) => {
                tracing::debug!(car = car.name(), "step skipped: breaker open");
            }
            Err(ExecuteError::Failed(StepTimedOut)) => {
                tracing::warn!(car = car.name(), "step timed out, recorded as breaker failure");
            }
        }
    }
}

#[cfg(test)]
#[path = "car_tests.rs"]
mod tests;
