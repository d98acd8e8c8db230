// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Monotonic fleet counters and their point-in-time snapshot.
//!
//! A pure bookkeeping adjunct to the core: these counters carry no dispatch
//! semantics of their own and are never read by `Car` or the selection
//! algorithm, only written by `Fleet` as a side effect of `add`/`delete`/
//! `request_elevator`.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::health::epoch_millis;

/// Atomic counters owned by a `Fleet`.
#[derive(Debug, Default)]
pub struct FleetCounters {
    requests_total: AtomicU64,
    requests_failed: AtomicU64,
    cars_added: AtomicU64,
    cars_deleted: AtomicU64,
}

impl FleetCounters {
    pub fn record_request(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_request_failed(&self) {
        self.requests_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_car_added(&self) {
        self.cars_added.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_car_deleted(&self) {
        self.cars_deleted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self, cars_total: usize) -> FleetMetrics {
        FleetMetrics {
            cars_total,
            requests_total: self.requests_total.load(Ordering::Relaxed),
            requests_failed: self.requests_failed.load(Ordering::Relaxed),
            cars_added: self.cars_added.load(Ordering::Relaxed),
            cars_deleted: self.cars_deleted.load(Ordering::Relaxed),
            timestamp: epoch_millis(),
        }
    }
}

/// Point-in-time counters snapshot, per §4.6/§6. A cheap atomic read, not
/// subject to the status/health wall-clock timeout.
#[derive(Debug, Clone, Serialize)]
pub struct FleetMetrics {
    pub cars_total: usize,
    pub requests_total: u64,
    pub requests_failed: u64,
    pub cars_added: u64,
    pub cars_deleted: u64,
    pub timestamp: u64,
}
