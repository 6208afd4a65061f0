// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for parking-ledger
//!
//! Deterministic dates, clocks and engine wiring shared by the integration
//! suites, plus ledger stores that misbehave on purpose.
//!
//! # Design Principles
//! - All times are fixed (no `SystemClock` in tests)
//! - "Today" is 2026-03-02
//! - Faulty stores wrap the in-memory store so successful paths stay real
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_ledger::domain::{Assignment, CustomerId, Order, Slot, SpotNumber};
use parking_ledger::ledger::{
    AggregateCount, LedgerEntry, LedgerWindow, ReservationRequest, StoreError, StoreResult,
};
use parking_ledger::service::CommitPolicy;
use parking_ledger::{
    AvailabilityLedger, FixedClock, ImmediateParkingService, InMemoryLedgerStore, LedgerStore,
    ParkingConfig, PrebookingService, SummaryService,
};

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).expect("Invalid fixture date")
}

pub fn tomorrow() -> NaiveDate {
    today().succ_opt().expect("Invalid fixture date")
}

pub fn at(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).expect("Invalid fixture time")
}

pub fn now(h: u32, m: u32) -> NaiveDateTime {
    today().and_time(at(h, m))
}

pub fn spot(n: u32) -> SpotNumber {
    SpotNumber::new(n).expect("Invalid fixture spot")
}

pub fn customer(id: &str) -> CustomerId {
    CustomerId::new(id).expect("Invalid fixture customer")
}

/// Services over one store and clock
pub struct Engine<S: LedgerStore> {
    pub store: Arc<S>,
    pub clock: Arc<FixedClock>,
    pub ledger: AvailabilityLedger<S>,
    pub park_now: ImmediateParkingService<S>,
    pub prebooking: PrebookingService<S>,
    pub summary: SummaryService<S>,
}

impl<S: LedgerStore> Engine<S> {
    pub fn with_store(store: Arc<S>, clock_at: NaiveDateTime, config: &ParkingConfig) -> Self {
        let clock = Arc::new(FixedClock::new(clock_at));
        let ledger = AvailabilityLedger::new(Arc::clone(&store));
        let policy = CommitPolicy::from(config);

        Self {
            park_now: ImmediateParkingService::new(ledger.clone(), clock.clone(), policy),
            prebooking: PrebookingService::new(
                ledger.clone(),
                clock.clone(),
                policy,
                config.lookahead_days,
            ),
            summary: SummaryService::new(ledger.clone(), clock.clone()),
            store,
            clock,
            ledger,
        }
    }

    /// Commit a run directly, bypassing the planner
    pub async fn occupy(&self, spot_number: u32, date: NaiveDate, start: NaiveTime, slots: u32) -> Order {
        let assignment = Assignment {
            spot: spot(spot_number),
            date,
            start: Slot::starting_at(start).expect("Fixture start must be aligned"),
            slots,
        };
        self.ledger
            .reserve(&assignment, &customer(&format!("occupant-{spot_number}")), today())
            .await
            .expect("Fixture reservation failed")
    }
}

/// In-memory engine with default configuration, clock at `h:m` today
pub fn engine_at(h: u32, m: u32) -> Engine<InMemoryLedgerStore> {
    engine_with_config(h, m, &ParkingConfig::default())
}

pub fn engine_with_config(h: u32, m: u32, config: &ParkingConfig) -> Engine<InMemoryLedgerStore> {
    Engine::with_store(Arc::new(InMemoryLedgerStore::new()), now(h, m), config)
}

/// Store whose every call fails as unreachable
#[derive(Debug, Default)]
pub struct FailingLedgerStore;

fn unavailable<T>() -> StoreResult<T> {
    Err(StoreError::Unavailable("connection refused".to_string()))
}

#[async_trait]
impl LedgerStore for FailingLedgerStore {
    async fn load_window(&self, _: NaiveDate, _: Slot, _: u32) -> StoreResult<LedgerWindow> {
        unavailable()
    }

    async fn write_reservation(&self, _: ReservationRequest) -> StoreResult<Order> {
        unavailable()
    }

    async fn read_aggregate(&self, _: NaiveDate, _: Slot) -> StoreResult<Option<AggregateCount>> {
        unavailable()
    }

    async fn read_entry(&self, _: NaiveDate, _: Slot, _: SpotNumber) -> StoreResult<LedgerEntry> {
        unavailable()
    }

    async fn ensure_dates(&self, _: &[NaiveDate]) -> StoreResult<()> {
        unavailable()
    }

    async fn recent_orders(&self, _: usize) -> StoreResult<Vec<Order>> {
        unavailable()
    }
}

/// In-memory store that stalls before every reservation write
#[derive(Debug)]
pub struct SlowLedgerStore {
    pub inner: InMemoryLedgerStore,
    pub delay: Duration,
}

impl SlowLedgerStore {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: InMemoryLedgerStore::new(),
            delay,
        }
    }
}

/// In-memory store where a rival customer wins the first commit race
///
/// The first `write_reservation` books the same assignment for `rival`
/// just before attempting the caller's write, which then conflicts.
#[derive(Debug, Default)]
pub struct ContestedLedgerStore {
    pub inner: InMemoryLedgerStore,
    raced: AtomicBool,
}

#[async_trait]
impl LedgerStore for SlowLedgerStore {
    async fn load_window(&self, date: NaiveDate, start: Slot, count: u32) -> StoreResult<LedgerWindow> {
        self.inner.load_window(date, start, count).await
    }

    async fn read_aggregate(&self, date: NaiveDate, slot: Slot) -> StoreResult<Option<AggregateCount>> {
        self.inner.read_aggregate(date, slot).await
    }

    async fn read_entry(&self, date: NaiveDate, slot: Slot, spot: SpotNumber) -> StoreResult<LedgerEntry> {
        self.inner.read_entry(date, slot, spot).await
    }

    async fn ensure_dates(&self, dates: &[NaiveDate]) -> StoreResult<()> {
        self.inner.ensure_dates(dates).await
    }

    async fn recent_orders(&self, limit: usize) -> StoreResult<Vec<Order>> {
        self.inner.recent_orders(limit).await
    }

    async fn write_reservation(&self, request: ReservationRequest) -> StoreResult<Order> {
        tokio::time::sleep(self.delay).await;
        self.inner.write_reservation(request).await
    }
}

#[async_trait]
impl LedgerStore for ContestedLedgerStore {
    async fn load_window(&self, date: NaiveDate, start: Slot, count: u32) -> StoreResult<LedgerWindow> {
        self.inner.load_window(date, start, count).await
    }

    async fn read_aggregate(&self, date: NaiveDate, slot: Slot) -> StoreResult<Option<AggregateCount>> {
        self.inner.read_aggregate(date, slot).await
    }

    async fn read_entry(&self, date: NaiveDate, slot: Slot, spot: SpotNumber) -> StoreResult<LedgerEntry> {
        self.inner.read_entry(date, slot, spot).await
    }

    async fn ensure_dates(&self, dates: &[NaiveDate]) -> StoreResult<()> {
        self.inner.ensure_dates(dates).await
    }

    async fn recent_orders(&self, limit: usize) -> StoreResult<Vec<Order>> {
        self.inner.recent_orders(limit).await
    }

    async fn write_reservation(&self, request: ReservationRequest) -> StoreResult<Order> {
        if !self.raced.swap(true, Ordering::SeqCst) {
            let rival = ReservationRequest {
                customer_id: customer("rival"),
                ..request.clone()
            };
            self.inner.write_reservation(rival).await?;
        }
        self.inner.write_reservation(request).await
    }
}
