// Copyright (c) 2025 - Cowboy AI, Inc.
//! Availability Ledger
//!
//! The ledger is the single source of truth for "is spot S free during slot T
//! on date D". It is stored per `(date, slot, spot)` together with a cached
//! aggregate count per `(date, slot)`.
//!
//! # Architecture
//!
//! ```text
//! Service → AvailabilityLedger → LedgerStore (port) → InMemoryLedgerStore
//!               ↓
//!          LedgerWindow (pure snapshot) → Planner
//! ```
//!
//! # Store Requirements
//!
//! 1. **Atomic reserve**: re-check and write in one transaction
//! 2. **Consistent counts**: `free + occupied == 100` for every slot
//! 3. **No double booking**: one order per `(date, slot, spot)`
//! 4. **No partial writes**: a failed or abandoned reserve leaves no trace

use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::domain::{
    Assignment, CustomerId, Order, OrderId, Slot, SpotNumber, ValidationError, MAX_BOOKING_SLOTS,
    TOTAL_SPOTS,
};
use crate::errors::{ParkingError, ParkingResult};

pub mod memory;

pub use memory::InMemoryLedgerStore;

/// Free/occupied totals for one `(date, slot)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateCount {
    pub free: u32,
    pub occupied: u32,
}

impl AggregateCount {
    /// Counts for a slot nobody has booked
    pub const EMPTY_LOT: AggregateCount = AggregateCount {
        free: TOTAL_SPOTS,
        occupied: 0,
    };

    /// `free + occupied == TOTAL_SPOTS`
    pub fn is_consistent(&self) -> bool {
        self.free + self.occupied == TOTAL_SPOTS
    }

    /// Move one spot from free to occupied, `None` if nothing is free
    pub fn occupy_one(self) -> Option<Self> {
        Some(Self {
            free: self.free.checked_sub(1)?,
            occupied: self.occupied + 1,
        })
    }
}

/// One `(date, slot, spot)` cell of the ledger
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerEntry {
    pub occupied: bool,
    pub reserved_by: Option<CustomerId>,
    pub order_id: Option<OrderId>,
}

/// Read-only copy of occupancy for every spot over a slot range of one day
///
/// The planner works exclusively on windows, so planning never touches the
/// shared store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerWindow {
    date: NaiveDate,
    start: Slot,
    len: u32,
    /// `free[spot.index()][offset]`
    free: Vec<Vec<bool>>,
}

impl LedgerWindow {
    /// Window with every spot free, clipped to the end of the day
    pub fn fully_free(date: NaiveDate, start: Slot, len: u32) -> Self {
        let len = len.min(start.remaining_in_day());
        Self {
            date,
            start,
            len,
            free: vec![vec![true; len as usize]; TOTAL_SPOTS as usize],
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn start(&self) -> Slot {
        self.start
    }

    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn offset_of(&self, slot: Slot) -> Option<usize> {
        let offset = slot.index().checked_sub(self.start.index())?;
        (offset < self.len).then_some(offset as usize)
    }

    /// Slots outside the window read as occupied
    pub fn is_free(&self, spot: SpotNumber, slot: Slot) -> bool {
        self.offset_of(slot)
            .map(|offset| self.free[spot.index()][offset])
            .unwrap_or(false)
    }

    /// Contiguous free slots for `spot` from `from`, stopping at the first
    /// occupied slot, the window end, or `max_slots`
    pub fn free_run_length(&self, spot: SpotNumber, from: Slot, max_slots: u32) -> u32 {
        let Some(offset) = self.offset_of(from) else {
            return 0;
        };
        self.free[spot.index()][offset..]
            .iter()
            .take(max_slots as usize)
            .take_while(|free| **free)
            .count() as u32
    }

    /// Number of spots free at `slot`
    pub fn free_count(&self, slot: Slot) -> u32 {
        match self.offset_of(slot) {
            Some(offset) => self.free.iter().filter(|row| row[offset]).count() as u32,
            None => 0,
        }
    }

    /// Mark a run occupied in this copy only
    pub fn mark_occupied(&mut self, spot: SpotNumber, from: Slot, count: u32) {
        for slot in (0..count).filter_map(|n| from.offset(n)) {
            if let Some(offset) = self.offset_of(slot) {
                self.free[spot.index()][offset] = false;
            }
        }
    }
}

/// A reservation to be written inside one store transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationRequest {
    pub assignment: Assignment,
    pub customer_id: CustomerId,
    pub placed_on: NaiveDate,
}

/// Errors raised by a [`LedgerStore`]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A targeted slot was already occupied at commit time
    #[error("Slot {slot} of spot {spot} on {date} is already occupied")]
    Conflict {
        spot: SpotNumber,
        date: NaiveDate,
        slot: Slot,
    },

    /// Store cannot be reached
    #[error("Ledger store unavailable: {0}")]
    Unavailable(String),

    /// Request addresses slots outside the day
    #[error("Invalid slot range: {0}")]
    InvalidRange(String),

    /// Stored counts disagree with stored entries
    #[error("Ledger inconsistency: {0}")]
    Inconsistent(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence boundary for the availability ledger
///
/// Implementations must make [`LedgerStore::write_reservation`] atomic:
/// the free check and every write happen under one transaction, and a failed
/// call changes nothing.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Occupancy for all spots over `count` slots from `start`, clipped to
    /// the end of the day
    async fn load_window(&self, date: NaiveDate, start: Slot, count: u32) -> StoreResult<LedgerWindow>;

    /// Re-check, mark entries occupied, update counts and record the order
    ///
    /// # Errors
    ///
    /// - `Conflict` if any targeted slot is taken
    /// - `InvalidRange` if the run leaves the day
    async fn write_reservation(&self, request: ReservationRequest) -> StoreResult<Order>;

    /// Cached counts, `None` when the store keeps none for this slot
    async fn read_aggregate(&self, date: NaiveDate, slot: Slot) -> StoreResult<Option<AggregateCount>>;

    /// Single ledger cell
    async fn read_entry(&self, date: NaiveDate, slot: Slot, spot: SpotNumber) -> StoreResult<LedgerEntry>;

    /// Materialize ledger rows for the given dates; existing rows are kept
    async fn ensure_dates(&self, dates: &[NaiveDate]) -> StoreResult<()>;

    /// Most recently placed orders, newest first
    async fn recent_orders(&self, limit: usize) -> StoreResult<Vec<Order>>;
}

/// Ledger operations used by the planner and services
pub struct AvailabilityLedger<S: LedgerStore> {
    store: Arc<S>,
}

impl<S: LedgerStore> Clone for AvailabilityLedger<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: LedgerStore> AvailabilityLedger<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Pure copy of occupancy, for planning
    pub async fn snapshot(&self, date: NaiveDate, from: Slot, count: u32) -> ParkingResult<LedgerWindow> {
        self.store
            .load_window(date, from, count)
            .await
            .map_err(|e| persistence_failure("load_window", e))
    }

    /// Contiguous free slots for one spot, at most `max_slots`
    pub async fn free_run_length(
        &self,
        date: NaiveDate,
        spot: SpotNumber,
        from: Slot,
        max_slots: u32,
    ) -> ParkingResult<u32> {
        let window = self.snapshot(date, from, max_slots).await?;
        Ok(window.free_run_length(spot, from, max_slots))
    }

    /// Counts for one slot, from the cache or by scanning the slot column
    pub async fn aggregate(&self, date: NaiveDate, slot: Slot) -> ParkingResult<AggregateCount> {
        let cached = self
            .store
            .read_aggregate(date, slot)
            .await
            .map_err(|e| persistence_failure("read_aggregate", e))?;

        if let Some(count) = cached {
            return Ok(count);
        }

        debug!(%date, %slot, "No cached aggregate, scanning ledger");
        let window = self.snapshot(date, slot, 1).await?;
        let free = window.free_count(slot);
        Ok(AggregateCount {
            free,
            occupied: TOTAL_SPOTS - free,
        })
    }

    /// Commit an assignment for a customer
    ///
    /// # Errors
    ///
    /// - `Validation` for an empty, over-long, or day-crossing run
    /// - `Conflict` if a competing reservation got there first
    /// - `Persistence` if the store fails
    pub async fn reserve(
        &self,
        assignment: &Assignment,
        customer_id: &CustomerId,
        placed_on: NaiveDate,
    ) -> ParkingResult<Order> {
        validate_run(assignment)?;

        let request = ReservationRequest {
            assignment: assignment.clone(),
            customer_id: customer_id.clone(),
            placed_on,
        };

        match self.store.write_reservation(request).await {
            Ok(order) => {
                info!(
                    order_id = %order.order_id,
                    spot = %order.spot,
                    date = %order.date,
                    start = %order.start,
                    slots = order.slots,
                    customer = %order.customer_id,
                    "Reservation committed"
                );
                Ok(order)
            }
            Err(e @ StoreError::Conflict { .. }) => {
                warn!(spot = %assignment.spot, date = %assignment.date, "Reservation conflict: {}", e);
                Err(e.into())
            }
            Err(e) => Err(persistence_failure("write_reservation", e)),
        }
    }

    /// Materialize `today ..= today + lookahead_days`
    pub async fn ensure_horizon(&self, today: NaiveDate, lookahead_days: u32) -> ParkingResult<()> {
        let dates: Vec<NaiveDate> = (0..=u64::from(lookahead_days))
            .filter_map(|n| today.checked_add_days(Days::new(n)))
            .collect();

        self.store
            .ensure_dates(&dates)
            .await
            .map_err(|e| persistence_failure("ensure_dates", e))?;

        info!(%today, lookahead_days, "Ledger horizon ready");
        Ok(())
    }

    /// Most recent orders, newest first
    pub async fn recent_orders(&self, limit: usize) -> ParkingResult<Vec<Order>> {
        self.store
            .recent_orders(limit)
            .await
            .map_err(|e| persistence_failure("recent_orders", e))
    }
}

fn validate_run(assignment: &Assignment) -> Result<(), ValidationError> {
    if assignment.slots == 0 {
        return Err(ValidationError::NonPositiveDuration(0.0));
    }
    if assignment.slots > MAX_BOOKING_SLOTS {
        return Err(ValidationError::DurationTooLong(assignment.duration_hours()));
    }
    if assignment.slots > assignment.start.remaining_in_day() {
        return Err(ValidationError::CrossesMidnight {
            start: assignment.start_time(),
            slots: assignment.slots,
        });
    }
    Ok(())
}

fn persistence_failure(operation: &str, err: StoreError) -> ParkingError {
    error!(operation, "Ledger store failure: {}", err);
    err.into()
}
