// Copyright (c) 2025 - Cowboy AI, Inc.
//! In-Memory Ledger Store
//!
//! [`LedgerStore`] backed by process memory. Writers are serialized through a
//! single `RwLock`; `write_reservation` holds the write guard from the free
//! check to the last mutation with no `.await` in between, so a reservation
//! either lands completely or not at all, even if the caller's future is
//! dropped.
//!
//! Dates are materialized lazily on first write, or up front through
//! [`LedgerStore::ensure_dates`]. Reads of a date that was never materialized
//! see a completely free lot.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use super::{
    AggregateCount, LedgerEntry, LedgerStore, LedgerWindow, ReservationRequest, StoreError,
    StoreResult,
};
use crate::domain::{Order, Slot, SpotNumber, SLOTS_PER_DAY, TOTAL_SPOTS};

/// All ledger rows of one date
#[derive(Debug, Clone)]
struct DayLedger {
    /// `entries[slot * TOTAL_SPOTS + spot.index()]`
    entries: Vec<LedgerEntry>,
    counts: Vec<AggregateCount>,
}

impl DayLedger {
    fn new() -> Self {
        Self {
            entries: vec![LedgerEntry::default(); (SLOTS_PER_DAY * TOTAL_SPOTS) as usize],
            counts: vec![AggregateCount::EMPTY_LOT; SLOTS_PER_DAY as usize],
        }
    }

    fn position(slot: Slot, spot: SpotNumber) -> usize {
        slot.index() as usize * TOTAL_SPOTS as usize + spot.index()
    }

    fn entry(&self, slot: Slot, spot: SpotNumber) -> &LedgerEntry {
        &self.entries[Self::position(slot, spot)]
    }

    fn entry_mut(&mut self, slot: Slot, spot: SpotNumber) -> &mut LedgerEntry {
        &mut self.entries[Self::position(slot, spot)]
    }
}

#[derive(Debug, Default)]
struct LedgerState {
    days: HashMap<NaiveDate, DayLedger>,
    orders: Vec<Order>,
}

/// Process-local ledger store
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    state: RwLock<LedgerState>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of materialized dates
    pub async fn materialized_days(&self) -> usize {
        self.state.read().await.days.len()
    }
}

fn run_slots(request: &ReservationRequest) -> StoreResult<Vec<Slot>> {
    let assignment = &request.assignment;
    (0..assignment.slots)
        .map(|n| {
            assignment.start.offset(n).ok_or_else(|| {
                StoreError::InvalidRange(format!(
                    "{} slots from {} leave {}",
                    assignment.slots, assignment.start, assignment.date
                ))
            })
        })
        .collect()
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn load_window(&self, date: NaiveDate, start: Slot, count: u32) -> StoreResult<LedgerWindow> {
        let mut window = LedgerWindow::fully_free(date, start, count);

        let state = self.state.read().await;
        let Some(day) = state.days.get(&date) else {
            return Ok(window);
        };

        for slot in (0..window.len()).filter_map(|n| start.offset(n)) {
            for spot in SpotNumber::all() {
                if day.entry(slot, spot).occupied {
                    window.mark_occupied(spot, slot, 1);
                }
            }
        }
        Ok(window)
    }

    async fn write_reservation(&self, request: ReservationRequest) -> StoreResult<Order> {
        let slots = run_slots(&request)?;
        let assignment = &request.assignment;
        let (spot, date) = (assignment.spot, assignment.date);

        let mut state = self.state.write().await;
        let day = state.days.entry(date).or_insert_with(DayLedger::new);

        // Check every slot and derive its new count before the first write
        let mut updated_counts = Vec::with_capacity(slots.len());
        for &slot in &slots {
            if day.entry(slot, spot).occupied {
                return Err(StoreError::Conflict { spot, date, slot });
            }
            let updated = day.counts[slot.index() as usize].occupy_one().ok_or_else(|| {
                StoreError::Inconsistent(format!(
                    "slot {slot} on {date} has a free spot {spot} but a zero free count"
                ))
            })?;
            updated_counts.push(updated);
        }

        let order = request.assignment.clone().into_order(request.customer_id, request.placed_on);

        for (&slot, updated) in slots.iter().zip(updated_counts) {
            let entry = day.entry_mut(slot, spot);
            entry.occupied = true;
            entry.reserved_by = Some(order.customer_id.clone());
            entry.order_id = Some(order.order_id);
            day.counts[slot.index() as usize] = updated;
        }

        state.orders.push(order.clone());
        debug!(order_id = %order.order_id, "Order stored");
        Ok(order)
    }

    async fn read_aggregate(&self, date: NaiveDate, slot: Slot) -> StoreResult<Option<AggregateCount>> {
        let state = self.state.read().await;
        Ok(state.days.get(&date).map(|day| day.counts[slot.index() as usize]))
    }

    async fn read_entry(&self, date: NaiveDate, slot: Slot, spot: SpotNumber) -> StoreResult<LedgerEntry> {
        let state = self.state.read().await;
        Ok(state
            .days
            .get(&date)
            .map(|day| day.entry(slot, spot).clone())
            .unwrap_or_default())
    }

    async fn ensure_dates(&self, dates: &[NaiveDate]) -> StoreResult<()> {
        let mut state = self.state.write().await;
        for date in dates {
            state.days.entry(*date).or_insert_with(DayLedger::new);
        }
        Ok(())
    }

    async fn recent_orders(&self, limit: usize) -> StoreResult<Vec<Order>> {
        let state = self.state.read().await;
        Ok(state.orders.iter().rev().take(limit).cloned().collect())
    }
}
