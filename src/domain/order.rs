// Copyright (c) 2025 - Cowboy AI, Inc.
//! Assignments and Orders
//!
//! An [`Assignment`] is what the planner proposes. It becomes an [`Order`]
//! only when the ledger accepts the reservation. Both cover
//! `slots` consecutive slots starting at `start` on `date`; the end time is
//! derived, never stored.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::slot::{format_duration, slots_to_hours, Slot};
use super::spot::{CustomerId, SpotNumber};

/// Identifier of a committed order (UUID v7, time ordered)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(Uuid);

impl OrderId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Planned, not yet committed, spot assignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub spot: SpotNumber,
    pub date: NaiveDate,
    pub start: Slot,
    pub slots: u32,
}

impl Assignment {
    pub fn start_time(&self) -> NaiveTime {
        self.start.start_time()
    }

    /// `00:00` when the assignment runs to the end of the day
    pub fn end_time(&self) -> NaiveTime {
        self.start.end_after(self.slots)
    }

    pub fn duration_hours(&self) -> f64 {
        slots_to_hours(self.slots)
    }

    /// Order that committing this assignment for `customer` produces
    pub fn into_order(self, customer_id: CustomerId, placed_on: NaiveDate) -> Order {
        Order {
            order_id: OrderId::new(),
            spot: self.spot,
            customer_id,
            date: self.date,
            start: self.start,
            slots: self.slots,
            placed_on,
        }
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} → Gets {} (Spot {} assigned)",
            self.start,
            format_duration(self.duration_hours()),
            self.spot
        )
    }
}

/// Committed reservation. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub spot: SpotNumber,
    pub customer_id: CustomerId,
    pub date: NaiveDate,
    pub start: Slot,
    pub slots: u32,
    /// Day the order was placed
    pub placed_on: NaiveDate,
}

impl Order {
    pub fn start_time(&self) -> NaiveTime {
        self.start.start_time()
    }

    pub fn end_time(&self) -> NaiveTime {
        self.start.end_after(self.slots)
    }

    pub fn duration_hours(&self) -> f64 {
        slots_to_hours(self.slots)
    }

    /// True if this order holds `slot` on its date
    pub fn covers(&self, slot: Slot) -> bool {
        slot >= self.start && slot.index() < self.start.index() + self.slots
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Order {}: spot {}, customer '{}', {} {}-{} ({:.1}h)",
            self.order_id,
            self.spot,
            self.customer_id,
            self.date,
            self.start_time().format("%H:%M"),
            self.end_time().format("%H:%M"),
            self.duration_hours()
        )
    }
}

/// Free run of one spot from a given slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotAvailability {
    pub spot: SpotNumber,
    pub available_from: Slot,
    pub run_slots: u32,
}

impl SpotAvailability {
    pub fn duration_hours(&self) -> f64 {
        slots_to_hours(self.run_slots)
    }

    pub fn free_until(&self) -> NaiveTime {
        self.available_from.end_after(self.run_slots)
    }
}

/// Best assignment for one start slot of a day, with the free spot count there
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeFrame {
    pub assignment: Assignment,
    pub free_spots: u32,
}
