// Copyright (c) 2025 - Cowboy AI, Inc.
//! Parking Domain Models
//!
//! Value objects and pure rules shared by the ledger, the planner and the
//! services.
//!
//! # Value Objects with Invariants
//!
//! - [`SpotNumber`] - fleet member, 1-100
//! - [`CustomerId`] - non-blank, trimmed customer reference
//! - [`Slot`] - 15-minute slot of a day, 0-95
//!
//! # Records
//!
//! - [`Assignment`] - planner output, not yet committed
//! - [`Order`] - committed reservation
//! - [`AvailabilitySummary`] - occupancy at one slot

pub mod invariants;
pub mod order;
pub mod slot;
pub mod spot;
pub mod summary;

pub use invariants::{ValidationError, ValidationResult};
pub use order::{Assignment, Order, OrderId, SpotAvailability, TimeFrame};
pub use slot::{
    ceil_to_slot, duration_hours, floor_to_slot, is_aligned, slots_between, Slot,
    HOURS_PER_SLOT, MAX_BOOKING_HOURS, MAX_BOOKING_SLOTS, SLOTS_PER_DAY, SLOT_MINUTES,
};
pub use spot::{CustomerId, SpotNumber, TOTAL_SPOTS};
pub use summary::{AvailabilitySummary, OccupancyStatus};
