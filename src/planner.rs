// Copyright (c) 2025 - Cowboy AI, Inc.
//! Assignment Planner
//!
//! Pure decision functions over a [`LedgerWindow`]:
//!
//! ```text
//! plan(Window, date, start, max_hours) → Option<Assignment>
//! ```
//!
//! - No side effects, no clock reads, no store access
//! - Deterministic: the same window always yields the same assignment
//!
//! # Selection Policy
//!
//! 1. Longest contiguous free run from the start slot, capped at the
//!    requested maximum and at the end of the day
//! 2. On equal runs, the lowest spot number
//!
//! The same policy serves immediate parking and prebooking.

use chrono::{NaiveDate, NaiveTime};
use std::cmp::Reverse;

use crate::domain::invariants::{validate_aligned, validate_duration};
use crate::domain::slot::hours_to_slots;
use crate::domain::{Assignment, Slot, SpotAvailability, SpotNumber, TimeFrame, ValidationError};
use crate::ledger::LedgerWindow;

/// Best assignment starting at `start_time`, or `None` when no spot is free
///
/// # Errors
/// - `UnalignedTime` if `start_time` is not on a slot boundary
/// - `NonPositiveDuration` if `max_duration_hours <= 0`
pub fn plan(
    window: &LedgerWindow,
    date: NaiveDate,
    start_time: NaiveTime,
    max_duration_hours: f64,
) -> Result<Option<Assignment>, ValidationError> {
    validate_aligned(start_time)?;
    validate_duration(max_duration_hours)?;

    let start = Slot::containing(start_time);
    let max_slots = hours_to_slots(max_duration_hours).min(start.remaining_in_day());

    Ok(best_spot(window, start, max_slots).map(|best| Assignment {
        spot: best.spot,
        date,
        start,
        slots: best.run_slots,
    }))
}

/// Highest-ranked eligible spot
pub fn best_spot(window: &LedgerWindow, start: Slot, max_slots: u32) -> Option<SpotAvailability> {
    // Ascending spot order plus strict comparison keeps the lowest spot on ties
    SpotNumber::all()
        .filter_map(|spot| availability(window, spot, start, max_slots))
        .fold(None, |best: Option<SpotAvailability>, candidate| match best {
            Some(current) if current.run_slots >= candidate.run_slots => Some(current),
            _ => Some(candidate),
        })
}

/// Every eligible spot, best first
pub fn rank(window: &LedgerWindow, start: Slot, max_slots: u32) -> Vec<SpotAvailability> {
    let mut ranked: Vec<SpotAvailability> = SpotNumber::all()
        .filter_map(|spot| availability(window, spot, start, max_slots))
        .collect();
    ranked.sort_by_key(|a| (Reverse(a.run_slots), a.spot));
    ranked
}

fn availability(
    window: &LedgerWindow,
    spot: SpotNumber,
    start: Slot,
    max_slots: u32,
) -> Option<SpotAvailability> {
    let run_slots = window.free_run_length(spot, start, max_slots);
    (run_slots > 0).then_some(SpotAvailability {
        spot,
        available_from: start,
        run_slots,
    })
}

/// Best assignment for each start slot of the window that has a free spot
///
/// The window must extend [`crate::domain::MAX_BOOKING_SLOTS`] past the last
/// start slot for runs near the end to be measured in full; runs are clipped
/// at the window end otherwise.
pub fn time_frames(window: &LedgerWindow, max_slots: u32) -> Vec<TimeFrame> {
    (0..window.len())
        .filter_map(|n| window.start().offset(n))
        .filter_map(|start| {
            let best = best_spot(window, start, max_slots)?;
            Some(TimeFrame {
                assignment: Assignment {
                    spot: best.spot,
                    date: window.date(),
                    start,
                    slots: best.run_slots,
                },
                free_spots: window.free_count(start),
            })
        })
        .collect()
}
