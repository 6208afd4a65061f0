// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Assignment Selection
//!
//! Random occupancy patterns are laid over a window; the planner must always
//! pick the longest run, break ties on the lowest spot, and stay within the
//! booking limits.

use chrono::NaiveDate;
use parking_ledger::domain::{Slot, SpotNumber, MAX_BOOKING_HOURS, MAX_BOOKING_SLOTS};
use parking_ledger::ledger::LedgerWindow;
use parking_ledger::planner::{plan, rank};
use proptest::prelude::*;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

/// `(spot, offset, length)` blocks to mark occupied
fn occupancy() -> impl Strategy<Value = Vec<(u32, u32, u32)>> {
    prop::collection::vec((1u32..=100, 0u32..16, 1u32..=16), 0..400)
}

fn window(start: Slot, blocks: &[(u32, u32, u32)]) -> LedgerWindow {
    let mut window = LedgerWindow::fully_free(date(), start, MAX_BOOKING_SLOTS);
    for &(spot, offset, len) in blocks {
        if let Some(from) = start.offset(offset) {
            window.mark_occupied(SpotNumber::new(spot).unwrap(), from, len);
        }
    }
    window
}

proptest! {
    /// Chosen run is maximal and no lower spot has an equal run
    #[test]
    fn prop_longest_run_lowest_spot(start in 0u32..96, blocks in occupancy()) {
        let start = Slot::new(start).unwrap();
        let window = window(start, &blocks);

        let assignment = plan(&window, date(), start.start_time(), MAX_BOOKING_HOURS).unwrap();
        let runs: Vec<u32> = SpotNumber::all()
            .map(|s| window.free_run_length(s, start, MAX_BOOKING_SLOTS))
            .collect();
        let best_run = runs.iter().copied().max().unwrap_or(0);

        match assignment {
            None => prop_assert_eq!(best_run, 0),
            Some(a) => {
                prop_assert_eq!(a.slots, best_run);
                prop_assert!(runs[..a.spot.index()].iter().all(|r| *r < best_run));
                prop_assert!(a.slots > 0 && a.slots <= MAX_BOOKING_SLOTS);
                prop_assert!(a.duration_hours() > 0.0 && a.duration_hours() <= MAX_BOOKING_HOURS);
                prop_assert!(a.slots <= start.remaining_in_day());
            }
        }
    }

    /// Same snapshot, same answer
    #[test]
    fn prop_plan_is_deterministic(start in 0u32..96, blocks in occupancy()) {
        let start = Slot::new(start).unwrap();
        let window = window(start, &blocks);

        let first = plan(&window, date(), start.start_time(), MAX_BOOKING_HOURS).unwrap();
        let second = plan(&window.clone(), date(), start.start_time(), MAX_BOOKING_HOURS).unwrap();
        prop_assert_eq!(first, second);
    }

    /// The top of the ranking is the planned spot
    #[test]
    fn prop_rank_agrees_with_plan(start in 0u32..96, blocks in occupancy()) {
        let start = Slot::new(start).unwrap();
        let window = window(start, &blocks);

        let planned = plan(&window, date(), start.start_time(), MAX_BOOKING_HOURS).unwrap();
        let ranked = rank(&window, start, MAX_BOOKING_SLOTS);

        prop_assert_eq!(planned.map(|a| a.spot), ranked.first().map(|r| r.spot));
        let ordered = ranked.windows(2).all(|w| {
            w[0].run_slots > w[1].run_slots
                || (w[0].run_slots == w[1].run_slots && w[0].spot < w[1].spot)
        });
        prop_assert!(ordered, "ranking out of order");
    }
}
