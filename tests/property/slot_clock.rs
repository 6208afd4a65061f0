// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for the Slot Clock

use chrono::{NaiveTime, Timelike};
use parking_ledger::domain::slot::{
    ceil_to_slot, floor_to_slot, hours_to_slots, is_aligned, slots_between, slots_to_hours, Slot,
};
use parking_ledger::domain::{MAX_BOOKING_SLOTS, SLOT_MINUTES};
use proptest::prelude::*;

fn any_time() -> impl Strategy<Value = NaiveTime> {
    (0u32..24, 0u32..60, 0u32..60).prop_map(|(h, m, s)| NaiveTime::from_hms_opt(h, m, s).unwrap())
}

fn any_slot() -> impl Strategy<Value = Slot> {
    (0u32..96).prop_map(|i| Slot::new(i).unwrap())
}

proptest! {
    /// Floor is aligned, not later than the input, and less than one slot earlier
    #[test]
    fn prop_floor_is_aligned_and_close(t in any_time()) {
        let floored = floor_to_slot(t);
        prop_assert!(is_aligned(floored));
        prop_assert!(floored <= t);
        prop_assert!(t.signed_duration_since(floored).num_seconds() < i64::from(SLOT_MINUTES) * 60);
    }

    /// Ceil is aligned and not earlier than the input whenever it exists
    #[test]
    fn prop_ceil_is_aligned_and_not_earlier(t in any_time()) {
        match ceil_to_slot(t) {
            Some(ceiled) => {
                prop_assert!(is_aligned(ceiled));
                prop_assert!(ceiled >= t);
            }
            None => prop_assert!(t > NaiveTime::from_hms_opt(23, 45, 0).unwrap()),
        }
    }

    /// Rounding is idempotent on aligned times
    #[test]
    fn prop_aligned_times_are_fixed_points(slot in any_slot()) {
        let t = slot.start_time();
        prop_assert_eq!(floor_to_slot(t), t);
        prop_assert_eq!(ceil_to_slot(t), Some(t));
        prop_assert_eq!(Slot::starting_at(t), Some(slot));
    }

    /// The containing slot's interval holds the time
    #[test]
    fn prop_containing_slot_holds_time(t in any_time()) {
        let slot = Slot::containing(t);
        prop_assert!(slot.start_time() <= t);
        prop_assert_eq!(slot.start_time().minute() % SLOT_MINUTES, 0);
        if let Some(next) = slot.offset(1) {
            prop_assert!(t < next.start_time());
        }
    }

    /// Hours and slots convert without loss on whole slots
    #[test]
    fn prop_slot_hours_round_trip(slots in 1u32..=MAX_BOOKING_SLOTS) {
        prop_assert_eq!(hours_to_slots(slots_to_hours(slots)), slots);
    }

    /// Counting slots between two boundaries matches their index distance
    #[test]
    fn prop_slots_between_boundaries(a in any_slot(), b in any_slot()) {
        let expected = b.index().saturating_sub(a.index());
        prop_assert_eq!(slots_between(a.start_time(), b.start_time()), expected);
    }
}
