// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Ledger Invariants
//!
//! Arbitrary reservation sequences are written to the in-memory store. Some
//! succeed, some conflict. Whatever the mix, these must hold afterwards:
//!
//! 1. `free + occupied == 100` for every slot
//! 2. `occupied` equals the number of stored orders covering the slot
//! 3. No two orders overlap on the same spot
//! 4. A committed order keeps the assignment's spot and interval

use chrono::NaiveDate;
use parking_ledger::domain::{Assignment, CustomerId, Order, Slot, SpotNumber, TOTAL_SPOTS};
use parking_ledger::ledger::{AggregateCount, ReservationRequest, StoreError};
use parking_ledger::{InMemoryLedgerStore, LedgerStore};
use proptest::prelude::*;
use tokio_test::block_on;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

/// `(spot, start, slots)` that stay inside the day
fn reservation() -> impl Strategy<Value = (u32, u32, u32)> {
    (1u32..=20, 0u32..96).prop_flat_map(|(spot, start)| {
        let max = (96 - start).min(16);
        (Just(spot), Just(start), 1u32..=max)
    })
}

fn request(i: usize, (spot, start, slots): (u32, u32, u32)) -> ReservationRequest {
    ReservationRequest {
        assignment: Assignment {
            spot: SpotNumber::new(spot).unwrap(),
            date: date(),
            start: Slot::new(start).unwrap(),
            slots,
        },
        customer_id: CustomerId::new(format!("C{i}")).unwrap(),
        placed_on: date(),
    }
}

fn apply(store: &InMemoryLedgerStore, reservations: &[(u32, u32, u32)]) -> Vec<(ReservationRequest, Order)> {
    let mut committed = Vec::new();
    for (i, r) in reservations.iter().enumerate() {
        let req = request(i, *r);
        match block_on(store.write_reservation(req.clone())) {
            Ok(order) => committed.push((req, order)),
            Err(StoreError::Conflict { .. }) => {}
            Err(other) => panic!("unexpected store error: {other}"),
        }
    }
    committed
}

proptest! {
    #[test]
    fn prop_counts_match_orders(reservations in prop::collection::vec(reservation(), 0..60)) {
        let store = InMemoryLedgerStore::new();
        let committed = apply(&store, &reservations);
        let orders: Vec<Order> = committed.into_iter().map(|(_, o)| o).collect();

        for slot in Slot::all() {
            let count = block_on(store.read_aggregate(date(), slot))
                .unwrap()
                .unwrap_or(AggregateCount::EMPTY_LOT);
            let covering = orders.iter().filter(|o| o.covers(slot)).count() as u32;

            prop_assert_eq!(count.free + count.occupied, TOTAL_SPOTS);
            prop_assert_eq!(count.occupied, covering);
        }
    }

    #[test]
    fn prop_no_double_booking(reservations in prop::collection::vec(reservation(), 0..60)) {
        let store = InMemoryLedgerStore::new();
        let committed = apply(&store, &reservations);

        for (i, (_, a)) in committed.iter().enumerate() {
            for (_, b) in &committed[i + 1..] {
                if a.spot == b.spot {
                    let overlap = Slot::all().any(|s| a.covers(s) && b.covers(s));
                    prop_assert!(!overlap, "{} overlaps {}", a, b);
                }
            }
        }
    }

    #[test]
    fn prop_order_keeps_assignment(reservations in prop::collection::vec(reservation(), 1..30)) {
        let store = InMemoryLedgerStore::new();
        for (req, order) in apply(&store, &reservations) {
            prop_assert_eq!(order.spot, req.assignment.spot);
            prop_assert_eq!(order.start_time(), req.assignment.start_time());
            prop_assert_eq!(order.end_time(), req.assignment.end_time());
            prop_assert_eq!(&order.customer_id, &req.customer_id);

            for slot in Slot::all().filter(|s| order.covers(*s)) {
                let entry = block_on(store.read_entry(date(), slot, order.spot)).unwrap();
                prop_assert!(entry.occupied);
                prop_assert_eq!(entry.order_id, Some(order.order_id));
            }
        }
    }
}
