// Copyright (c) 2025 - Cowboy AI, Inc.
//! Prebooking Service
//!
//! Books a spot for a caller-chosen date and start time inside the booking
//! horizon. Uses the same planner policy as immediate parking.

use chrono::{NaiveDate, NaiveTime};
use std::sync::Arc;
use tracing::{debug, info};

use super::{plan_and_commit, Clock, CommitPolicy, Confirmation};
use crate::domain::invariants::{
    validate_aligned, validate_customer_id, validate_not_in_past, validate_within_horizon,
};
use crate::domain::{Slot, TimeFrame, MAX_BOOKING_SLOTS, SLOTS_PER_DAY};
use crate::errors::ParkingResult;
use crate::ledger::{AvailabilityLedger, LedgerStore};
use crate::planner;

pub struct PrebookingService<S: LedgerStore> {
    ledger: AvailabilityLedger<S>,
    clock: Arc<dyn Clock>,
    policy: CommitPolicy,
    lookahead_days: u32,
}

impl<S: LedgerStore> Clone for PrebookingService<S> {
    fn clone(&self) -> Self {
        Self {
            ledger: self.ledger.clone(),
            clock: Arc::clone(&self.clock),
            policy: self.policy,
            lookahead_days: self.lookahead_days,
        }
    }
}

impl<S: LedgerStore> PrebookingService<S> {
    pub fn new(
        ledger: AvailabilityLedger<S>,
        clock: Arc<dyn Clock>,
        policy: CommitPolicy,
        lookahead_days: u32,
    ) -> Self {
        Self {
            ledger,
            clock,
            policy,
            lookahead_days,
        }
    }

    /// Book the longest free run from `start_time` on `date`
    ///
    /// # Validation (before any ledger access)
    /// - customer id not blank
    /// - `start_time` on a 15-minute boundary
    /// - not before the current slot
    /// - `date` within today + lookahead days
    pub async fn pre_book(
        &self,
        customer_id: &str,
        date: NaiveDate,
        start_time: NaiveTime,
    ) -> ParkingResult<Confirmation> {
        let customer = validate_customer_id(customer_id)?;
        validate_aligned(start_time)?;
        let now = self.clock.now();
        validate_not_in_past(date, start_time, now)?;
        validate_within_horizon(date, now.date(), self.lookahead_days)?;
        debug!(customer = %customer, %date, %start_time, "Prebooking request");

        let order = plan_and_commit(
            &self.ledger,
            self.policy,
            &customer,
            date,
            start_time,
            now.date(),
        )
        .await?;

        let confirmation = Confirmation::from(order);
        info!(
            order_id = %confirmation.order_id,
            customer = %confirmation.customer_id,
            "Prebooked: {}",
            confirmation.describe()
        );
        Ok(confirmation)
    }

    /// Bookable start times on `date`, each with its best assignment
    ///
    /// Today's list starts at the current slot.
    pub async fn time_frames(&self, date: NaiveDate) -> ParkingResult<Vec<TimeFrame>> {
        let now = self.clock.now();
        validate_within_horizon(date, now.date(), self.lookahead_days)?;

        let from = if date == now.date() {
            Slot::containing(now.time())
        } else {
            validate_not_in_past(date, NaiveTime::MIN, now)?;
            Slot::FIRST
        };

        let window = self.ledger.snapshot(date, from, SLOTS_PER_DAY).await?;
        Ok(planner::time_frames(&window, MAX_BOOKING_SLOTS))
    }
}
