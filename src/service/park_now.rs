// Copyright (c) 2025 - Cowboy AI, Inc.
//! Immediate Parking Service
//!
//! Assigns a spot starting at the current slot for up to four hours.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use super::{plan_and_commit, Clock, CommitPolicy, Confirmation};
use crate::domain::invariants::validate_customer_id;
use crate::domain::{Slot, SpotAvailability, MAX_BOOKING_SLOTS};
use crate::errors::{ParkingError, ParkingResult};
use crate::ledger::{AvailabilityLedger, LedgerStore};
use crate::planner;

/// Best spot available right now, without booking it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityReport {
    pub best: SpotAvailability,
    /// Spots with at least one free slot from now
    pub total_available: u32,
}

/// Park-now requests against one ledger
pub struct ImmediateParkingService<S: LedgerStore> {
    ledger: AvailabilityLedger<S>,
    clock: Arc<dyn Clock>,
    policy: CommitPolicy,
}

impl<S: LedgerStore> Clone for ImmediateParkingService<S> {
    fn clone(&self) -> Self {
        Self {
            ledger: self.ledger.clone(),
            clock: Arc::clone(&self.clock),
            policy: self.policy,
        }
    }
}

impl<S: LedgerStore> ImmediateParkingService<S> {
    pub fn new(ledger: AvailabilityLedger<S>, clock: Arc<dyn Clock>, policy: CommitPolicy) -> Self {
        Self {
            ledger,
            clock,
            policy,
        }
    }

    /// Book the longest free run from the current slot
    ///
    /// # Errors
    /// - `Validation` for a blank customer id
    /// - `NoAvailability` when every spot is taken at the current slot
    /// - `Conflict` when competing bookings won every attempt
    /// - `Timeout` and `Persistence` from the commit
    pub async fn park_now(&self, customer_id: &str) -> ParkingResult<Confirmation> {
        let customer = validate_customer_id(customer_id)?;
        let now = self.clock.now();
        let start = Slot::containing(now.time());
        debug!(customer = %customer, %now, %start, "Park-now request");

        let order = plan_and_commit(
            &self.ledger,
            self.policy,
            &customer,
            now.date(),
            start.start_time(),
            now.date(),
        )
        .await?;

        let confirmation = Confirmation::from(order);
        info!(
            order_id = %confirmation.order_id,
            customer = %confirmation.customer_id,
            "Parked now: {}",
            confirmation.describe()
        );
        Ok(confirmation)
    }

    /// Read-only half of [`Self::park_now`]
    pub async fn check_availability(&self) -> ParkingResult<AvailabilityReport> {
        let now = self.clock.now();
        let start = Slot::containing(now.time());

        let window = self.ledger.snapshot(now.date(), start, MAX_BOOKING_SLOTS).await?;
        let ranked = planner::rank(&window, start, MAX_BOOKING_SLOTS);

        let best = ranked.first().copied().ok_or(ParkingError::NoAvailability {
            date: now.date(),
            start: start.start_time(),
        })?;

        Ok(AvailabilityReport {
            best,
            total_available: ranked.len() as u32,
        })
    }
}
