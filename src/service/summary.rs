// Copyright (c) 2025 - Cowboy AI, Inc.
//! Summary Aggregator
//!
//! Occupancy totals for one slot, read from the cached aggregate counts with
//! a ledger scan as fallback.

use chrono::NaiveDate;
use std::sync::Arc;
use tracing::debug;

use super::Clock;
use crate::domain::{AvailabilitySummary, Slot};
use crate::errors::{ParkingError, ParkingResult};
use crate::ledger::{AvailabilityLedger, LedgerStore};

pub struct SummaryService<S: LedgerStore> {
    ledger: AvailabilityLedger<S>,
    clock: Arc<dyn Clock>,
}

impl<S: LedgerStore> Clone for SummaryService<S> {
    fn clone(&self) -> Self {
        Self {
            ledger: self.ledger.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S: LedgerStore> SummaryService<S> {
    pub fn new(ledger: AvailabilityLedger<S>, clock: Arc<dyn Clock>) -> Self {
        Self { ledger, clock }
    }

    pub async fn summary(&self, date: NaiveDate, slot: Slot) -> ParkingResult<AvailabilitySummary> {
        let count = self.ledger.aggregate(date, slot).await?;
        if !count.is_consistent() {
            return Err(ParkingError::Persistence(format!(
                "aggregate for {date} {slot} is {} free + {} occupied",
                count.free, count.occupied
            )));
        }

        let summary = AvailabilitySummary::new(date, slot.start_time(), count.free, count.occupied);
        debug!(%date, %slot, status = ?summary.status, "{}", summary.formatted_occupancy());
        Ok(summary)
    }

    /// Summary for today's current slot
    pub async fn summary_now(&self) -> ParkingResult<AvailabilitySummary> {
        let now = self.clock.now();
        self.summary(now.date(), Slot::containing(now.time())).await
    }
}
