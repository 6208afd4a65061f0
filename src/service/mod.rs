// Copyright (c) 2025 - Cowboy AI, Inc.
//! Service Layer for Spot Assignment
//!
//! Application services that validate requests, plan against a ledger
//! snapshot, and commit the result.
//!
//! # Architecture
//!
//! ```text
//! Client Request
//!     ↓
//! Service Layer (this module) ── validation (pure)
//!     ↓
//! AvailabilityLedger::snapshot → Planner (pure) → Assignment
//!     ↓
//! AvailabilityLedger::reserve (atomic, bounded by commit_timeout)
//!     ↓
//! Confirmation
//! ```
//!
//! # Transaction Semantics
//!
//! Each booking call is one transaction:
//! 1. Validate the request
//! 2. Snapshot the ledger from the start slot
//! 3. Plan (pure function)
//! 4. Reserve; the store re-checks every slot
//! 5. On `Conflict`, go back to 2, at most `max_conflict_retries` times
//!
//! A commit that exceeds its deadline fails with `Timeout`.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::ParkingConfig;
use crate::domain::slot::format_time_range;
use crate::domain::{
    CustomerId, Order, OrderId, Slot, SpotNumber, MAX_BOOKING_HOURS, MAX_BOOKING_SLOTS,
};
use crate::errors::{ParkingError, ParkingResult};
use crate::ledger::{AvailabilityLedger, LedgerStore};
use crate::planner;

pub mod clock;
pub mod park_now;
pub mod prebooking;
pub mod summary;

pub use clock::{Clock, FixedClock, SystemClock};
pub use park_now::{AvailabilityReport, ImmediateParkingService};
pub use prebooking::PrebookingService;
pub use summary::SummaryService;

/// What a customer is told after a successful booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Confirmation {
    pub order_id: OrderId,
    pub spot: SpotNumber,
    pub customer_id: CustomerId,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    /// `00:00` for a booking that runs to midnight
    pub end_time: NaiveTime,
    pub duration_hours: f64,
}

impl Confirmation {
    /// "Spot #7, Mar 02, 2026 10:00 - 14:00"
    pub fn describe(&self) -> String {
        format!(
            "Spot {}, {}",
            self.spot,
            format_time_range(self.date, self.start_time, self.end_time)
        )
    }
}

impl From<Order> for Confirmation {
    fn from(order: Order) -> Self {
        Self {
            order_id: order.order_id,
            spot: order.spot,
            date: order.date,
            start_time: order.start_time(),
            end_time: order.end_time(),
            duration_hours: order.duration_hours(),
            customer_id: order.customer_id,
        }
    }
}

/// Commit limits shared by the booking services
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitPolicy {
    pub commit_timeout: Duration,
    pub max_conflict_retries: u32,
}

impl From<&ParkingConfig> for CommitPolicy {
    fn from(config: &ParkingConfig) -> Self {
        Self {
            commit_timeout: config.commit_timeout,
            max_conflict_retries: config.max_conflict_retries,
        }
    }
}

impl Default for CommitPolicy {
    fn default() -> Self {
        Self::from(&ParkingConfig::default())
    }
}

/// Plan and reserve the best run from `start_time`, re-planning on conflict
///
/// Inputs must already be validated.
pub(crate) async fn plan_and_commit<S: LedgerStore>(
    ledger: &AvailabilityLedger<S>,
    policy: CommitPolicy,
    customer_id: &CustomerId,
    date: NaiveDate,
    start_time: NaiveTime,
    placed_on: NaiveDate,
) -> ParkingResult<Order> {
    let start = Slot::containing(start_time);
    let mut attempt = 0;

    loop {
        let window = ledger.snapshot(date, start, MAX_BOOKING_SLOTS).await?;
        let assignment = planner::plan(&window, date, start_time, MAX_BOOKING_HOURS)?
            .ok_or(ParkingError::NoAvailability {
                date,
                start: start_time,
            })?;
        debug!(attempt, %date, "Planned {}", assignment);

        let commit = ledger.reserve(&assignment, customer_id, placed_on);
        let result = match tokio::time::timeout(policy.commit_timeout, commit).await {
            Ok(result) => result,
            Err(_) => {
                warn!(spot = %assignment.spot, %date, "Reservation commit timed out");
                return Err(ParkingError::Timeout {
                    after: policy.commit_timeout,
                });
            }
        };

        match result {
            Err(e) if e.is_retryable() && attempt < policy.max_conflict_retries => {
                attempt += 1;
                debug!(attempt, "Re-planning after conflict");
            }
            other => return other,
        }
    }
}
