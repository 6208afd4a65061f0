// Copyright (c) 2025 - Cowboy AI, Inc.
//! Pure Validation Functions - Request Invariants
//!
//! Every request is checked here before the ledger is touched. All functions
//! are pure and take "now" as an argument rather than reading a clock.
//!
//! # Invariant Categories
//!
//! 1. **Structural**: customer id present, spot in range, duration positive
//! 2. **Temporal**: start on a slot boundary, not in the past, inside the
//!    booking horizon

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};

use super::slot::{floor_to_slot, is_aligned, is_in_past};
use super::spot::CustomerId;

/// Validation result with detailed error information
pub type ValidationResult = Result<(), ValidationError>;

/// Validation error with context
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Customer id missing or whitespace only
    #[error("Customer ID is required")]
    BlankCustomerId,

    /// Spot outside the fleet
    #[error("Spot number {0} is outside 1..=100")]
    SpotOutOfRange(u32),

    /// Start time not on a 15-minute boundary
    #[error("Start time {0} is not on a 15-minute boundary")]
    UnalignedTime(NaiveTime),

    /// Zero or negative booking length
    #[error("Duration must be positive, got {0} hours")]
    NonPositiveDuration(f64),

    /// Longer than the maximum booking length
    #[error("Duration {0} hours exceeds the 4 hour maximum")]
    DurationTooLong(f64),

    /// Slot range runs past the end of its day
    #[error("{slots} slots from {start} run past midnight")]
    CrossesMidnight { start: NaiveTime, slots: u32 },

    /// Start lies before the current slot
    #[error("Requested start {date} {time} is in the past")]
    InPast { date: NaiveDate, time: NaiveTime },

    /// Date after the last day that accepts bookings
    #[error("Date {date} is beyond the booking horizon (last bookable day {last})")]
    BeyondHorizon { date: NaiveDate, last: NaiveDate },
}

/// Validate and normalize a customer id
pub fn validate_customer_id(raw: &str) -> Result<CustomerId, ValidationError> {
    CustomerId::new(raw)
}

/// Validate a start time sits on a slot boundary
pub fn validate_aligned(time: NaiveTime) -> ValidationResult {
    if !is_aligned(time) {
        return Err(ValidationError::UnalignedTime(time));
    }
    Ok(())
}

/// Validate a requested booking length
pub fn validate_duration(hours: f64) -> ValidationResult {
    if hours.is_nan() || hours <= 0.0 {
        return Err(ValidationError::NonPositiveDuration(hours));
    }
    Ok(())
}

/// Validate a start is not in the past
///
/// # Rules
/// - Earlier dates are always in the past
/// - On today's date, the slot currently running is still bookable; anything
///   before it is not
pub fn validate_not_in_past(date: NaiveDate, time: NaiveTime, now: NaiveDateTime) -> ValidationResult {
    let current_slot = NaiveDateTime::new(now.date(), floor_to_slot(now.time()));
    if is_in_past(date, time, current_slot) {
        return Err(ValidationError::InPast { date, time });
    }
    Ok(())
}

/// Validate a date falls inside `today ..= today + lookahead_days`
pub fn validate_within_horizon(date: NaiveDate, today: NaiveDate, lookahead_days: u32) -> ValidationResult {
    let last = today
        .checked_add_days(Days::new(u64::from(lookahead_days)))
        .unwrap_or(NaiveDate::MAX);
    if date > last {
        return Err(ValidationError::BeyondHorizon { date, last });
    }
    Ok(())
}
