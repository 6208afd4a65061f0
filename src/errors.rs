// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for parking operations
//!
//! Every failure an engine call can produce is a typed variant of
//! [`ParkingError`]. Nothing is turned into a default value on the way out:
//! a store that cannot be read surfaces as [`ParkingError::Persistence`].

use chrono::{NaiveDate, NaiveTime};
use std::time::Duration;
use thiserror::Error;

use crate::domain::{SpotNumber, ValidationError};
use crate::ledger::StoreError;

/// Errors returned by the parking services
#[derive(Debug, Error)]
pub enum ParkingError {
    /// Malformed or missing input, rejected before any ledger access
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Planning found no spot with a free run at the requested start
    #[error("No parking spots available on {date} at {start}")]
    NoAvailability { date: NaiveDate, start: NaiveTime },

    /// A competing commit took the planned range first
    #[error("Spot {spot} on {date} at {start} was taken by a concurrent reservation")]
    Conflict {
        spot: SpotNumber,
        date: NaiveDate,
        start: NaiveTime,
    },

    /// Commit did not finish within the caller's deadline
    #[error("Reservation timed out after {after:?}")]
    Timeout { after: Duration },

    /// Underlying store failed
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl ParkingError {
    /// Only conflicts may be retried, by re-planning against the current ledger
    pub fn is_retryable(&self) -> bool {
        matches!(self, ParkingError::Conflict { .. })
    }
}

impl From<StoreError> for ParkingError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { spot, date, slot } => ParkingError::Conflict {
                spot,
                date,
                start: slot.start_time(),
            },
            other => ParkingError::Persistence(other.to_string()),
        }
    }
}

/// Result type for parking operations
pub type ParkingResult<T> = Result<T, ParkingError>;

/// Configuration loading error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: String, value: String },

    #[error("{var} must be greater than zero")]
    Zero { var: String },
}
