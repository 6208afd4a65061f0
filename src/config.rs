// Copyright (c) 2025 - Cowboy AI, Inc.
//! Engine Configuration
//!
//! Tunables read from the environment. The contract constants (15-minute
//! slots, 4 hour maximum, 100 spots) live in [`crate::domain`] and are not
//! configurable.
//!
//! | Variable | Default |
//! |---|---|
//! | `PARKING_LOOKAHEAD_DAYS` | 1 |
//! | `PARKING_COMMIT_TIMEOUT_MS` | 5000 |
//! | `PARKING_MAX_CONFLICT_RETRIES` | 1 |
//! | `PARKING_REQUEST_TIMEOUT_MS` | 5000 |

use std::str::FromStr;
use std::time::Duration;

use crate::errors::ConfigError;

pub const LOOKAHEAD_DAYS_VAR: &str = "PARKING_LOOKAHEAD_DAYS";
pub const COMMIT_TIMEOUT_VAR: &str = "PARKING_COMMIT_TIMEOUT_MS";
pub const MAX_CONFLICT_RETRIES_VAR: &str = "PARKING_MAX_CONFLICT_RETRIES";
pub const REQUEST_TIMEOUT_VAR: &str = "PARKING_REQUEST_TIMEOUT_MS";

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParkingConfig {
    /// Days after today that accept prebookings
    pub lookahead_days: u32,
    /// Deadline for one reservation commit
    pub commit_timeout: Duration,
    /// Re-plans allowed after a commit conflict
    pub max_conflict_retries: u32,
    /// How long a client waits for a response
    pub request_timeout: Duration,
}

impl Default for ParkingConfig {
    fn default() -> Self {
        Self {
            lookahead_days: 1,
            commit_timeout: Duration::from_millis(5000),
            max_conflict_retries: 1,
            request_timeout: Duration::from_millis(5000),
        }
    }
}

impl ParkingConfig {
    /// Load configuration from environment variables, defaulting unset ones
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let lookahead_days = parse_or(&lookup, LOOKAHEAD_DAYS_VAR, defaults.lookahead_days)?;
        let max_conflict_retries =
            parse_or(&lookup, MAX_CONFLICT_RETRIES_VAR, defaults.max_conflict_retries)?;
        let commit_timeout = millis_or(&lookup, COMMIT_TIMEOUT_VAR, defaults.commit_timeout)?;
        let request_timeout = millis_or(&lookup, REQUEST_TIMEOUT_VAR, defaults.request_timeout)?;

        Ok(Self {
            lookahead_days,
            commit_timeout,
            max_conflict_retries,
            request_timeout,
        })
    }
}

fn parse_or<F, T>(lookup: &F, var: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            var: var.to_string(),
            value: raw,
        }),
    }
}

fn millis_or<F>(lookup: &F, var: &str, default: Duration) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let millis: u64 = parse_or(lookup, var, default.as_millis() as u64)?;
    if millis == 0 {
        return Err(ConfigError::Zero {
            var: var.to_string(),
        });
    }
    Ok(Duration::from_millis(millis))
}
