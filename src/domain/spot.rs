// Copyright (c) 2025 - Cowboy AI, Inc.
//! Spot and Customer Value Objects

use serde::{Deserialize, Serialize};
use std::fmt;

use super::invariants::ValidationError;

/// Size of the fleet. Spots are numbered `1..=TOTAL_SPOTS`.
pub const TOTAL_SPOTS: u32 = 100;

/// Physical parking spot number
///
/// # Invariants
/// - `1 <= n <= 100`
///
/// # Examples
///
/// ```rust
/// use parking_ledger::domain::SpotNumber;
///
/// let spot = SpotNumber::new(42).unwrap();
/// assert_eq!(spot.get(), 42);
///
/// assert!(SpotNumber::new(0).is_err());
/// assert!(SpotNumber::new(101).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct SpotNumber(u8);

impl SpotNumber {
    /// Lowest-numbered spot
    pub const FIRST: SpotNumber = SpotNumber(1);

    pub fn new(number: u32) -> Result<Self, ValidationError> {
        if !(1..=TOTAL_SPOTS).contains(&number) {
            return Err(ValidationError::SpotOutOfRange(number));
        }
        Ok(Self(number as u8))
    }

    pub fn get(self) -> u32 {
        u32::from(self.0)
    }

    /// Zero-based position, for indexing per-spot tables
    pub fn index(self) -> usize {
        usize::from(self.0) - 1
    }

    /// Every spot in ascending order
    pub fn all() -> impl Iterator<Item = SpotNumber> {
        (1..=TOTAL_SPOTS).map(|n| SpotNumber(n as u8))
    }
}

impl TryFrom<u32> for SpotNumber {
    type Error = ValidationError;

    fn try_from(number: u32) -> Result<Self, Self::Error> {
        SpotNumber::new(number)
    }
}

impl From<SpotNumber> for u32 {
    fn from(spot: SpotNumber) -> Self {
        spot.get()
    }
}

impl fmt::Display for SpotNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Customer reference attached to ledger entries and orders
///
/// Stored trimmed; blank identifiers are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CustomerId(String);

impl CustomerId {
    pub fn new(id: impl AsRef<str>) -> Result<Self, ValidationError> {
        let trimmed = id.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ValidationError::BlankCustomerId);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CustomerId {
    type Error = ValidationError;

    fn try_from(id: String) -> Result<Self, Self::Error> {
        CustomerId::new(id)
    }
}

impl From<CustomerId> for String {
    fn from(id: CustomerId) -> Self {
        id.0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
