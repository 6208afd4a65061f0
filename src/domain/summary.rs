// Copyright (c) 2025 - Cowboy AI, Inc.
//! Occupancy Summary

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::spot::TOTAL_SPOTS;

/// Below this share of free spots the lot counts as nearly full (percent)
pub const NEARLY_FULL_FREE_PERCENT: f64 = 10.0;

/// Below this share of occupied spots the lot counts as nearly empty (percent)
pub const NEARLY_EMPTY_OCCUPIED_PERCENT: f64 = 10.0;

/// Coarse occupancy label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccupancyStatus {
    Full,
    NearlyFull,
    NearlyEmpty,
    Normal,
}

impl OccupancyStatus {
    /// Classify counts. Checked in order: full, nearly full, nearly empty.
    pub fn classify(total: u32, free: u32, occupied: u32) -> Self {
        if free == 0 {
            return OccupancyStatus::Full;
        }
        if percent(free, total) < NEARLY_FULL_FREE_PERCENT {
            return OccupancyStatus::NearlyFull;
        }
        if percent(occupied, total) < NEARLY_EMPTY_OCCUPIED_PERCENT {
            return OccupancyStatus::NearlyEmpty;
        }
        OccupancyStatus::Normal
    }

    pub fn description(self) -> &'static str {
        match self {
            OccupancyStatus::Full => "Parking lot is full",
            OccupancyStatus::NearlyFull => "Limited spots available",
            OccupancyStatus::NearlyEmpty => "Plenty of spots available",
            OccupancyStatus::Normal => "Spots available",
        }
    }
}

fn percent(part: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    f64::from(part) / f64::from(total) * 100.0
}

/// Occupancy of the lot at one slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilitySummary {
    pub date: NaiveDate,
    pub as_of: NaiveTime,
    pub total: u32,
    pub free: u32,
    pub occupied: u32,
    /// Percent of spots occupied
    pub occupancy_rate: f64,
    pub status: OccupancyStatus,
}

impl AvailabilitySummary {
    pub fn new(date: NaiveDate, as_of: NaiveTime, free: u32, occupied: u32) -> Self {
        Self {
            date,
            as_of,
            total: TOTAL_SPOTS,
            free,
            occupied,
            occupancy_rate: percent(occupied, TOTAL_SPOTS),
            status: OccupancyStatus::classify(TOTAL_SPOTS, free, occupied),
        }
    }

    /// Percent of spots free
    pub fn availability_rate(&self) -> f64 {
        percent(self.free, self.total)
    }

    /// `"37/100 spots occupied (37.0%)"`
    pub fn formatted_occupancy(&self) -> String {
        format!(
            "{}/{} spots occupied ({:.1}%)",
            self.occupied, self.total, self.occupancy_rate
        )
    }

    /// `"63/100 spots available (63.0%)"`
    pub fn formatted_availability(&self) -> String {
        format!(
            "{}/{} spots available ({:.1}%)",
            self.free,
            self.total,
            self.availability_rate()
        )
    }
}
