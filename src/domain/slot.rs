// Copyright (c) 2025 - Cowboy AI, Inc.
//! Slot Clock
//!
//! A calendar day is divided into 96 slots of 15 minutes. Everything in the
//! ledger is keyed by [`Slot`]; this module converts between wall-clock
//! times and slot boundaries.
//!
//! All functions are pure: no clock reads, no state.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of one slot in minutes
pub const SLOT_MINUTES: u32 = 15;

/// Number of slots in a calendar day
pub const SLOTS_PER_DAY: u32 = 96;

/// Length of one slot in hours
pub const HOURS_PER_SLOT: f64 = 0.25;

/// Longest booking the engine will hand out
pub const MAX_BOOKING_HOURS: f64 = 4.0;

/// [`MAX_BOOKING_HOURS`] expressed in slots
pub const MAX_BOOKING_SLOTS: u32 = 16;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Index of a 15-minute slot within a day (0 = 00:00, 95 = 23:45)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Slot(u8);

impl Slot {
    /// 00:00
    pub const FIRST: Slot = Slot(0);

    /// 23:45
    pub const LAST: Slot = Slot((SLOTS_PER_DAY - 1) as u8);

    /// Slot by index, `None` past the end of the day
    pub fn new(index: u32) -> Option<Self> {
        (index < SLOTS_PER_DAY).then_some(Self(index as u8))
    }

    /// Slot whose interval contains `time`
    pub fn containing(time: NaiveTime) -> Self {
        Self((minute_of_day(time) / SLOT_MINUTES) as u8)
    }

    /// Slot starting exactly at `time`, `None` if `time` is not aligned
    pub fn starting_at(time: NaiveTime) -> Option<Self> {
        is_aligned(time).then(|| Self::containing(time))
    }

    pub fn index(self) -> u32 {
        u32::from(self.0)
    }

    pub fn start_time(self) -> NaiveTime {
        time_at_minute(self.index() * SLOT_MINUTES)
    }

    /// Slot `n` places later on the same day
    pub fn offset(self, n: u32) -> Option<Slot> {
        Slot::new(self.index() + n)
    }

    /// Slots left in the day counting this one
    pub fn remaining_in_day(self) -> u32 {
        SLOTS_PER_DAY - self.index()
    }

    /// Boundary `count` slots after this slot's start.
    ///
    /// The end of the last slot is reported as `00:00`, meaning midnight at
    /// the end of the same day.
    pub fn end_after(self, count: u32) -> NaiveTime {
        time_at_minute((self.index() + count) * SLOT_MINUTES)
    }

    /// Every slot of a day, in order
    pub fn all() -> impl Iterator<Item = Slot> {
        (0..SLOTS_PER_DAY).map(|i| Slot(i as u8))
    }
}

impl TryFrom<u32> for Slot {
    type Error = String;

    fn try_from(index: u32) -> Result<Self, Self::Error> {
        Slot::new(index).ok_or_else(|| format!("slot index {index} is outside 0..{SLOTS_PER_DAY}"))
    }
}

impl From<Slot> for u32 {
    fn from(slot: Slot) -> Self {
        slot.index()
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start_time().format("%H:%M"))
    }
}

fn minute_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

fn time_at_minute(minute: u32) -> NaiveTime {
    NaiveTime::from_num_seconds_from_midnight_opt((minute % MINUTES_PER_DAY) * 60, 0)
        .unwrap_or_default()
}

/// Round down to the slot boundary. Seconds are dropped.
///
/// `14:32 → 14:30`, `09:07 → 09:00`
pub fn floor_to_slot(time: NaiveTime) -> NaiveTime {
    let minute = minute_of_day(time);
    time_at_minute(minute - minute % SLOT_MINUTES)
}

/// Round up to the next slot boundary; aligned input is returned unchanged.
///
/// `14:32 → 14:45`. Returns `None` when rounding up would pass midnight.
pub fn ceil_to_slot(time: NaiveTime) -> Option<NaiveTime> {
    if is_aligned(time) {
        return Some(time);
    }
    let next = (minute_of_day(time) / SLOT_MINUTES + 1) * SLOT_MINUTES;
    (next < MINUTES_PER_DAY).then(|| time_at_minute(next))
}

/// True when `time` sits exactly on a slot boundary
pub fn is_aligned(time: NaiveTime) -> bool {
    time.minute() % SLOT_MINUTES == 0 && time.second() == 0 && time.nanosecond() == 0
}

/// Whole slots between two times; 0 if `end <= start`
pub fn slots_between(start: NaiveTime, end: NaiveTime) -> u32 {
    if end <= start {
        return 0;
    }
    (end.signed_duration_since(start).num_minutes() as u32) / SLOT_MINUTES
}

/// Hours between two times; 0 if `end <= start`
pub fn duration_hours(start: NaiveTime, end: NaiveTime) -> f64 {
    if end <= start {
        return 0.0;
    }
    end.signed_duration_since(start).num_minutes() as f64 / 60.0
}

/// Hours covered by `slots` slots
pub fn slots_to_hours(slots: u32) -> f64 {
    f64::from(slots) * HOURS_PER_SLOT
}

/// Whole slots that fit in `hours`
pub fn hours_to_slots(hours: f64) -> u32 {
    if hours <= 0.0 {
        return 0;
    }
    (hours / HOURS_PER_SLOT).floor() as u32
}

/// Next boundary, wrapping at midnight
pub fn next_slot(time: NaiveTime) -> NaiveTime {
    time.overflowing_add_signed(Duration::minutes(i64::from(SLOT_MINUTES))).0
}

/// Previous boundary, wrapping at midnight
pub fn previous_slot(time: NaiveTime) -> NaiveTime {
    time.overflowing_sub_signed(Duration::minutes(i64::from(SLOT_MINUTES))).0
}

/// All 96 slot boundaries of a day
pub fn day_slots() -> Vec<NaiveTime> {
    Slot::all().map(Slot::start_time).collect()
}

/// Slot boundaries in `[floor(start), end)`, at most [`MAX_BOOKING_SLOTS`]
pub fn slots_in_range(start: NaiveTime, end: NaiveTime) -> Vec<NaiveTime> {
    if end <= start {
        return Vec::new();
    }
    let first = Slot::containing(start);
    (0..MAX_BOOKING_SLOTS)
        .map_while(|n| first.offset(n))
        .map(Slot::start_time)
        .take_while(|t| *t < end)
        .collect()
}

/// Booking lengths the engine accepts: `0 < hours <= 4`
pub fn is_valid_duration(hours: f64) -> bool {
    hours > 0.0 && hours <= MAX_BOOKING_HOURS
}

/// True when `date time` lies before `now`
pub fn is_in_past(date: NaiveDate, time: NaiveTime, now: NaiveDateTime) -> bool {
    NaiveDateTime::new(date, time) < now
}

/// Half-open interval overlap: touching periods do not overlap
pub fn periods_overlap(
    start1: NaiveTime,
    end1: NaiveTime,
    start2: NaiveTime,
    end2: NaiveTime,
) -> bool {
    start1 < end2 && start2 < end1
}

/// `2.5 → "2.5 hours"`, `0.75 → "45 minutes"`
pub fn format_duration(hours: f64) -> String {
    if hours >= 1.0 {
        format!("{hours:.1} hours")
    } else {
        format!("{} minutes", (hours * 60.0) as u32)
    }
}

/// `"Mar 02, 2026 10:00 - 14:00"`
pub fn format_time_range(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> String {
    format!(
        "{} {} - {}",
        date.format("%b %d, %Y"),
        start.format("%H:%M"),
        end.format("%H:%M")
    )
}
