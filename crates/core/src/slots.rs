//! # Slot computation
//!
//! Computes the bookable start times for one employee, one service and one
//! calendar day. Candidates are generated on a fixed grid (30 minutes by
//! default) starting at the beginning of the working window; a candidate is
//! kept when the service fits before the end of the window and does not
//! overlap the break or any existing booking.
//!
//! The grid scan never offers a start time that is off the grid, even when a
//! free gap would allow it. Callers should treat the result as "every
//! grid-aligned slot", not "every bookable minute".
//!
//! All interval arithmetic is done in seconds since midnight, so a service
//! that would run past 24:00 is compared as such rather than wrapping around.

use std::fmt;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::errors::{BookingError, BookingResult};

/// Grid step used when no other interval is configured.
pub const DEFAULT_SLOT_INTERVAL_MINUTES: u32 = 30;

/// Service length assumed when nothing more specific is known.
pub const DEFAULT_SERVICE_MINUTES: u32 = 60;

const SECONDS_PER_MINUTE: i64 = 60;

/// A wall-clock time with no date component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    pub fn from_hms(hour: u32, minute: u32, second: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, second).map(Self)
    }

    pub fn as_naive(&self) -> NaiveTime {
        self.0
    }

    /// Whole seconds since midnight. Sub-second precision is dropped.
    pub fn seconds_from_midnight(&self) -> i64 {
        i64::from(self.0.num_seconds_from_midnight())
    }

    fn from_seconds(seconds: i64) -> Option<Self> {
        let seconds = u32::try_from(seconds).ok()?;
        NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0).map(Self)
    }

    /// `HH:MM` rendering used for slot labels.
    pub fn display(&self) -> String {
        self.0.format("%H:%M").to_string()
    }
}

impl From<NaiveTime> for TimeOfDay {
    fn from(time: NaiveTime) -> Self {
        Self(time)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M:%S"))
    }
}

/// An employee's active hours on a given weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkWindow {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl WorkWindow {
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self { start, end }
    }
}

/// A sub-range of the working window in which nothing may be scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakWindow {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl BreakWindow {
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self { start, end }
    }

    fn overlaps(&self, start: i64, end: i64) -> bool {
        overlaps(
            start,
            end,
            self.start.seconds_from_midnight(),
            self.end.seconds_from_midnight(),
        )
    }
}

/// An existing appointment occupying `[start, start + duration_minutes)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyInterval {
    pub start: TimeOfDay,
    pub duration_minutes: u32,
}

impl BusyInterval {
    pub fn new(start: TimeOfDay, duration_minutes: u32) -> Self {
        Self {
            start,
            duration_minutes,
        }
    }

    fn start_seconds(&self) -> i64 {
        self.start.seconds_from_midnight()
    }

    fn end_seconds(&self) -> i64 {
        self.start_seconds() + i64::from(self.duration_minutes) * SECONDS_PER_MINUTE
    }

    fn overlaps_seconds(&self, start: i64, end: i64) -> bool {
        overlaps(start, end, self.start_seconds(), self.end_seconds())
    }

    /// Whether a service of `duration` starting at `start` would collide with
    /// this booking.
    pub fn overlaps(&self, start: TimeOfDay, duration: ServiceDuration) -> bool {
        let start = start.seconds_from_midnight();
        self.overlaps_seconds(start, start + duration.seconds())
    }
}

/// Length of a service in minutes. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct ServiceDuration(u32);

impl ServiceDuration {
    pub fn new(minutes: i64) -> BookingResult<Self> {
        match u32::try_from(minutes) {
            Ok(minutes) if minutes > 0 => Ok(Self(minutes)),
            _ => Err(BookingError::Validation(format!(
                "Service duration must be a positive number of minutes, got {}",
                minutes
            ))),
        }
    }

    pub fn minutes(&self) -> u32 {
        self.0
    }

    fn seconds(&self) -> i64 {
        i64::from(self.0) * SECONDS_PER_MINUTE
    }
}

impl Default for ServiceDuration {
    fn default() -> Self {
        Self(DEFAULT_SERVICE_MINUTES)
    }
}

impl TryFrom<i64> for ServiceDuration {
    type Error = BookingError;

    fn try_from(minutes: i64) -> Result<Self, Self::Error> {
        Self::new(minutes)
    }
}

impl From<ServiceDuration> for u32 {
    fn from(duration: ServiceDuration) -> Self {
        duration.0
    }
}

/// A bookable start time together with its `HH:MM` label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableSlot {
    pub time: TimeOfDay,
    pub display: String,
}

impl AvailableSlot {
    pub fn at(time: TimeOfDay) -> Self {
        Self {
            display: time.display(),
            time,
        }
    }
}

/// Scans a working window on a fixed grid and yields the start times that fit.
///
/// # Example
///
/// ```
/// use slotbook_core::slots::{ServiceDuration, SlotFinder, TimeOfDay, WorkWindow};
///
/// let work = WorkWindow::new(
///     TimeOfDay::from_hms(9, 0, 0).unwrap(),
///     TimeOfDay::from_hms(11, 0, 0).unwrap(),
/// );
/// let duration = ServiceDuration::new(60).unwrap();
///
/// let slots = SlotFinder::default().find_available_slots(&work, None, duration, &[]);
/// let labels: Vec<_> = slots.iter().map(|s| s.display.as_str()).collect();
/// assert_eq!(labels, ["09:00", "09:30", "10:00"]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotFinder {
    step_minutes: u32,
}

impl Default for SlotFinder {
    fn default() -> Self {
        Self {
            step_minutes: DEFAULT_SLOT_INTERVAL_MINUTES,
        }
    }
}

impl SlotFinder {
    /// Creates a finder with a custom grid step. A zero step is rejected since
    /// the scan would never advance.
    pub fn with_step_minutes(step_minutes: u32) -> BookingResult<Self> {
        if step_minutes == 0 {
            return Err(BookingError::Validation(
                "Slot interval must be at least one minute".to_string(),
            ));
        }
        Ok(Self { step_minutes })
    }

    pub fn step_minutes(&self) -> u32 {
        self.step_minutes
    }

    /// Returns every grid-aligned start time in `work` at which a service of
    /// `duration` fits without touching `brk` or any of `busy`.
    ///
    /// `busy` may be unordered, overlapping, or lie outside the window. An
    /// inverted or zero-width window produces no slots.
    pub fn find_available_slots(
        &self,
        work: &WorkWindow,
        brk: Option<&BreakWindow>,
        duration: ServiceDuration,
        busy: &[BusyInterval],
    ) -> Vec<AvailableSlot> {
        let work_end = work.end.seconds_from_midnight();
        let step = i64::from(self.step_minutes) * SECONDS_PER_MINUTE;

        let mut slots = Vec::new();
        let mut cursor = work.start.seconds_from_midnight();

        while cursor < work_end {
            let slot_end = cursor + duration.seconds();

            let break_conflict = brk.is_some_and(|b| b.overlaps(cursor, slot_end));
            let busy_conflict = busy.iter().any(|b| b.overlaps_seconds(cursor, slot_end));
            let overrun = slot_end > work_end;

            if !(break_conflict || busy_conflict || overrun) {
                if let Some(time) = TimeOfDay::from_seconds(cursor) {
                    slots.push(AvailableSlot::at(time));
                }
            }

            cursor += step;
        }

        slots
    }
}

/// Slot search with the default 30-minute grid.
pub fn find_available_slots(
    work: &WorkWindow,
    brk: Option<&BreakWindow>,
    duration: ServiceDuration,
    busy: &[BusyInterval],
) -> Vec<AvailableSlot> {
    SlotFinder::default().find_available_slots(work, brk, duration, busy)
}

// Half-open overlap of [a_start, a_end) and [b_start, b_end).
fn overlaps(a_start: i64, a_end: i64, b_start: i64, b_end: i64) -> bool {
    a_start < b_end && a_end > b_start
}
