//! Working windows, view windows and chart granularity.
//!
//! # Time Model
//! All timestamps are naive wall-clock times in the plant's local zone, the
//! same way the backend stores planned dates. No zone conversion happens
//! inside the board.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Daily working window used when a record carries no planned dates.
///
/// Defaults to the 08:00–17:00 shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingWindow {
    /// Shift start (inclusive).
    pub start: NaiveTime,
    /// Shift end (exclusive).
    pub end: NaiveTime,
}

impl WorkingWindow {
    /// Creates a working window.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// The window anchored on `date`.
    pub fn on(&self, date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
        (date.and_time(self.start), date.and_time(self.end))
    }

    /// Whether the shift ends after it starts.
    pub fn is_well_formed(&self) -> bool {
        self.start < self.end
    }
}

impl Default for WorkingWindow {
    fn default() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default(),
            end: NaiveTime::from_hms_opt(17, 0, 0).unwrap_or_default(),
        }
    }
}

/// Chart time-axis granularity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    #[default]
    Day,
    Week,
    Month,
}

impl Granularity {
    /// Padding added before the earliest and after the latest task so bars
    /// never touch the chart edge.
    pub fn buffer(self) -> Duration {
        match self {
            Self::Day => Duration::days(1),
            Self::Week => Duration::days(7),
            Self::Month => Duration::days(30),
        }
    }
}

/// Visible time range hint handed to the renderer: `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl ViewWindow {
    /// Days before `now` shown when there is nothing to schedule.
    pub const EMPTY_LEAD_DAYS: i64 = 7;
    /// Days after `now` shown when there is nothing to schedule.
    pub const EMPTY_TRAIL_DAYS: i64 = 30;

    /// Creates a view window.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// The window shown for an empty board.
    pub fn around(now: NaiveDateTime) -> Self {
        Self::new(
            saturating_sub(now, Duration::days(Self::EMPTY_LEAD_DAYS)),
            saturating_add(now, Duration::days(Self::EMPTY_TRAIL_DAYS)),
        )
    }

    /// `[earliest - buffer, latest + buffer)`, clamped to the representable range.
    pub fn padded(earliest: NaiveDateTime, latest: NaiveDateTime, buffer: Duration) -> Self {
        Self::new(saturating_sub(earliest, buffer), saturating_add(latest, buffer))
    }

    /// Length of the window.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Whether a timestamp falls within this window.
    pub fn contains(&self, time: NaiveDateTime) -> bool {
        time >= self.start && time < self.end
    }
}

fn saturating_sub(time: NaiveDateTime, delta: Duration) -> NaiveDateTime {
    time.checked_sub_signed(delta).unwrap_or(NaiveDateTime::MIN)
}

fn saturating_add(time: NaiveDateTime, delta: Duration) -> NaiveDateTime {
    time.checked_add_signed(delta).unwrap_or(NaiveDateTime::MAX)
}

/// Whole days covered by `[start, end)`, rounded up, never less than one.
pub fn duration_days(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    const DAY_MS: i64 = 86_400_000;
    let span_ms = (end - start).num_milliseconds();
    if span_ms <= 0 {
        return 1;
    }
    ((span_ms + DAY_MS - 1) / DAY_MS).max(1)
}
