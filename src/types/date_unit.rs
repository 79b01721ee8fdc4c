//! The hourly granularity at which readings are requested.

use chrono::{DateTime, Datelike, Duration, DurationRound, NaiveDate, Timelike, Utc};
use std::fmt;

/// One UTC hour, always aligned to the start of the hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateUnit(DateTime<Utc>);

impl DateUnit {
    /// The unit containing `datetime`.
    pub fn floor(datetime: DateTime<Utc>) -> Self {
        Self(datetime.duration_trunc(Duration::hours(1)).unwrap_or(datetime))
    }

    /// Every unit from `floor(start)` to `floor(end)`, both inclusive, ascending.
    /// Empty when `start` is after `end`.
    pub fn range(start: DateTime<Utc>, end: DateTime<Utc>) -> DateUnitRange {
        DateUnitRange {
            next: Some(Self::floor(start)),
            last: Self::floor(end),
        }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.0
    }

    pub fn next(&self) -> Self {
        Self(self.0 + Duration::hours(1))
    }

    pub fn date(&self) -> NaiveDate {
        self.0.date_naive()
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }
}

impl fmt::Display for DateUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:00 UTC"))
    }
}

/// Iterator returned by [`DateUnit::range`].
#[derive(Debug, Clone)]
pub struct DateUnitRange {
    next: Option<DateUnit>,
    last: DateUnit,
}

impl Iterator for DateUnitRange {
    type Item = DateUnit;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        if current > self.last {
            self.next = None;
            return None;
        }
        self.next = Some(current.next());
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .next
            .map(|next| (self.last.0 - next.0).num_hours() + 1)
            .unwrap_or(0)
            .max(0) as usize;
        (remaining, Some(remaining))
    }
}
