//! Half-open time intervals with a guaranteed `start < end`.
//!
//! The same type carries wall-clock intervals (`Interval<NaiveTime>`) while a day
//! is being carved and anchored intervals (`Interval<NaiveDateTime>`) once the
//! day has been tied to a calendar date.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

/// A non-empty half-open interval `[start, end)`.
///
/// Construction goes through [`Interval::new`], which refuses zero-length and
/// inverted bounds, so every value in circulation satisfies `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Interval<T> {
    start: T,
    end: T,
}

impl<T: Copy + Ord> Interval<T> {
    /// Build an interval, or `None` when `start >= end`.
    pub fn new(start: T, end: T) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    pub fn start(&self) -> T {
        self.start
    }

    pub fn end(&self) -> T {
        self.end
    }

    /// Whether `other` lies entirely within this interval.
    pub fn contains(&self, other: &Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl Interval<NaiveTime> {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Anchor this wall-clock interval to a calendar date.
    pub fn on(&self, date: NaiveDate) -> Interval<NaiveDateTime> {
        Interval {
            start: date.and_time(self.start),
            end: date.and_time(self.end),
        }
    }
}

impl Interval<NaiveDateTime> {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    /// Move both ends inward. Returns `None` if the result would be empty or inverted.
    pub fn shrink(&self, from_start: Duration, from_end: Duration) -> Option<Self> {
        Self::new(self.start + from_start, self.end - from_end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn rejects_empty_and_inverted() {
        assert!(Interval::new(t(9, 0), t(9, 0)).is_none());
        assert!(Interval::new(t(10, 0), t(9, 0)).is_none());
        assert!(Interval::new(t(9, 0), t(9, 1)).is_some());
    }

    #[test]
    fn contains_includes_shared_bounds() {
        let outer = Interval::new(t(9, 0), t(12, 0)).unwrap();
        assert!(outer.contains(&outer));
        assert!(outer.contains(&Interval::new(t(9, 0), t(10, 0)).unwrap()));
        assert!(!outer.contains(&Interval::new(t(11, 0), t(12, 1)).unwrap()));
    }

    #[test]
    fn shrink_past_midpoint_is_none() {
        let day = NaiveDate::from_ymd_opt(2026, 3, 16).unwrap();
        let slot = Interval::new(t(9, 0), t(9, 20)).unwrap().on(day);
        assert!(slot
            .shrink(Duration::minutes(10), Duration::minutes(10))
            .is_none());
        let shrunk = slot
            .shrink(Duration::minutes(5), Duration::minutes(5))
            .unwrap();
        assert_eq!(shrunk.duration_minutes(), 10);
    }
}
