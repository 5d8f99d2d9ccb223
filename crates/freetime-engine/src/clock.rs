//! Wall-clock helpers: quarter-hour rounding, "now" truncation, and parsing
//! provider timestamps into the user's local time.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use chrono_tz::Tz;

use crate::interval::Interval;

const QUARTER_HOUR_SECS: u32 = 15 * 60;
const DAY_SECS: u32 = 24 * 60 * 60;

/// Round `now` up to the next :00/:15/:30/:45 boundary at or after it.
///
/// A time already on a boundary (with zero seconds) is returned unchanged.
/// Returns `None` when the next boundary is midnight, i.e. there is no
/// quarter-hour left in the day.
pub fn round_up_to_quarter_hour(now: NaiveTime) -> Option<NaiveTime> {
    let secs = now.num_seconds_from_midnight();
    let on_boundary = secs % QUARTER_HOUR_SECS == 0 && now.nanosecond() == 0;
    let quarters = secs / QUARTER_HOUR_SECS + u32::from(!on_boundary);
    let rounded = quarters * QUARTER_HOUR_SECS;
    if rounded >= DAY_SECS {
        return None;
    }
    NaiveTime::from_num_seconds_from_midnight_opt(rounded, 0)
}

/// Cut today's work-hours window down to what is still ahead of `now`.
///
/// - `now` at or past the end: nothing is left (`None`).
/// - `now` after the start: the start moves to the next quarter hour.
/// - otherwise the window is returned as is.
pub fn truncate_to_now(hours: Interval<NaiveTime>, now: NaiveTime) -> Option<Interval<NaiveTime>> {
    if now >= hours.end() {
        return None;
    }
    if now <= hours.start() {
        return Some(hours);
    }
    let start = round_up_to_quarter_hour(now)?;
    Interval::new(start, hours.end())
}

/// Parse a provider timestamp into a local wall-clock date-time in `tz`.
///
/// Accepted forms:
/// - RFC 3339 with offset (`2026-03-16T09:00:00-05:00`), converted into `tz`
/// - naive local date-time (`2026-03-16T09:00:00`, `2026-03-16T09:00`)
/// - all-day date (`2026-03-16`), read as local midnight
pub fn parse_local_datetime(raw: &str, tz: Tz) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&tz).naive_local());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn rounds_up_within_the_hour() {
        assert_eq!(round_up_to_quarter_hour(t(10, 3, 0)), Some(t(10, 15, 0)));
        assert_eq!(round_up_to_quarter_hour(t(10, 16, 0)), Some(t(10, 30, 0)));
        assert_eq!(round_up_to_quarter_hour(t(10, 44, 59)), Some(t(10, 45, 0)));
    }

    #[test]
    fn past_three_quarters_rolls_to_next_hour() {
        assert_eq!(round_up_to_quarter_hour(t(10, 46, 0)), Some(t(11, 0, 0)));
        assert_eq!(round_up_to_quarter_hour(t(10, 59, 59)), Some(t(11, 0, 0)));
    }

    #[test]
    fn boundaries_stay_put() {
        assert_eq!(round_up_to_quarter_hour(t(10, 0, 0)), Some(t(10, 0, 0)));
        assert_eq!(round_up_to_quarter_hour(t(10, 45, 0)), Some(t(10, 45, 0)));
        assert_eq!(round_up_to_quarter_hour(t(10, 15, 1)), Some(t(10, 30, 0)));
    }

    #[test]
    fn late_evening_has_no_boundary_left() {
        assert_eq!(round_up_to_quarter_hour(t(23, 50, 0)), None);
        assert_eq!(round_up_to_quarter_hour(t(23, 45, 0)), Some(t(23, 45, 0)));
    }

    #[test]
    fn truncation_cases() {
        let hours = Interval::new(t(7, 0, 0), t(22, 0, 0)).unwrap();
        assert_eq!(truncate_to_now(hours, t(6, 30, 0)), Some(hours));
        assert_eq!(truncate_to_now(hours, t(7, 0, 0)), Some(hours));
        assert_eq!(
            truncate_to_now(hours, t(10, 3, 0)).map(|i| i.start()),
            Some(t(10, 15, 0))
        );
        assert_eq!(truncate_to_now(hours, t(22, 0, 0)), None);
        assert_eq!(truncate_to_now(hours, t(21, 50, 0)), None);
    }

    #[test]
    fn parses_offsets_into_zone() {
        let tz: Tz = "America/Chicago".parse().unwrap();
        let dt = parse_local_datetime("2026-03-16T14:00:00Z", tz).unwrap();
        assert_eq!(dt.time(), t(9, 0, 0));
        let naive = parse_local_datetime("2026-03-16T14:00:00", tz).unwrap();
        assert_eq!(naive.time(), t(14, 0, 0));
        let all_day = parse_local_datetime("2026-03-16", tz).unwrap();
        assert_eq!(all_day.time(), NaiveTime::MIN);
        assert!(parse_local_datetime("next tuesday", tz).is_none());
    }
}
