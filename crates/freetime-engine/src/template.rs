//! Weekly work-hours template.
//!
//! Seven entries indexed Sunday=0 through Saturday=6, each a single wall-clock
//! window. A template is validated when built and is read-only afterwards;
//! resolution copies entries out of it and never writes back.

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{FreeTimeError, Result};
use crate::interval::Interval;

/// Weekdays in template order (Sunday first).
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Template slot for a weekday (Sunday=0 .. Saturday=6).
pub fn weekday_index(weekday: Weekday) -> usize {
    weekday.num_days_from_sunday() as usize
}

/// Raw work hours for one weekday, as written in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayHours {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl DayHours {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }
}

impl Default for DayHours {
    /// 07:00 to 22:00.
    fn default() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(7, 0, 0).unwrap_or(NaiveTime::MIN),
            end: NaiveTime::from_hms_opt(22, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyTemplate {
    days: [Interval<NaiveTime>; 7],
}

impl WeeklyTemplate {
    /// Build a template from seven entries in Sunday-first order.
    ///
    /// # Errors
    /// Returns `FreeTimeError::InvalidTemplate` naming the first weekday whose
    /// start is not strictly before its end.
    pub fn new(hours: [DayHours; 7]) -> Result<Self> {
        let [sun, mon, tue, wed, thu, fri, sat] = hours;
        Ok(Self {
            days: [
                window(Weekday::Sun, sun)?,
                window(Weekday::Mon, mon)?,
                window(Weekday::Tue, tue)?,
                window(Weekday::Wed, wed)?,
                window(Weekday::Thu, thu)?,
                window(Weekday::Fri, fri)?,
                window(Weekday::Sat, sat)?,
            ],
        })
    }

    /// The same work hours on every weekday.
    pub fn uniform(start: NaiveTime, end: NaiveTime) -> Result<Self> {
        Self::new([DayHours::new(start, end); 7])
    }

    /// Return a copy of this template with one weekday's hours replaced.
    pub fn with_hours(&self, weekday: Weekday, start: NaiveTime, end: NaiveTime) -> Result<Self> {
        let slot = window(weekday, DayHours::new(start, end))?;
        let mut days = self.days;
        days[weekday_index(weekday)] = slot;
        Ok(Self { days })
    }

    pub fn hours(&self, weekday: Weekday) -> Interval<NaiveTime> {
        self.days[weekday_index(weekday)]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Weekday, Interval<NaiveTime>)> + '_ {
        WEEKDAYS.iter().copied().zip(self.days.iter().copied())
    }
}

fn window(weekday: Weekday, hours: DayHours) -> Result<Interval<NaiveTime>> {
    Interval::new(hours.start, hours.end).ok_or(FreeTimeError::InvalidTemplate {
        weekday,
        start: hours.start,
        end: hours.end,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn sunday_is_slot_zero() {
        assert_eq!(weekday_index(Weekday::Sun), 0);
        assert_eq!(weekday_index(Weekday::Sat), 6);
    }

    fn default_template() -> WeeklyTemplate {
        WeeklyTemplate::new([DayHours::default(); 7]).unwrap()
    }

    #[test]
    fn default_is_seven_to_ten() {
        for (_, hours) in default_template().iter() {
            assert_eq!(hours.start(), t(7, 0));
            assert_eq!(hours.end(), t(22, 0));
        }
    }

    #[test]
    fn each_entry_lands_on_its_weekday() {
        let hours = [0, 1, 2, 3, 4, 5, 6].map(|i| DayHours::new(t(8 + i, 0), t(20, i)));
        let template = WeeklyTemplate::new(hours).unwrap();
        for (weekday, slot) in template.iter() {
            let i = weekday.num_days_from_sunday();
            assert_eq!(slot.start(), t(8 + i, 0));
            assert_eq!(slot.end(), t(20, i));
            assert_eq!(template.hours(weekday), slot);
        }
    }

    #[test]
    fn first_invalid_weekday_is_reported() {
        let mut hours = [DayHours::default(); 7];
        hours[2] = DayHours::new(t(9, 0), t(9, 0));
        hours[5] = DayHours::new(t(18, 0), t(9, 0));
        match WeeklyTemplate::new(hours) {
            Err(FreeTimeError::InvalidTemplate { weekday, start, end }) => {
                assert_eq!((weekday, start, end), (Weekday::Tue, t(9, 0), t(9, 0)))
            }
            other => panic!("expected InvalidTemplate, got {:?}", other),
        }
    }

    #[test]
    fn inverted_entry_names_its_weekday() {
        let mut hours = [DayHours::default(); 7];
        hours[3] = DayHours::new(t(18, 0), t(9, 0));
        match WeeklyTemplate::new(hours) {
            Err(FreeTimeError::InvalidTemplate { weekday, .. }) => {
                assert_eq!(weekday, Weekday::Wed)
            }
            other => panic!("expected InvalidTemplate, got {:?}", other),
        }
    }

    #[test]
    fn with_hours_returns_a_modified_copy() {
        let base = default_template();
        let changed = base.with_hours(Weekday::Fri, t(9, 0), t(17, 0)).unwrap();
        assert_eq!(base.hours(Weekday::Fri).start(), t(7, 0));
        assert_eq!(changed.hours(Weekday::Fri).start(), t(9, 0));
        assert_eq!(changed.hours(Weekday::Thu), base.hours(Weekday::Thu));
    }
}
