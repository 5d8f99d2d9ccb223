//! Seams to the external collaborators: calendar provider, task store and
//! scheduling assistant.
//!
//! The engine never talks to a network itself. Implementations of these traits
//! live with the caller and hand over already-fetched data; their failures are
//! reported as `FreeTimeError::Collaborator`.

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::busy::RawBusyEvent;
use crate::error::Result;
use crate::proposal::ScheduledItem;
use crate::tasks::TaskCandidate;

/// Local half-open range `[start, end)` to query a calendar for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    /// Midnight of `first` up to midnight after `days` days, or `None` when
    /// that end lies past the last representable date.
    pub fn days_from(first: NaiveDate, days: u32) -> Option<Self> {
        let last = first.checked_add_days(Days::new(u64::from(days)))?;
        Some(Self {
            start: first.and_time(NaiveTime::MIN),
            end: last.and_time(NaiveTime::MIN),
        })
    }
}

pub trait CalendarProvider {
    /// Busy events on `calendar_id` within `range`, in the provider's wire shape.
    fn busy_events(&self, calendar_id: &str, range: &DateRange) -> Result<Vec<RawBusyEvent>>;

    /// Create an entry for `item` on `calendar_id`, returning its identifier.
    fn create_entry(&self, calendar_id: &str, item: &ScheduledItem) -> Result<String>;

    /// Delete a previously created entry.
    fn delete_entry(&self, calendar_id: &str, entry_id: &str) -> Result<()>;
}

pub trait TaskStore {
    /// Tasks that are not done and are marked schedulable.
    fn schedulable_tasks(&self) -> Result<Vec<TaskCandidate>>;
}

pub trait SchedulingAssistant {
    /// Turn the rendered prompt into proposed placements.
    fn propose(&self, prompt: &str) -> Result<Vec<ScheduledItem>>;
}
