//! Busy events fetched from external calendars.
//!
//! Providers hand over loosely typed start/end values; [`normalize_events`]
//! turns a whole batch into local [`BusyEvent`]s or fails on the first malformed
//! entry. Nothing is dropped silently.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::clock::parse_local_datetime;
use crate::error::{FreeTimeError, Result};

/// Latest representable wall-clock instant of a day. Used as the end of an
/// event that runs past midnight.
pub(crate) const END_OF_DAY: NaiveTime = match NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999)
{
    Some(t) => t,
    None => NaiveTime::MIN,
};

/// A start or end value as providers send it: either a bare string, or a
/// Google-style object with `dateTime` for timed events and `date` for all-day ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventTime {
    Text(String),
    Object {
        #[serde(rename = "dateTime", default, skip_serializing_if = "Option::is_none")]
        date_time: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        date: Option<String>,
    },
}

impl EventTime {
    /// The timestamp text, preferring `dateTime` over `date`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            EventTime::Text(s) => Some(s),
            EventTime::Object { date_time, date } => date_time.as_deref().or(date.as_deref()),
        }
    }
}

impl From<&str> for EventTime {
    fn from(s: &str) -> Self {
        EventTime::Text(s.to_string())
    }
}

/// A busy event as received from a calendar provider, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawBusyEvent {
    #[serde(default)]
    pub start: Option<EventTime>,
    #[serde(default)]
    pub end: Option<EventTime>,
}

impl RawBusyEvent {
    pub fn new(start: &str, end: &str) -> Self {
        Self {
            start: Some(start.into()),
            end: Some(end.into()),
        }
    }
}

/// A validated busy period in the user's local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BusyEvent {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl BusyEvent {
    /// Build an event, or `None` if it ends before it starts.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// The day this event is charged to, with its wall-clock span on that day.
    ///
    /// Events belong to the date of their start. One that ends on a later date
    /// occupies the rest of its start day.
    pub fn day_span(&self) -> (NaiveDate, NaiveTime, NaiveTime) {
        let date = self.start.date();
        let end = if self.end.date() > date {
            END_OF_DAY
        } else {
            self.end.time()
        };
        (date, self.start.time(), end)
    }

    pub fn is_instant(&self) -> bool {
        self.start == self.end
    }
}

/// Validate one raw event. `index` is its position in the batch, used for errors.
pub fn parse_event(index: usize, raw: &RawBusyEvent, tz: Tz) -> Result<BusyEvent> {
    let start = parse_bound(index, "start", raw.start.as_ref(), tz)?;
    let end = parse_bound(index, "end", raw.end.as_ref(), tz)?;
    BusyEvent::new(start, end).ok_or_else(|| FreeTimeError::MalformedBusyEvent {
        index,
        reason: format!("ends ({}) before it starts ({})", end, start),
    })
}

/// Validate a batch of raw events. All-or-nothing: the first malformed event
/// fails the whole batch.
pub fn normalize_events(raw: &[RawBusyEvent], tz: Tz) -> Result<Vec<BusyEvent>> {
    raw.iter()
        .enumerate()
        .map(|(index, event)| parse_event(index, event, tz))
        .collect()
}

fn parse_bound(
    index: usize,
    which: &str,
    value: Option<&EventTime>,
    tz: Tz,
) -> Result<NaiveDateTime> {
    let text = value
        .and_then(EventTime::as_str)
        .ok_or_else(|| FreeTimeError::MalformedBusyEvent {
            index,
            reason: format!("missing {}", which),
        })?;
    parse_local_datetime(text, tz).ok_or_else(|| FreeTimeError::MalformedBusyEvent {
        index,
        reason: format!("unparseable {}: {:?}", which, text),
    })
}
