//! Scheduling-assistant proposals: parsing, conflict detection, and screening
//! against resolved free time.
//!
//! Adjacent proposals (one ends exactly when the next starts) are NOT conflicts.

use chrono::NaiveDateTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::clock::parse_local_datetime;
use crate::error::{FreeTimeError, Result};
use crate::resolver::FreeTime;

/// A task placement proposed by the assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledItem {
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl ScheduledItem {
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    pub fn overlaps(&self, other: &ScheduledItem) -> bool {
        self.start < other.end && other.start < self.end
    }
}

#[derive(Deserialize)]
struct RawScheduledItem {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    start: Option<String>,
    #[serde(default)]
    end: Option<String>,
}

/// The assistant answers either with a bare array or with `{"events": [...]}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawResponse {
    List(Vec<RawScheduledItem>),
    Wrapped { events: Vec<RawScheduledItem> },
}

/// Parse the assistant's JSON answer into scheduled items in `tz`.
///
/// # Errors
/// `FreeTimeError::Json` if the payload is not one of the accepted shapes;
/// `FreeTimeError::MalformedProposal` for an item with a missing title, an
/// unparseable time, or `end <= start`.
pub fn parse_scheduled_items(json: &str, tz: Tz) -> Result<Vec<ScheduledItem>> {
    let raw = match serde_json::from_str::<RawResponse>(json)? {
        RawResponse::List(items) => items,
        RawResponse::Wrapped { events } => events,
    };
    raw.into_iter()
        .enumerate()
        .map(|(index, item)| {
            let malformed = |reason: String| FreeTimeError::MalformedProposal { index, reason };
            let title = item
                .title
                .filter(|t| !t.trim().is_empty())
                .ok_or_else(|| malformed("missing title".to_string()))?;
            let start = item
                .start
                .as_deref()
                .and_then(|s| parse_local_datetime(s, tz))
                .ok_or_else(|| malformed(format!("bad start: {:?}", item.start)))?;
            let end = item
                .end
                .as_deref()
                .and_then(|s| parse_local_datetime(s, tz))
                .ok_or_else(|| malformed(format!("bad end: {:?}", item.end)))?;
            if end <= start {
                return Err(malformed(format!("ends ({}) at or before start ({})", end, start)));
            }
            Ok(ScheduledItem { title, start, end })
        })
        .collect()
}

/// A detected overlap between two proposals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conflict {
    pub first: ScheduledItem,
    pub second: ScheduledItem,
    pub overlap_minutes: i64,
}

/// Find every pair of proposals whose time ranges overlap.
///
/// The overlap duration is `min(a.end, b.end) - max(a.start, b.start)`.
pub fn find_conflicts(items: &[ScheduledItem]) -> Vec<Conflict> {
    let mut conflicts = Vec::new();

    for (i, a) in items.iter().enumerate() {
        for b in &items[i + 1..] {
            if a.overlaps(b) {
                let overlap_start = a.start.max(b.start);
                let overlap_end = a.end.min(b.end);
                conflicts.push(Conflict {
                    first: a.clone(),
                    second: b.clone(),
                    overlap_minutes: (overlap_end - overlap_start).num_minutes(),
                });
            }
        }
    }

    conflicts
}

/// Why a proposal was turned away.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rejection {
    /// Not contained in any single free slot.
    OutsideFreeTime,
    /// Overlaps a proposal accepted before it.
    Overlaps { with: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedItem {
    pub item: ScheduledItem,
    pub reason: Rejection,
}

/// Result of screening proposals against free time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Screening {
    pub accepted: Vec<ScheduledItem>,
    pub rejected: Vec<RejectedItem>,
}

/// Proposals that do not fit inside a single free slot.
pub fn check_proposals<'a>(items: &'a [ScheduledItem], free: &FreeTime) -> Vec<&'a ScheduledItem> {
    items
        .iter()
        .filter(|item| free.slot_containing(item.start, item.end).is_none())
        .collect()
}

/// Accept proposals in order, rejecting those outside free time or
/// overlapping an already accepted proposal.
pub fn screen_proposals(items: Vec<ScheduledItem>, free: &FreeTime) -> Screening {
    let mut screening = Screening::default();
    for item in items {
        let reason = if free.slot_containing(item.start, item.end).is_none() {
            Some(Rejection::OutsideFreeTime)
        } else {
            screening
                .accepted
                .iter()
                .find(|taken| taken.overlaps(&item))
                .map(|taken| Rejection::Overlaps {
                    with: taken.title.clone(),
                })
        };
        match reason {
            Some(reason) => screening.rejected.push(RejectedItem { item, reason }),
            None => screening.accepted.push(item),
        }
    }
    screening
}
