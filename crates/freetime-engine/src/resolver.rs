//! Free-time resolution.
//!
//! Seeds each day of the horizon with its work-hours window, trims today to
//! what is still ahead of "now", carves busy events out, anchors the result to
//! calendar dates and finally applies the pruning and buffer rules.
//!
//! Every step builds a fresh interval list instead of editing one in place, and
//! every interval that leaves this module satisfies `start < end`.

use chrono::{Datelike, Days, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::busy::BusyEvent;
use crate::clock::truncate_to_now;
use crate::error::{FreeTimeError, Result};
use crate::interval::Interval;
use crate::template::WeeklyTemplate;

/// Longest horizon a single call will resolve.
pub const MAX_HORIZON_DAYS: u32 = 366;

/// Tunables for one resolution run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveOptions {
    /// Slots shorter than this are not worth offering.
    pub minimum_slot_minutes: u32,
    /// Shaved off both ends of interior slots.
    pub travel_buffer_minutes: u32,
    /// Shaved off the end of the first slot and the start of the last slot.
    pub commute_buffer_minutes: u32,
    /// Minimum useful work block; together with twice the travel buffer it
    /// forms the pruning threshold.
    pub prune_block_minutes: u32,
    /// When false, today starts at its template start whatever the time is.
    pub truncate_to_now: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            minimum_slot_minutes: 15,
            travel_buffer_minutes: 10,
            commute_buffer_minutes: 30,
            prune_block_minutes: 30,
            truncate_to_now: true,
        }
    }
}

impl ResolveOptions {
    /// Slots at or below this many minutes are pruned on busy days.
    pub fn prune_threshold_minutes(&self) -> i64 {
        2 * i64::from(self.travel_buffer_minutes) + i64::from(self.prune_block_minutes)
    }
}

/// Free slots remaining on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FreeTimeDay {
    pub date: NaiveDate,
    pub weekday: Weekday,
    /// Chronological, disjoint, never empty-width.
    pub slots: Vec<Interval<NaiveDateTime>>,
}

impl FreeTimeDay {
    pub fn total_minutes(&self) -> i64 {
        self.slots.iter().map(|slot| slot.duration_minutes()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Resolved free time for the whole horizon, one entry per day starting today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FreeTime {
    pub days: Vec<FreeTimeDay>,
}

impl FreeTime {
    pub fn day(&self, date: NaiveDate) -> Option<&FreeTimeDay> {
        self.days.iter().find(|d| d.date == date)
    }

    /// First day in the horizon falling on `weekday`.
    pub fn weekday(&self, weekday: Weekday) -> Option<&FreeTimeDay> {
        self.days.iter().find(|d| d.weekday == weekday)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FreeTimeDay> {
        self.days.iter()
    }

    pub fn slots(&self) -> impl Iterator<Item = &Interval<NaiveDateTime>> {
        self.days.iter().flat_map(|d| d.slots.iter())
    }

    /// The free slot wholly containing `[start, end)`, if any.
    pub fn slot_containing(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Option<&Interval<NaiveDateTime>> {
        let wanted = Interval::new(start, end)?;
        self.slots().find(|slot| slot.contains(&wanted))
    }
}

/// How a busy span relates to one free slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Carve {
    /// Busy span ends at or before the slot starts.
    EndsBefore,
    /// Busy span starts at or after the slot ends.
    StartsAfter,
    /// Starts at or before the slot and ends inside it: the slot loses its head.
    ClipsStart,
    /// Starts inside the slot and runs to or past its end: the slot loses its tail.
    ClipsEnd,
    /// Strictly inside the slot: the slot splits in two.
    Inside,
    /// Covers the whole slot: the slot disappears.
    Covers,
}

impl Carve {
    pub fn classify(
        slot: &Interval<NaiveTime>,
        busy_start: NaiveTime,
        busy_end: NaiveTime,
    ) -> Self {
        if busy_end <= slot.start() {
            Carve::EndsBefore
        } else if busy_start >= slot.end() {
            Carve::StartsAfter
        } else if busy_start <= slot.start() && busy_end < slot.end() {
            Carve::ClipsStart
        } else if busy_start > slot.start() && busy_end >= slot.end() {
            Carve::ClipsEnd
        } else if busy_start > slot.start() && busy_end < slot.end() {
            Carve::Inside
        } else {
            Carve::Covers
        }
    }
}

/// Remove `[busy_start, busy_end)` from a day's free slots.
///
/// Each slot is folded through the busy span into a new list, so a split
/// lands directly after its left half and order is preserved. A zero-length
/// span carves nothing.
pub fn subtract_event(
    free: &[Interval<NaiveTime>],
    busy_start: NaiveTime,
    busy_end: NaiveTime,
) -> Vec<Interval<NaiveTime>> {
    if busy_end <= busy_start {
        return free.to_vec();
    }
    free.iter().fold(Vec::with_capacity(free.len() + 1), |mut out, slot| {
        let carve = Carve::classify(slot, busy_start, busy_end);
        trace!(?carve, slot_start = %slot.start(), slot_end = %slot.end(), "carving slot");
        match carve {
            Carve::EndsBefore | Carve::StartsAfter => out.push(*slot),
            Carve::ClipsStart => out.extend(Interval::new(busy_end, slot.end())),
            Carve::ClipsEnd => out.extend(Interval::new(slot.start(), busy_start)),
            Carve::Inside => {
                out.extend(Interval::new(slot.start(), busy_start));
                out.extend(Interval::new(busy_end, slot.end()));
            }
            Carve::Covers => {}
        }
        out
    })
}

/// On days with more than two slots, drop every slot no longer than the
/// pruning threshold. Days with one or two slots are left alone.
pub fn prune_short_gaps(
    slots: Vec<Interval<NaiveDateTime>>,
    options: &ResolveOptions,
) -> Vec<Interval<NaiveDateTime>> {
    if slots.len() <= 2 {
        return slots;
    }
    let threshold = options.prune_threshold_minutes();
    slots
        .into_iter()
        .filter(|slot| slot.duration_minutes() > threshold)
        .collect()
}

/// Shrink both ends of every interior slot (not first, not last) by the travel
/// buffer. Needs at least three slots; a slot the buffer would invert is dropped.
pub fn apply_travel_buffer(
    slots: Vec<Interval<NaiveDateTime>>,
    travel_minutes: u32,
) -> Vec<Interval<NaiveDateTime>> {
    let count = slots.len();
    if count < 3 {
        return slots;
    }
    let travel = Duration::minutes(i64::from(travel_minutes));
    slots
        .into_iter()
        .enumerate()
        .filter_map(|(i, slot)| {
            if i == 0 || i == count - 1 {
                return Some(slot);
            }
            shrink_or_drop(slot, travel, travel)
        })
        .collect()
}

/// On days with more than two slots, pull the end of the first slot and the
/// start of the last slot inward by the commute buffer. A slot the buffer
/// would invert is dropped.
pub fn apply_commute_buffer(
    slots: Vec<Interval<NaiveDateTime>>,
    commute_minutes: u32,
) -> Vec<Interval<NaiveDateTime>> {
    let count = slots.len();
    if count <= 2 {
        return slots;
    }
    let commute = Duration::minutes(i64::from(commute_minutes));
    slots
        .into_iter()
        .enumerate()
        .filter_map(|(i, slot)| match i {
            0 => shrink_or_drop(slot, Duration::zero(), commute),
            i if i == count - 1 => shrink_or_drop(slot, commute, Duration::zero()),
            _ => Some(slot),
        })
        .collect()
}

/// Drop slots shorter than the minimum usable length.
pub fn drop_unusable(
    slots: Vec<Interval<NaiveDateTime>>,
    minimum_slot_minutes: u32,
) -> Vec<Interval<NaiveDateTime>> {
    let minimum = i64::from(minimum_slot_minutes);
    slots
        .into_iter()
        .filter(|slot| slot.duration_minutes() >= minimum)
        .collect()
}

fn shrink_or_drop(
    slot: Interval<NaiveDateTime>,
    from_start: Duration,
    from_end: Duration,
) -> Option<Interval<NaiveDateTime>> {
    let shrunk = slot.shrink(from_start, from_end);
    if shrunk.is_none() {
        warn!(
            start = %slot.start(),
            end = %slot.end(),
            "buffer would invert slot; dropping it"
        );
    }
    shrunk
}

/// Resolve free time for `horizon_days` days starting on `now`'s date.
///
/// `now` is injected so runs are reproducible. Busy events are charged to the
/// date they start on; events starting outside the horizon have no day to
/// carve and are skipped.
///
/// # Errors
/// - `FreeTimeError::InvalidHorizon` if `horizon_days` is 0, exceeds
///   [`MAX_HORIZON_DAYS`], or runs past the last representable date.
/// - `FreeTimeError::MalformedBusyEvent` if any event ends before it starts.
///
/// Validation happens before any work, so a failed call has no partial output.
pub fn resolve(
    horizon_days: u32,
    template: &WeeklyTemplate,
    busy: &[BusyEvent],
    now: NaiveDateTime,
    options: &ResolveOptions,
) -> Result<FreeTime> {
    if !(1..=MAX_HORIZON_DAYS).contains(&horizon_days) {
        return Err(FreeTimeError::InvalidHorizon(horizon_days));
    }
    let today = now.date();
    let dates = horizon_dates(today, horizon_days)
        .ok_or(FreeTimeError::InvalidHorizon(horizon_days))?;
    if let Some((index, event)) = busy.iter().enumerate().find(|(_, e)| e.end < e.start) {
        return Err(FreeTimeError::MalformedBusyEvent {
            index,
            reason: format!("ends ({}) before it starts ({})", event.end, event.start),
        });
    }

    debug!(%today, horizon_days, events = busy.len(), "resolving free time");

    // Seed every day with a copy of its template window.
    let mut days: Vec<Vec<Interval<NaiveTime>>> = dates
        .iter()
        .map(|date| vec![template.hours(date.weekday())])
        .collect();

    if options.truncate_to_now {
        let hours = template.hours(today.weekday());
        days[0] = truncate_to_now(hours, now.time()).into_iter().collect();
        debug!(now = %now.time(), remaining = days[0].len(), "truncated today");
    }

    for event in busy {
        let (date, busy_start, busy_end) = event.day_span();
        let offset = (date - today).num_days();
        let Some(day) = usize::try_from(offset).ok().and_then(|i| days.get_mut(i)) else {
            trace!(%date, "busy event outside horizon");
            continue;
        };
        *day = subtract_event(day.as_slice(), busy_start, busy_end);
    }

    let days = dates
        .into_iter()
        .zip(days)
        .map(|(date, slots)| {
            let anchored: Vec<_> = slots.iter().map(|slot| slot.on(date)).collect();
            let day = FreeTimeDay {
                date,
                weekday: date.weekday(),
                slots: finish_day(anchored, options),
            };
            debug!(
                %date,
                slots = day.slots.len(),
                free_minutes = day.total_minutes(),
                "resolved day"
            );
            day
        })
        .collect();

    Ok(FreeTime { days })
}

/// `days` consecutive dates starting at `first`, or `None` past the calendar's end.
fn horizon_dates(first: NaiveDate, days: u32) -> Option<Vec<NaiveDate>> {
    (0..u64::from(days))
        .map(|offset| first.checked_add_days(Days::new(offset)))
        .collect()
}

fn finish_day(
    slots: Vec<Interval<NaiveDateTime>>,
    options: &ResolveOptions,
) -> Vec<Interval<NaiveDateTime>> {
    let slots = prune_short_gaps(slots, options);
    let slots = apply_travel_buffer(slots, options.travel_buffer_minutes);
    let slots = apply_commute_buffer(slots, options.commute_buffer_minutes);
    drop_unusable(slots, options.minimum_slot_minutes)
}
