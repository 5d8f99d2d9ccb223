//! One auto-scheduling run: busy events in, calendar entries out.
//!
//! The planner owns no state between runs. It reads the [`Config`] it was given,
//! calls the collaborators in a fixed order and reports what happened. Stored
//! entry ids are only deleted once the assistant has answered, so a failed run
//! leaves the previous plan in place.
//!
//! Calendar writes are attempted one entry at a time. A failed delete or create
//! is recorded in the report and the run moves on, so every entry that did
//! reach the calendar is still accounted for.

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::busy::normalize_events;
use crate::config::Config;
use crate::error::{FreeTimeError, Result};
use crate::prompt::build_prompt;
use crate::proposal::{screen_proposals, RejectedItem, ScheduledItem};
use crate::provider::{CalendarProvider, DateRange, SchedulingAssistant, TaskStore};
use crate::resolver::{resolve, FreeTime};
use crate::tasks::rank;

/// Outcome of a planning run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanReport {
    pub free_time: FreeTime,
    pub accepted: Vec<ScheduledItem>,
    pub rejected: Vec<RejectedItem>,
    /// Ids of entries deleted from the scheduling calendar.
    pub deleted_ids: Vec<String>,
    /// Ids of entries created on the scheduling calendar, in `accepted` order.
    /// Items whose create failed have no id here.
    pub created_ids: Vec<String>,
    /// Calendar writes that failed, in the order they were attempted.
    pub failed: Vec<FailedWrite>,
}

impl PlanReport {
    fn empty(free_time: FreeTime) -> Self {
        Self {
            free_time,
            accepted: Vec::new(),
            rejected: Vec::new(),
            deleted_ids: Vec::new(),
            created_ids: Vec::new(),
            failed: Vec::new(),
        }
    }

    /// Entry ids the next run must clear: old entries whose delete failed,
    /// followed by everything created in this run.
    pub fn pending_entry_ids(&self) -> Vec<String> {
        self.failed
            .iter()
            .filter_map(|failure| match failure {
                FailedWrite::Delete { entry_id, .. } => Some(entry_id.clone()),
                FailedWrite::Create { .. } => None,
            })
            .chain(self.created_ids.iter().cloned())
            .collect()
    }
}

/// A calendar write that did not go through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum FailedWrite {
    /// The old entry is still on the calendar.
    Delete { entry_id: String, message: String },
    /// The accepted item was never written.
    Create { item: ScheduledItem, message: String },
}

pub struct Planner<'a, C, T, A> {
    config: &'a Config,
    calendar: &'a C,
    tasks: &'a T,
    assistant: &'a A,
}

impl<'a, C, T, A> Planner<'a, C, T, A>
where
    C: CalendarProvider,
    T: TaskStore,
    A: SchedulingAssistant,
{
    pub fn new(config: &'a Config, calendar: &'a C, tasks: &'a T, assistant: &'a A) -> Self {
        Self {
            config,
            calendar,
            tasks,
            assistant,
        }
    }

    /// Fetch busy events from every configured calendar and resolve free time.
    pub fn free_time(&self, horizon_days: u32, now: NaiveDateTime) -> Result<FreeTime> {
        let range = DateRange::days_from(now.date(), horizon_days)
            .ok_or(FreeTimeError::InvalidHorizon(horizon_days))?;
        let tz = self.config.timezone()?;
        let template = self.config.template()?;

        let mut busy = Vec::new();
        for calendar_id in &self.config.calendars {
            let raw = self.calendar.busy_events(calendar_id, &range)?;
            debug!(calendar_id = %calendar_id, events = raw.len(), "fetched busy events");
            busy.extend(normalize_events(&raw, tz)?);
        }

        resolve(
            horizon_days,
            &template,
            &busy,
            now,
            &self.config.resolve_options(),
        )
    }

    /// Plan the next `horizon_days` days and write accepted proposals to the
    /// scheduling calendar.
    ///
    /// Errors before the calendar writes abort the run. Failed writes do not:
    /// they land in [`PlanReport::failed`].
    pub fn run(&self, horizon_days: u32, now: NaiveDateTime) -> Result<PlanReport> {
        let free_time = self.free_time(horizon_days, now)?;

        let tasks = rank(self.tasks.schedulable_tasks()?);
        if tasks.is_empty() {
            info!("no schedulable tasks; nothing to plan");
            return Ok(PlanReport::empty(free_time));
        }

        let prompt = build_prompt(&tasks, &free_time, &self.config.resolve_options());
        let proposals = self.assistant.propose(&prompt)?;
        let screening = screen_proposals(proposals, &free_time);
        for rejected in &screening.rejected {
            warn!(
                title = %rejected.item.title,
                reason = ?rejected.reason,
                "rejected proposal"
            );
        }

        let mut report = PlanReport {
            accepted: screening.accepted,
            rejected: screening.rejected,
            ..PlanReport::empty(free_time)
        };
        self.replace_entries(&mut report);

        info!(
            tasks = tasks.len(),
            accepted = report.accepted.len(),
            rejected = report.rejected.len(),
            created = report.created_ids.len(),
            failed = report.failed.len(),
            "planning run complete"
        );

        Ok(report)
    }

    /// Delete the stored entries, then create one entry per accepted item.
    fn replace_entries(&self, report: &mut PlanReport) {
        let calendar_id = &self.config.scheduling_calendar;

        for entry_id in &self.config.created_entry_ids {
            match self.calendar.delete_entry(calendar_id, entry_id) {
                Ok(()) => report.deleted_ids.push(entry_id.clone()),
                Err(err) => {
                    warn!(entry_id = %entry_id, error = %err, "failed to delete entry");
                    report.failed.push(FailedWrite::Delete {
                        entry_id: entry_id.clone(),
                        message: err.to_string(),
                    });
                }
            }
        }

        for item in &report.accepted {
            match self.calendar.create_entry(calendar_id, item) {
                Ok(id) => report.created_ids.push(id),
                Err(err) => {
                    warn!(title = %item.title, error = %err, "failed to create entry");
                    report.failed.push(FailedWrite::Create {
                        item: item.clone(),
                        message: err.to_string(),
                    });
                }
            }
        }
    }
}
