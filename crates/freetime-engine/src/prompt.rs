//! Text rendering of ranked tasks and free time for the scheduling assistant.

use chrono::NaiveDateTime;

use crate::resolver::{FreeTime, ResolveOptions};
use crate::tasks::TaskCandidate;

const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

fn iso(dt: &NaiveDateTime) -> String {
    dt.format(ISO_FORMAT).to_string()
}

/// One line per task: `"{title}, Priority: {label}"`, plus the estimate when known.
pub fn render_task_list(tasks: &[TaskCandidate]) -> String {
    let mut out = String::new();
    for task in tasks {
        out.push_str(&format!("{}, Priority: {}", task.title, task.priority_label()));
        if let Some(minutes) = task.estimate_minutes {
            out.push_str(&format!(", Estimate: {} min", minutes));
        }
        out.push('\n');
    }
    out
}

/// Free slots grouped by day, numbered from 1, as ISO-8601 start/end pairs.
/// Each day block is followed by a blank line; a day without free slots still
/// gets its header.
pub fn render_free_time(free: &FreeTime) -> String {
    let mut out = String::new();
    for (n, day) in free.iter().enumerate() {
        out.push_str(&format!("Day {}:\n", n + 1));
        for slot in &day.slots {
            out.push_str(&format!(
                "dateTime start: {}, dateTime end: {}\n",
                iso(&slot.start()),
                iso(&slot.end())
            ));
        }
        out.push('\n');
    }
    out
}

/// Full assistant input: instructions, the ranked task list, and free time.
pub fn build_prompt(tasks: &[TaskCandidate], free: &FreeTime, options: &ResolveOptions) -> String {
    format!(
        "You are a personal assistant planning the user's upcoming days.\n\
         For each task below, estimate how long it will take and place it inside the user's free time.\n\
         Higher-priority tasks come first in the list.\n\
         Answer with start and end times in ISO-8601 local time.\n\
         The minimum length of a scheduled task is {} minutes.\n\
         Several small tasks may share one free interval, but tasks must not overlap.\n\
         \n\
         Tasks to schedule:\n\
         {}\n\
         Intervals of time the user is free:\n\
         {}",
        options.minimum_slot_minutes,
        render_task_list(tasks),
        render_free_time(free),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::Interval;
    use crate::resolver::FreeTimeDay;
    use chrono::{Datelike, NaiveDate};

    fn free_time() -> FreeTime {
        let date = NaiveDate::from_ymd_opt(2026, 3, 16).unwrap();
        let at = |h, m| date.and_hms_opt(h, m, 0).unwrap();
        FreeTime {
            days: vec![
                FreeTimeDay {
                    date,
                    weekday: date.weekday(),
                    slots: vec![Interval::new(at(7, 0), at(9, 0)).unwrap()],
                },
                FreeTimeDay {
                    date: date.succ_opt().unwrap(),
                    weekday: date.succ_opt().unwrap().weekday(),
                    slots: vec![],
                },
            ],
        }
    }

    #[test]
    fn task_lines_include_estimate_when_known() {
        let tasks = vec![
            TaskCandidate::new("Write report").with_priority("High"),
            TaskCandidate::new("Email").with_estimate(15),
        ];
        assert_eq!(
            render_task_list(&tasks),
            "Write report, Priority: High\nEmail, Priority: 0, Estimate: 15 min\n"
        );
    }

    #[test]
    fn free_time_is_grouped_by_day() {
        assert_eq!(
            render_free_time(&free_time()),
            "Day 1:\ndateTime start: 2026-03-16T07:00:00, dateTime end: 2026-03-16T09:00:00\n\nDay 2:\n\n"
        );
    }

    #[test]
    fn prompt_states_minimum_length() {
        let prompt = build_prompt(&[], &free_time(), &ResolveOptions::default());
        assert!(prompt.contains("minimum length of a scheduled task is 15 minutes"));
        assert!(prompt.contains("Day 1:"));
    }
}
