//! Task candidates from the task store and their ranking.

use serde::{Deserialize, Serialize};

/// Label given to tasks whose priority was never set. Sorts below any label
/// starting with a letter.
pub const UNSET_PRIORITY: &str = "0";

/// A schedulable, not-yet-done task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCandidate {
    pub title: String,
    /// User-assigned label ("High", "Low", ...). Compared as an opaque string.
    #[serde(default)]
    pub priority: Option<String>,
    /// Rough duration hint in minutes, if the task store has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimate_minutes: Option<u32>,
}

impl TaskCandidate {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            priority: None,
            estimate_minutes: None,
        }
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    pub fn with_estimate(mut self, minutes: u32) -> Self {
        self.estimate_minutes = Some(minutes);
        self
    }

    pub fn priority_label(&self) -> &str {
        self.priority.as_deref().unwrap_or(UNSET_PRIORITY)
    }
}

/// Order tasks by priority label, descending.
///
/// Unset priorities become [`UNSET_PRIORITY`] first. Labels compare as plain
/// strings, so "Low" ranks above "High"; the sort is stable, so tasks sharing
/// a label keep their input order.
pub fn rank(tasks: Vec<TaskCandidate>) -> Vec<TaskCandidate> {
    let mut ranked: Vec<TaskCandidate> = tasks
        .into_iter()
        .map(|mut task| {
            task.priority.get_or_insert_with(|| UNSET_PRIORITY.to_string());
            task
        })
        .collect();
    ranked.sort_by(|a, b| b.priority_label().cmp(a.priority_label()));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(tasks: &[TaskCandidate]) -> Vec<&str> {
        tasks.iter().map(|t| t.title.as_str()).collect()
    }

    #[test]
    fn labels_sort_descending_as_strings() {
        let ranked = rank(vec![
            TaskCandidate::new("a").with_priority("High"),
            TaskCandidate::new("b").with_priority("Low"),
            TaskCandidate::new("c"),
        ]);
        assert_eq!(titles(&ranked), vec!["b", "a", "c"]);
    }

    #[test]
    fn unset_priority_is_normalized() {
        let ranked = rank(vec![TaskCandidate::new("x")]);
        assert_eq!(ranked[0].priority.as_deref(), Some(UNSET_PRIORITY));
    }

    #[test]
    fn equal_labels_keep_input_order() {
        let ranked = rank(vec![
            TaskCandidate::new("first").with_priority("P1"),
            TaskCandidate::new("second").with_priority("P1"),
            TaskCandidate::new("third").with_priority("P2"),
        ]);
        assert_eq!(titles(&ranked), vec!["third", "first", "second"]);
    }
}
