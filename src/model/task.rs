use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;

/// Stable identifier of a task.
pub type TaskId = Uuid;

/// Canonical on-disk and on-screen date format.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Level of a task in the board hierarchy (list / card / checklist entry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Group,
    Unit,
    Step,
}

impl TaskKind {
    /// The kind a direct child of this kind must have, if any.
    pub fn child_kind(self) -> Option<TaskKind> {
        match self {
            TaskKind::Group => Some(TaskKind::Unit),
            TaskKind::Unit => Some(TaskKind::Step),
            TaskKind::Step => None,
        }
    }

    /// Nesting depth, 0 for groups.
    pub fn depth(self) -> usize {
        match self {
            TaskKind::Group => 0,
            TaskKind::Unit => 1,
            TaskKind::Step => 2,
        }
    }

    pub fn default_title(self) -> &'static str {
        match self {
            TaskKind::Group => "New group",
            TaskKind::Unit => "New unit",
            TaskKind::Step => "New step",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TaskKind::Group => "group",
            TaskKind::Unit => "unit",
            TaskKind::Step => "step",
        };
        f.write_str(label)
    }
}

/// Board status of a task. The scheduler ignores it; the timeline uses it for
/// colouring and filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Todo,
    Delayed,
    Completed,
    Unsure,
    OnHold,
}

impl TaskStatus {
    pub fn all() -> &'static [TaskStatus] {
        &[
            TaskStatus::Todo,
            TaskStatus::Delayed,
            TaskStatus::Completed,
            TaskStatus::Unsure,
            TaskStatus::OnHold,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Todo => "To do",
            TaskStatus::Delayed => "Delayed",
            TaskStatus::Completed => "Completed",
            TaskStatus::Unsure => "Unsure",
            TaskStatus::OnHold => "On hold",
        }
    }
}

/// A single entry of the hierarchy: a group, a unit or a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub kind: TaskKind,
    pub title: String,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub status: TaskStatus,
    /// Hidden tasks keep being scheduled but get no timeline row.
    pub visible: bool,
    pub parent: Option<TaskId>,
    /// Ordered child ids (units of a group, steps of a unit).
    pub children: Vec<TaskId>,
}

impl Task {
    /// Create a task with a default `[start, start + duration_days]` range.
    /// Negative or out-of-calendar durations collapse to a single day.
    pub fn new(
        kind: TaskKind,
        title: impl Into<String>,
        start: NaiveDate,
        duration_days: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            title: title.into(),
            start: Some(start),
            end: Some(add_days_or_keep(start, duration_days.max(0))),
            status: TaskStatus::Todo,
            visible: true,
            parent: None,
            children: Vec::new(),
        }
    }

    /// A task carrying only an end date.
    pub fn is_milestone(&self) -> bool {
        self.start.is_none() && self.end.is_some()
    }

    /// Both anchors, when the task is fully dated.
    pub fn range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.start?, self.end?))
    }

    /// Length of the range in days (`end - start`).
    pub fn duration_days(&self) -> Option<i64> {
        self.range().map(|(s, e)| (e - s).num_days())
    }
}

/// Parse a user-supplied date field.
///
/// An empty (or whitespace-only) string clears the field; anything else must
/// be a real calendar date in `YYYY-MM-DD` form.
pub fn parse_date_field(field: &'static str, value: &str) -> Result<Option<NaiveDate>, StoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map(Some)
        .map_err(|_| StoreError::InvalidDate {
            field,
            value: value.to_string(),
        })
}

/// `date + days`, or `date` itself when the sum leaves the calendar.
pub fn add_days_or_keep(date: NaiveDate, days: i64) -> NaiveDate {
    chrono::Duration::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .unwrap_or(date)
}

/// Format an optional date for text fields and exports.
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_field_accepts_iso_dates_and_blank() {
        assert_eq!(
            parse_date_field("start", "2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert_eq!(parse_date_field("start", "   ").unwrap(), None);
    }

    #[test]
    fn parse_date_field_rejects_impossible_and_foreign_formats() {
        for bad in ["2023-02-29", "2024-13-01", "10/01/2024", "tomorrow", "2024-1-5x"] {
            let err = parse_date_field("end", bad).unwrap_err();
            assert!(matches!(err, StoreError::InvalidDate { field: "end", .. }), "{bad}");
        }
    }

    #[test]
    fn unusable_durations_give_a_one_day_task() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        for duration in [i64::MAX, 400_000_000, -5] {
            let task = Task::new(TaskKind::Unit, "Build", day, duration);
            assert_eq!(task.range(), Some((day, day)), "{duration}");
        }
    }

    #[test]
    fn milestone_has_only_an_end() {
        let mut task = Task::new(TaskKind::Step, "Ship", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 3);
        assert!(!task.is_milestone());
        assert_eq!(task.duration_days(), Some(3));
        task.start = None;
        assert!(task.is_milestone());
        assert_eq!(task.range(), None);
    }
}
