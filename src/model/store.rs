//! Owned task hierarchy.
//!
//! # Invariants
//! - Groups have no parent; units live under groups; steps live under units.
//! - Every non-group task appears exactly once in its parent's `children`.
//! - Removing a task removes its whole subtree.

use std::collections::HashMap;

use chrono::NaiveDate;

use super::task::{parse_date_field, Task, TaskId, TaskKind, TaskStatus};
use crate::error::StoreError;

/// A partial change of a task's dates.
///
/// `None` leaves a field untouched, `Some(None)` clears it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateUpdate {
    pub start: Option<Option<NaiveDate>>,
    pub end: Option<Option<NaiveDate>>,
}

impl DateUpdate {
    /// Set both anchors at once.
    pub fn range(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(Some(start)),
            end: Some(Some(end)),
        }
    }

    pub fn start(start: Option<NaiveDate>) -> Self {
        Self {
            start: Some(start),
            end: None,
        }
    }

    pub fn end(end: Option<NaiveDate>) -> Self {
        Self {
            start: None,
            end: Some(end),
        }
    }

    /// Validate raw text fields. Each provided string must be empty (clear)
    /// or a `YYYY-MM-DD` calendar date.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, StoreError> {
        Ok(Self {
            start: start.map(|s| parse_date_field("start", s)).transpose()?,
            end: end.map(|s| parse_date_field("end", s)).transpose()?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// A partial change of a task's non-date fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFields {
    pub title: Option<String>,
    pub status: Option<TaskStatus>,
    pub visible: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskStore {
    tasks: HashMap<TaskId, Task>,
    groups: Vec<TaskId>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.tasks.contains_key(&id)
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(&id)
    }

    /// Top-level group ids in board order.
    pub fn groups(&self) -> &[TaskId] {
        &self.groups
    }

    pub fn children(&self, id: TaskId) -> &[TaskId] {
        self.tasks
            .get(&id)
            .map(|t| t.children.as_slice())
            .unwrap_or(&[])
    }

    /// All tasks in depth-first board order.
    pub fn walk(&self) -> Vec<&Task> {
        let mut out = Vec::with_capacity(self.tasks.len());
        let mut stack: Vec<TaskId> = self.groups.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if let Some(task) = self.tasks.get(&id) {
                out.push(task);
                stack.extend(task.children.iter().rev().copied());
            }
        }
        out
    }

    /// Ids of every task below `id` (not including `id`).
    pub fn descendants(&self, id: TaskId) -> Vec<TaskId> {
        let mut out = Vec::new();
        let mut stack: Vec<TaskId> = self.children(id).to_vec();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend_from_slice(self.children(next));
        }
        out
    }

    /// Create a task under `parent` with a default date range starting `today`.
    pub fn create(
        &mut self,
        kind: TaskKind,
        parent: Option<TaskId>,
        title: &str,
        today: NaiveDate,
        duration_days: i64,
    ) -> Result<TaskId, StoreError> {
        let title = if title.trim().is_empty() {
            kind.default_title()
        } else {
            title.trim()
        };
        let mut task = Task::new(kind, title, today, duration_days);
        task.parent = parent;
        let id = task.id;
        self.insert(task)?;
        Ok(id)
    }

    /// Attach an existing task record (used when loading files).
    ///
    /// The task is appended to its parent's children; its own `children`
    /// list is reset and rebuilt as descendants are inserted.
    pub fn insert(&mut self, mut task: Task) -> Result<(), StoreError> {
        self.check_parent(task.kind, task.parent)?;
        task.children.clear();
        let id = task.id;
        match task.parent {
            Some(parent) => {
                if let Some(p) = self.tasks.get_mut(&parent) {
                    p.children.push(id);
                }
            }
            None => self.groups.push(id),
        }
        self.tasks.insert(id, task);
        Ok(())
    }

    fn check_parent(&self, kind: TaskKind, parent: Option<TaskId>) -> Result<(), StoreError> {
        match (kind, parent) {
            (TaskKind::Group, None) => Ok(()),
            (TaskKind::Group, Some(p)) => Err(StoreError::InvalidParent {
                kind,
                parent: p.to_string(),
            }),
            (_, None) => Err(StoreError::InvalidParent {
                kind,
                parent: "the board root".to_string(),
            }),
            (_, Some(p)) => {
                let parent = self.tasks.get(&p).ok_or(StoreError::TaskNotFound(p))?;
                if parent.kind.child_kind() == Some(kind) {
                    Ok(())
                } else {
                    Err(StoreError::InvalidParent {
                        kind,
                        parent: format!("{} '{}'", parent.kind, parent.title),
                    })
                }
            }
        }
    }

    /// Apply a date change. Returns whether anything differed.
    pub fn update_dates(&mut self, id: TaskId, update: &DateUpdate) -> Result<bool, StoreError> {
        let task = self.tasks.get_mut(&id).ok_or(StoreError::TaskNotFound(id))?;
        let before = (task.start, task.end);
        if let Some(start) = update.start {
            task.start = start;
        }
        if let Some(end) = update.end {
            task.end = end;
        }
        Ok(before != (task.start, task.end))
    }

    /// Overwrite both anchors; used by the scheduler for cascaded writes.
    pub(crate) fn set_range(&mut self, id: TaskId, start: NaiveDate, end: NaiveDate) -> Result<(), StoreError> {
        let task = self.tasks.get_mut(&id).ok_or(StoreError::TaskNotFound(id))?;
        task.start = Some(start);
        task.end = Some(end);
        Ok(())
    }

    pub fn update_fields(&mut self, id: TaskId, fields: &TaskFields) -> Result<bool, StoreError> {
        let task = self.tasks.get_mut(&id).ok_or(StoreError::TaskNotFound(id))?;
        let mut changed = false;
        if let Some(title) = &fields.title {
            if task.title != *title {
                task.title = title.clone();
                changed = true;
            }
        }
        if let Some(status) = fields.status {
            changed |= task.status != status;
            task.status = status;
        }
        if let Some(visible) = fields.visible {
            changed |= task.visible != visible;
            task.visible = visible;
        }
        Ok(changed)
    }

    /// Remove a task and its subtree. Returns every removed id, `id` first.
    pub fn remove(&mut self, id: TaskId) -> Result<Vec<TaskId>, StoreError> {
        let task = self.tasks.get(&id).ok_or(StoreError::TaskNotFound(id))?;
        let parent = task.parent;

        let mut removed = vec![id];
        removed.extend(self.descendants(id));
        for gone in &removed {
            self.tasks.remove(gone);
        }

        match parent {
            Some(p) => {
                if let Some(parent) = self.tasks.get_mut(&p) {
                    parent.children.retain(|c| *c != id);
                }
            }
            None => self.groups.retain(|g| *g != id),
        }
        Ok(removed)
    }
}
