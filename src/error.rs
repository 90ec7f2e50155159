//! Error types for the planning core.
//!
//! Each concern gets its own enum so callers can match on what actually went
//! wrong; the front-end only ever shows the `Display` text in its status bar.

use thiserror::Error;

use crate::model::task::{TaskId, TaskKind};
use crate::model::dependency::DependencyId;

/// Failures raised by the task store and dependency graph boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    #[error("dependency not found: {0}")]
    DependencyNotFound(DependencyId),

    #[error("invalid {field} date '{value}': expected YYYY-MM-DD")]
    InvalidDate { field: &'static str, value: String },

    #[error("a {kind} cannot be placed under {parent}")]
    InvalidParent { kind: TaskKind, parent: String },

    #[error("a self dependency must link the start and end of the same task")]
    SelfDependencySameSide,
}

/// Failures raised by the drag controller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DragError {
    #[error("a drag is already in progress")]
    AlreadyDragging,

    #[error("task {0} has no bar on the timeline")]
    BarNotFound(TaskId),

    #[error("task {0} has no dates yet; set them before dragging")]
    Placeholder(TaskId),

    #[error("milestones can only be moved, not resized")]
    MilestoneResize,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failures raised while reading or writing project files.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed project file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("project file is invalid: {0}")]
    Invalid(String),
}
