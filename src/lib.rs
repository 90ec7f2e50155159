//! Planning core for ProJED: task hierarchy, dependency scheduling, and the
//! date/pixel engine behind the timeline view.

pub mod config;
pub mod drag;
pub mod error;
pub mod io;
pub mod layout;
pub mod logging;
pub mod model;
pub mod planner;
pub mod schedule;

pub use config::Settings;
pub use drag::{DragController, DragMode, DragPreview};
pub use error::{DragError, PersistError, StoreError};
pub use layout::{build_draw_model, Bar, BarShape, DrawFilter, DrawModel, Label, LabelSide};
pub use logging::init_logging;
pub use model::{
    Anchor, DateUpdate, Dependency, DependencyGraph, DependencyId, DependencyKind, Granularity,
    Project, Task, TaskFields, TaskId, TaskKind, TaskStatus, TaskStore, Timeline,
    TimelineViewport, UndoHistory,
};
pub use planner::Planner;
pub use schedule::{ConstraintPolicy, ScheduleReport, Scheduler, Shift};

/// Returns the crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
