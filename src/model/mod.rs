pub mod dependency;
pub mod graph;
pub mod history;
pub mod project;
pub mod store;
pub mod task;
pub mod timeline;

pub use dependency::{Anchor, Dependency, DependencyId, DependencyKind};
pub use graph::DependencyGraph;
pub use history::UndoHistory;
pub use project::Project;
pub use store::{DateUpdate, TaskFields, TaskStore};
pub use task::{Task, TaskId, TaskKind, TaskStatus};
pub use timeline::{Granularity, Timeline, TimelineViewport};
