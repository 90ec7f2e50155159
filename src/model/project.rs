use chrono::{DateTime, Utc};

use super::graph::DependencyGraph;
use super::store::TaskStore;

/// A project: the task tree, its dependency edges, and metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub name: String,
    pub tasks: TaskStore,
    pub dependencies: DependencyGraph,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl Default for Project {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            name: "Untitled Project".to_string(),
            tasks: TaskStore::new(),
            dependencies: DependencyGraph::new(),
            created: now,
            modified: now,
        }
    }
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Touch the modified timestamp.
    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }
}
