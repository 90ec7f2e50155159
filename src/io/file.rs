//! JSON project files.
//!
//! The file keeps the board's nested shape (groups → units → steps) rather
//! than the flat in-memory store; ids are preserved so dependency edges stay
//! valid across a save/load cycle.

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PersistError;
use crate::model::dependency::{Anchor, Dependency};
use crate::model::graph::DependencyGraph;
use crate::model::project::Project;
use crate::model::store::TaskStore;
use crate::model::task::{Task, TaskId, TaskKind, TaskStatus};

/// Extension used by the file dialogs (`name.projed.json`).
pub const PROJECT_EXTENSION: &str = "json";

fn default_visible() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: TaskId,
    pub title: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRecord {
    #[serde(flatten)]
    pub task: TaskRecord,
    #[serde(default)]
    pub units: Vec<UnitRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitRecord {
    #[serde(flatten)]
    pub task: TaskRecord,
    #[serde(default)]
    pub steps: Vec<TaskRecord>,
}

/// On-disk representation of a [`Project`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectFile {
    pub name: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    #[serde(default)]
    pub groups: Vec<GroupRecord>,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

impl TaskRecord {
    fn from_task(task: &Task) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            start_date: task.start,
            end_date: task.end,
            status: task.status,
            visible: task.visible,
        }
    }

    fn into_task(self, kind: TaskKind, parent: Option<TaskId>) -> Task {
        Task {
            id: self.id,
            kind,
            title: self.title,
            start: self.start_date,
            end: self.end_date,
            status: self.status,
            visible: self.visible,
            parent,
            children: Vec::new(),
        }
    }
}

impl ProjectFile {
    pub fn from_project(project: &Project) -> Self {
        let store = &project.tasks;
        let record = |id: &TaskId| store.get(*id).map(TaskRecord::from_task);

        let groups = store
            .groups()
            .iter()
            .filter_map(|g| {
                let units = store
                    .children(*g)
                    .iter()
                    .filter_map(|u| {
                        let steps = store.children(*u).iter().filter_map(record).collect();
                        Some(UnitRecord {
                            task: record(u)?,
                            steps,
                        })
                    })
                    .collect();
                Some(GroupRecord {
                    task: record(g)?,
                    units,
                })
            })
            .collect();

        Self {
            name: project.name.clone(),
            created: project.created,
            modified: project.modified,
            groups,
            dependencies: project.dependencies.iter().cloned().collect(),
        }
    }

    /// Rebuild the in-memory project. Duplicate task ids are rejected;
    /// malformed, repeated or dangling edges are dropped with a warning.
    pub fn into_project(self) -> Result<Project, PersistError> {
        let mut tasks = TaskStore::new();
        let mut seen = HashSet::new();
        let mut insert = |tasks: &mut TaskStore, task: Task| -> Result<(), PersistError> {
            if !seen.insert(task.id) {
                return Err(PersistError::Invalid(format!("duplicate task id {}", task.id)));
            }
            tasks
                .insert(task)
                .map_err(|e| PersistError::Invalid(e.to_string()))
        };

        for group in self.groups {
            let group_id = group.task.id;
            insert(&mut tasks, group.task.into_task(TaskKind::Group, None))?;
            for unit in group.units {
                let unit_id = unit.task.id;
                insert(&mut tasks, unit.task.into_task(TaskKind::Unit, Some(group_id)))?;
                for step in unit.steps {
                    insert(&mut tasks, step.into_task(TaskKind::Step, Some(unit_id)))?;
                }
            }
        }

        let (valid, malformed): (Vec<_>, Vec<_>) = self
            .dependencies
            .into_iter()
            .partition(|e| !(e.is_self_edge() && e.from_side == e.to_side));
        if !malformed.is_empty() {
            tracing::warn!(dropped = malformed.len(), "dropped self dependencies linking the same side");
        }
        let total = valid.len();
        let mut links: HashSet<(TaskId, Anchor, TaskId, Anchor)> = HashSet::new();
        let unique: Vec<_> = valid
            .into_iter()
            .filter(|e| links.insert((e.from_id, e.from_side, e.to_id, e.to_side)))
            .collect();
        if unique.len() < total {
            tracing::warn!(dropped = total - unique.len(), "dropped duplicate dependencies");
        }
        let mut dependencies = DependencyGraph::from_edges(unique);
        dependencies.prune_dangling(&tasks);

        Ok(Project {
            name: self.name,
            tasks,
            dependencies,
            created: self.created,
            modified: self.modified,
        })
    }
}

/// Save a project to a JSON file.
pub fn save_project(project: &Project, path: &Path) -> Result<(), PersistError> {
    let json = serde_json::to_string_pretty(&ProjectFile::from_project(project))?;
    std::fs::write(path, json)?;
    tracing::info!(path = %path.display(), tasks = project.tasks.len(), "project saved");
    Ok(())
}

/// Load a project from a JSON file.
pub fn load_project(path: &Path) -> Result<Project, PersistError> {
    let json = std::fs::read_to_string(path)?;
    let file: ProjectFile = serde_json::from_str(&json)?;
    let project = file.into_project()?;
    tracing::info!(path = %path.display(), tasks = project.tasks.len(), "project opened");
    Ok(project)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_uses_camel_case_and_null_dates() {
        let record = TaskRecord {
            id: uuid::Uuid::nil(),
            title: "Ship".into(),
            start_date: None,
            end_date: NaiveDate::from_ymd_opt(2024, 3, 1),
            status: TaskStatus::OnHold,
            visible: false,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["startDate"], serde_json::Value::Null);
        assert_eq!(json["endDate"], "2024-03-01");
        assert_eq!(json["status"], "onhold");
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let id = uuid::Uuid::new_v4();
        let record = |title: &str| TaskRecord {
            id,
            title: title.into(),
            start_date: None,
            end_date: None,
            status: TaskStatus::Todo,
            visible: true,
        };
        let file = ProjectFile {
            name: "Dup".into(),
            created: Utc::now(),
            modified: Utc::now(),
            groups: vec![
                GroupRecord { task: record("A"), units: vec![] },
                GroupRecord { task: record("B"), units: vec![] },
            ],
            dependencies: vec![],
        };
        assert!(matches!(file.into_project(), Err(PersistError::Invalid(_))));
    }

    #[test]
    fn repeated_links_keep_the_first_edge() {
        let group = TaskRecord {
            id: uuid::Uuid::new_v4(),
            title: "Launch".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 10),
            status: TaskStatus::Todo,
            visible: true,
        };
        let id = group.id;
        let edge = |offset_days: i64| Dependency {
            id: uuid::Uuid::new_v4(),
            from_id: id,
            from_side: Anchor::Start,
            to_id: id,
            to_side: Anchor::End,
            offset_days,
        };
        let first = edge(2);
        let file = ProjectFile {
            name: "Repeats".into(),
            created: Utc::now(),
            modified: Utc::now(),
            dependencies: vec![first.clone(), edge(5)],
            groups: vec![GroupRecord { task: group, units: vec![] }],
        };
        let project = file.into_project().unwrap();
        let kept: Vec<_> = project.dependencies.iter().cloned().collect();
        assert_eq!(kept, vec![first]);
    }
}
