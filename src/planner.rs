//! Mutation facade over the project.
//!
//! Every user-facing change goes through [`Planner`]: it snapshots the
//! project for undo once per gesture, applies the change to the store or
//! graph, runs the scheduler from the touched task and refreshes the
//! modified timestamp. Pass `no_history = true` for programmatic edits that
//! should not become their own undo step.

use chrono::NaiveDate;

use crate::config::Settings;
use crate::error::StoreError;
use crate::layout::{build_draw_model, DrawFilter, DrawModel};
use crate::model::dependency::{Anchor, Dependency, DependencyId};
use crate::model::graph::DependencyGraph;
use crate::model::history::{Snapshot, UndoHistory};
use crate::model::project::Project;
use crate::model::store::{DateUpdate, TaskFields, TaskStore};
use crate::model::task::{TaskId, TaskKind};
use crate::model::timeline::{Timeline, TimelineViewport};
use crate::schedule::{ScheduleReport, Scheduler};

pub struct Planner {
    project: Project,
    history: UndoHistory,
    scheduler: Scheduler,
    settings: Settings,
    last_report: Option<ScheduleReport>,
}

impl Default for Planner {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl Planner {
    pub fn new(settings: Settings) -> Self {
        Self::with_project(Project::default(), settings)
    }

    pub fn with_project(project: Project, settings: Settings) -> Self {
        Self {
            project,
            history: UndoHistory::new(settings.history_depth),
            scheduler: Scheduler::new(settings.constraint_policy),
            settings,
            last_report: None,
        }
    }

    // ── Read access ─────────────────────────────────────────────

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn tasks(&self) -> &TaskStore {
        &self.project.tasks
    }

    pub fn dependencies(&self) -> &DependencyGraph {
        &self.project.dependencies
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn timeline(&self) -> Timeline {
        self.settings.timeline()
    }

    /// Report of the most recent propagation, for the status bar.
    pub fn last_report(&self) -> Option<&ScheduleReport> {
        self.last_report.as_ref()
    }

    /// Edges with `task` on either end, in insertion order.
    pub fn list_dependencies(&self, task: TaskId) -> Vec<&Dependency> {
        self.project.dependencies.touching(task).collect()
    }

    pub fn draw_model(&self, viewport: &TimelineViewport, filter: &DrawFilter) -> DrawModel {
        build_draw_model(&self.project.tasks, self.timeline(), viewport, filter)
    }

    // ── Settings / project lifecycle ────────────────────────────

    /// Swap settings. A changed history depth starts a fresh history.
    pub fn set_settings(&mut self, settings: Settings) {
        if settings.history_depth != self.history.max_depth() {
            self.history = UndoHistory::new(settings.history_depth);
        }
        self.scheduler = Scheduler::new(settings.constraint_policy);
        self.settings = settings;
    }

    /// Replace the whole project (new/open). History does not survive.
    pub fn replace_project(&mut self, project: Project) {
        tracing::info!(name = %project.name, tasks = project.tasks.len(), "project loaded");
        self.project = project;
        self.history.clear();
        self.last_report = None;
    }

    pub fn rename_project(&mut self, name: impl Into<String>) {
        self.project.name = name.into();
        self.project.touch();
    }

    // ── Task mutations ──────────────────────────────────────────

    /// Create a task dated from today.
    pub fn create_task(
        &mut self,
        kind: TaskKind,
        parent: Option<TaskId>,
        title: &str,
        no_history: bool,
    ) -> Result<TaskId, StoreError> {
        let today = chrono::Local::now().date_naive();
        self.create_task_on(kind, parent, title, today, no_history)
    }

    /// Create a task whose default range starts on `start`.
    pub fn create_task_on(
        &mut self,
        kind: TaskKind,
        parent: Option<TaskId>,
        title: &str,
        start: NaiveDate,
        no_history: bool,
    ) -> Result<TaskId, StoreError> {
        let before = self.snapshot(no_history);
        let id = self.project.tasks.create(
            kind,
            parent,
            title,
            start,
            self.settings.default_duration_days,
        )?;
        self.commit(before);
        tracing::info!(%id, %kind, "task created");
        Ok(id)
    }

    /// Change a task's dates and propagate to its dependents.
    ///
    /// A no-op update records nothing and schedules nothing.
    pub fn update_task_dates(
        &mut self,
        id: TaskId,
        update: &DateUpdate,
        no_history: bool,
    ) -> Result<ScheduleReport, StoreError> {
        let before = self.snapshot(no_history);
        if !self.project.tasks.update_dates(id, update)? {
            return Ok(ScheduleReport::new(id));
        }
        self.commit(before);
        Ok(self.propagate(id))
    }

    /// Like [`update_task_dates`](Self::update_task_dates) but from raw text
    /// fields; malformed input is rejected before anything changes.
    pub fn update_task_dates_text(
        &mut self,
        id: TaskId,
        start: Option<&str>,
        end: Option<&str>,
        no_history: bool,
    ) -> Result<ScheduleReport, StoreError> {
        let update = DateUpdate::parse(start, end)?;
        self.update_task_dates(id, &update, no_history)
    }

    pub fn update_task_fields(
        &mut self,
        id: TaskId,
        fields: &TaskFields,
        no_history: bool,
    ) -> Result<bool, StoreError> {
        let before = self.snapshot(no_history);
        let changed = self.project.tasks.update_fields(id, fields)?;
        if changed {
            self.commit(before);
        }
        Ok(changed)
    }

    /// Delete a task, its subtree and every edge touching any removed id.
    pub fn delete_task(&mut self, id: TaskId, no_history: bool) -> Result<Vec<TaskId>, StoreError> {
        let before = self.snapshot(no_history);
        let removed = self.project.tasks.remove(id)?;
        let edges = self.project.dependencies.remove_touching(&removed);
        self.commit(before);
        tracing::info!(%id, tasks = removed.len(), edges, "task deleted");
        Ok(removed)
    }

    // ── Dependency mutations ────────────────────────────────────

    /// Link two task anchors and schedule from the predecessor in the same
    /// undo step. Re-adding an existing link returns its id unchanged.
    pub fn add_dependency(
        &mut self,
        from: TaskId,
        from_side: Anchor,
        to: TaskId,
        to_side: Anchor,
        offset_days: i64,
        no_history: bool,
    ) -> Result<(DependencyId, ScheduleReport), StoreError> {
        for task in [from, to] {
            if !self.project.tasks.contains(task) {
                return Err(StoreError::TaskNotFound(task));
            }
        }
        let before = self.snapshot(no_history);
        let count = self.project.dependencies.len();
        let id = self
            .project
            .dependencies
            .add_edge(from, from_side, to, to_side, offset_days)?;
        if self.project.dependencies.len() == count {
            return Ok((id, ScheduleReport::new(from)));
        }
        self.commit(before);
        tracing::info!(%id, %from, %to, "dependency added");
        Ok((id, self.propagate(from)))
    }

    /// Remove an edge. Dates stay where they are.
    pub fn remove_dependency(
        &mut self,
        id: DependencyId,
        no_history: bool,
    ) -> Result<Dependency, StoreError> {
        let before = self.snapshot(no_history);
        let edge = self.project.dependencies.remove_edge(id)?;
        self.commit(before);
        tracing::info!(%id, "dependency removed");
        Ok(edge)
    }

    pub fn set_dependency_offset(
        &mut self,
        id: DependencyId,
        offset_days: i64,
        no_history: bool,
    ) -> Result<ScheduleReport, StoreError> {
        let before = self.snapshot(no_history);
        let from = self
            .project
            .dependencies
            .get(id)
            .map(|e| e.from_id)
            .ok_or(StoreError::DependencyNotFound(id))?;
        if !self.project.dependencies.set_offset(id, offset_days)? {
            return Ok(ScheduleReport::new(from));
        }
        self.commit(before);
        Ok(self.propagate(from))
    }

    /// Re-run propagation from `task` without changing it. Recorded as an
    /// undo step only if something moved.
    pub fn reschedule(&mut self, task: TaskId) -> Result<ScheduleReport, StoreError> {
        if !self.project.tasks.contains(task) {
            return Err(StoreError::TaskNotFound(task));
        }
        let before = Snapshot::capture(&self.project.tasks, &self.project.dependencies);
        let report = self.propagate(task);
        if report.writes() > 0 {
            self.history.record(before);
        }
        Ok(report)
    }

    // ── History ─────────────────────────────────────────────────

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    /// Restore the previous snapshot. The scheduler is not re-run.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self
            .history
            .undo(&self.project.tasks, &self.project.dependencies)
        else {
            return false;
        };
        self.restore(snapshot);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self
            .history
            .redo(&self.project.tasks, &self.project.dependencies)
        else {
            return false;
        };
        self.restore(snapshot);
        true
    }

    // ── Internals ───────────────────────────────────────────────

    fn snapshot(&self, no_history: bool) -> Option<Snapshot> {
        (!no_history).then(|| Snapshot::capture(&self.project.tasks, &self.project.dependencies))
    }

    fn commit(&mut self, before: Option<Snapshot>) {
        if let Some(snapshot) = before {
            self.history.record(snapshot);
        }
        self.project.touch();
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.project.tasks = snapshot.tasks;
        self.project.dependencies = snapshot.dependencies;
        self.project.touch();
        self.last_report = None;
    }

    fn propagate(&mut self, origin: TaskId) -> ScheduleReport {
        let report = self.scheduler.propagate(
            &mut self.project.tasks,
            &self.project.dependencies,
            origin,
        );
        self.last_report = Some(report.clone());
        report
    }
}
