//! Dependency-driven date propagation.
//!
//! Starting from a task whose dates just changed, walk outgoing edges with an
//! explicit worklist and push dependents later until every reachable edge is
//! satisfied. Shifts translate the whole range, so durations are preserved.
//!
//! # Invariants
//! - Dependents only ever move later, so an acyclic graph always settles.
//! - A dependent that is already shifted is shifted again when a later edge
//!   still requires it, and re-queued only when it actually moved.
//! - The origin is never shifted by an incoming edge, and no task is shifted
//!   more times than there are tasks. Either limit marks the edge unresolved,
//!   which is what stops a cycle.
//! - Tasks missing a required date are treated as unconstrained, and so are
//!   requirements that fall outside the calendar.

use std::collections::{HashMap, VecDeque};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::dependency::{Anchor, Dependency, DependencyId};
use crate::model::graph::DependencyGraph;
use crate::model::store::TaskStore;
use crate::model::task::{Task, TaskId};

/// How several incoming edges on one anchor combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintPolicy {
    /// Edges are applied one at a time in insertion order; each is checked
    /// against the dependent's dates as they are at that moment.
    #[default]
    Sequential,
    /// Before shifting a dependent, every incoming edge on the constrained
    /// anchor is folded into one maximum requirement.
    MostRestrictive,
}

/// One cascaded write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shift {
    pub task: TaskId,
    pub before: (NaiveDate, NaiveDate),
    pub after: (NaiveDate, NaiveDate),
    /// Edge that forced the move.
    pub via: DependencyId,
}

/// Outcome of one propagation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleReport {
    pub origin: TaskId,
    pub shifts: Vec<Shift>,
    /// Violated edges left alone because their dependent is the origin or
    /// has hit its shift limit (a cycle with conflicting constraints).
    pub unresolved: Vec<DependencyId>,
}

impl ScheduleReport {
    pub fn new(origin: TaskId) -> Self {
        Self {
            origin,
            shifts: Vec::new(),
            unresolved: Vec::new(),
        }
    }

    /// Number of task writes performed.
    pub fn writes(&self) -> usize {
        self.shifts.len()
    }

    pub fn converged(&self) -> bool {
        self.unresolved.is_empty()
    }

    pub fn shifted(&self, task: TaskId) -> bool {
        self.shifts.iter().any(|s| s.task == task)
    }
}

/// Date the dependent anchor of `edge` must not precede, given the current
/// dates of the predecessor.
///
/// Dates are inclusive, so finish-to-start means "the day after".
pub fn required_date(edge: &Dependency, predecessor: &Task) -> Option<NaiveDate> {
    let anchor = match edge.from_side {
        Anchor::Start => predecessor.start?,
        Anchor::End => predecessor.end?,
    };
    let lag = match (edge.from_side, edge.to_side) {
        (Anchor::End, Anchor::Start) => 1,
        _ => 0,
    };
    let days = edge.offset_days.checked_add(lag)?;
    anchor.checked_add_signed(chrono::Duration::try_days(days)?)
}

/// Whether `edge` is currently violated. `None` when either side lacks dates.
pub fn is_violated(edge: &Dependency, tasks: &TaskStore) -> Option<bool> {
    let required = required_date(edge, tasks.get(edge.from_id)?)?;
    let dependent = tasks.get(edge.to_id)?;
    let (start, end) = dependent.range()?;
    let current = match edge.to_side {
        Anchor::Start => start,
        Anchor::End => end,
    };
    Some(current < required)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Scheduler {
    policy: ConstraintPolicy,
}

impl Scheduler {
    pub fn new(policy: ConstraintPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ConstraintPolicy {
        self.policy
    }

    /// Propagate from `origin` and apply the resulting shifts to `tasks`.
    pub fn propagate(
        &self,
        tasks: &mut TaskStore,
        graph: &DependencyGraph,
        origin: TaskId,
    ) -> ScheduleReport {
        let mut report = ScheduleReport::new(origin);
        if !tasks.contains(origin) {
            return report;
        }

        let limit = tasks.len();
        let mut shift_counts: HashMap<TaskId, usize> = HashMap::new();
        let mut worklist: VecDeque<TaskId> = VecDeque::from([origin]);

        while let Some(current) = worklist.pop_front() {
            apply_self_edges(tasks, graph, current, &mut report);

            for edge in graph.edges_from(current).filter(|e| !e.is_self_edge()) {
                let Some(mut required) = tasks.get(current).and_then(|t| required_date(edge, t))
                else {
                    continue;
                };
                let Some((start, end)) = tasks.get(edge.to_id).and_then(Task::range) else {
                    continue;
                };

                if self.policy == ConstraintPolicy::MostRestrictive {
                    required = strictest_requirement(tasks, graph, edge.to_id, edge.to_side, required);
                }

                let anchor = match edge.to_side {
                    Anchor::Start => start,
                    Anchor::End => end,
                };
                if anchor >= required {
                    continue;
                }

                let shifts = shift_counts.entry(edge.to_id).or_default();
                if edge.to_id == origin || *shifts >= limit {
                    tracing::warn!(
                        edge = %edge.id,
                        task = %edge.to_id,
                        "dependency cannot be satisfied; remove an edge of the cycle to resolve"
                    );
                    if !report.unresolved.contains(&edge.id) {
                        report.unresolved.push(edge.id);
                    }
                    continue;
                }

                let delta = required - anchor;
                let Some(after) = start
                    .checked_add_signed(delta)
                    .zip(end.checked_add_signed(delta))
                else {
                    continue;
                };
                if tasks.set_range(edge.to_id, after.0, after.1).is_err() {
                    continue;
                }
                *shifts += 1;
                tracing::debug!(
                    task = %edge.to_id,
                    days = delta.num_days(),
                    "shifted dependent"
                );
                report.shifts.push(Shift {
                    task: edge.to_id,
                    before: (start, end),
                    after,
                    via: edge.id,
                });
                if !worklist.contains(&edge.to_id) {
                    worklist.push_back(edge.to_id);
                }
            }
        }

        if !report.shifts.is_empty() || !report.unresolved.is_empty() {
            tracing::info!(
                origin = %origin,
                writes = report.writes(),
                unresolved = report.unresolved.len(),
                "propagation finished"
            );
        }
        report
    }
}

/// Self edges constrain one anchor of a task by the other. Translating the
/// task could never satisfy them, so only the constrained anchor moves.
fn apply_self_edges(
    tasks: &mut TaskStore,
    graph: &DependencyGraph,
    task_id: TaskId,
    report: &mut ScheduleReport,
) {
    for edge in graph.edges_from(task_id).filter(|e| e.is_self_edge()) {
        let Some(task) = tasks.get(task_id) else {
            return;
        };
        let Some((start, end)) = task.range() else {
            return;
        };
        let Some(required) = required_date(edge, task) else {
            continue;
        };
        let after = match edge.to_side {
            Anchor::Start if start < required => (required, end),
            Anchor::End if end < required => (start, required),
            _ => continue,
        };
        if tasks.set_range(task_id, after.0, after.1).is_ok() {
            report.shifts.push(Shift {
                task: task_id,
                before: (start, end),
                after,
                via: edge.id,
            });
        }
    }
}

fn strictest_requirement(
    tasks: &TaskStore,
    graph: &DependencyGraph,
    task: TaskId,
    side: Anchor,
    seed: NaiveDate,
) -> NaiveDate {
    graph
        .edges_to(task, side)
        .filter(|e| !e.is_self_edge())
        .filter_map(|e| tasks.get(e.from_id).and_then(|p| required_date(e, p)))
        .fold(seed, std::cmp::max)
}
