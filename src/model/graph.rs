use uuid::Uuid;

use super::dependency::{Anchor, Dependency, DependencyId};
use super::store::TaskStore;
use super::task::TaskId;
use crate::error::StoreError;

/// Flat, insertion-ordered list of dependency edges.
///
/// Edge order matters: the scheduler evaluates edges in this order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DependencyGraph {
    edges: Vec<Dependency>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_edges(edges: Vec<Dependency>) -> Self {
        Self { edges }
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dependency> {
        self.edges.iter()
    }

    pub fn get(&self, id: DependencyId) -> Option<&Dependency> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// Add an edge. An exact duplicate of an existing link is a no-op that
    /// returns the existing id.
    pub fn add_edge(
        &mut self,
        from: TaskId,
        from_side: Anchor,
        to: TaskId,
        to_side: Anchor,
        offset_days: i64,
    ) -> Result<DependencyId, StoreError> {
        if from == to && from_side == to_side {
            return Err(StoreError::SelfDependencySameSide);
        }
        if let Some(existing) = self
            .edges
            .iter()
            .find(|e| e.same_link(from, from_side, to, to_side))
        {
            return Ok(existing.id);
        }
        let id = Uuid::new_v4();
        self.edges.push(Dependency {
            id,
            from_id: from,
            from_side,
            to_id: to,
            to_side,
            offset_days,
        });
        Ok(id)
    }

    pub fn remove_edge(&mut self, id: DependencyId) -> Result<Dependency, StoreError> {
        let idx = self
            .edges
            .iter()
            .position(|e| e.id == id)
            .ok_or(StoreError::DependencyNotFound(id))?;
        Ok(self.edges.remove(idx))
    }

    pub fn set_offset(&mut self, id: DependencyId, offset_days: i64) -> Result<bool, StoreError> {
        let edge = self
            .edges
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(StoreError::DependencyNotFound(id))?;
        let changed = edge.offset_days != offset_days;
        edge.offset_days = offset_days;
        Ok(changed)
    }

    /// Outgoing edges of `task`, in insertion order.
    pub fn edges_from(&self, task: TaskId) -> impl Iterator<Item = &Dependency> {
        self.edges.iter().filter(move |e| e.from_id == task)
    }

    /// Incoming edges constraining the given anchor of `task`.
    pub fn edges_to(&self, task: TaskId, side: Anchor) -> impl Iterator<Item = &Dependency> {
        self.edges
            .iter()
            .filter(move |e| e.to_id == task && e.to_side == side)
    }

    /// Every edge with `task` on either end.
    pub fn touching(&self, task: TaskId) -> impl Iterator<Item = &Dependency> {
        self.edges.iter().filter(move |e| e.touches(task))
    }

    /// Cascade step of a task deletion. Returns how many edges were dropped.
    pub fn remove_touching(&mut self, tasks: &[TaskId]) -> usize {
        let before = self.edges.len();
        self.edges
            .retain(|e| !tasks.contains(&e.from_id) && !tasks.contains(&e.to_id));
        before - self.edges.len()
    }

    /// Drop edges whose endpoints are not in `store` (corrupt or stale data).
    pub fn prune_dangling(&mut self, store: &TaskStore) -> usize {
        let before = self.edges.len();
        self.edges
            .retain(|e| store.contains(e.from_id) && store.contains(e.to_id));
        let pruned = before - self.edges.len();
        if pruned > 0 {
            tracing::warn!(pruned, "dropped dependencies pointing at missing tasks");
        }
        pruned
    }
}
