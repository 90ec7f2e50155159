use std::collections::VecDeque;

use super::graph::DependencyGraph;
use super::store::TaskStore;

pub const DEFAULT_HISTORY_DEPTH: usize = 50;

/// Full copy of the mutable project state.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub tasks: TaskStore,
    pub dependencies: DependencyGraph,
}

impl Snapshot {
    pub fn capture(tasks: &TaskStore, dependencies: &DependencyGraph) -> Self {
        Self {
            tasks: tasks.clone(),
            dependencies: dependencies.clone(),
        }
    }
}

/// Bounded snapshot-based undo/redo.
///
/// One snapshot is pushed per user gesture, before the gesture mutates
/// anything, so the gesture and every cascaded write undo together.
#[derive(Debug, Clone)]
pub struct UndoHistory {
    undo_stack: VecDeque<Snapshot>,
    redo_stack: Vec<Snapshot>,
    max_depth: usize,
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_DEPTH)
    }
}

impl UndoHistory {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Push a snapshot captured before a mutation that has since succeeded.
    /// Clears the redo stack.
    pub fn record(&mut self, snapshot: Snapshot) {
        if self.undo_stack.len() == self.max_depth {
            self.undo_stack.pop_front();
        }
        self.undo_stack.push_back(snapshot);
        self.redo_stack.clear();
    }

    /// Step back. `tasks`/`dependencies` is the current state, kept for redo.
    pub fn undo(&mut self, tasks: &TaskStore, dependencies: &DependencyGraph) -> Option<Snapshot> {
        let previous = self.undo_stack.pop_back()?;
        self.redo_stack.push(Snapshot::capture(tasks, dependencies));
        Some(previous)
    }

    pub fn redo(&mut self, tasks: &TaskStore, dependencies: &DependencyGraph) -> Option<Snapshot> {
        let next = self.redo_stack.pop()?;
        if self.undo_stack.len() == self.max_depth {
            self.undo_stack.pop_front();
        }
        self.undo_stack.push_back(Snapshot::capture(tasks, dependencies));
        Some(next)
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
