use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::task::TaskId;

/// Stable identifier of a dependency edge.
pub type DependencyId = Uuid;

/// Largest lag, in either direction, the editor offers for an edge.
pub const MAX_OFFSET_DAYS: i64 = 3650;

/// One of a task's two date endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    Start,
    End,
}

impl Anchor {
    pub fn label(self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::End => "end",
        }
    }
}

/// Represents the type of dependency between two tasks, named after which
/// anchor of the predecessor constrains which anchor of the dependent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DependencyKind {
    FinishToStart,
    StartToStart,
    FinishToFinish,
    StartToFinish,
}

impl DependencyKind {
    pub fn all() -> &'static [DependencyKind] {
        &[
            DependencyKind::FinishToStart,
            DependencyKind::StartToStart,
            DependencyKind::FinishToFinish,
            DependencyKind::StartToFinish,
        ]
    }

    pub fn from_anchors(from: Anchor, to: Anchor) -> Self {
        match (from, to) {
            (Anchor::End, Anchor::Start) => DependencyKind::FinishToStart,
            (Anchor::Start, Anchor::Start) => DependencyKind::StartToStart,
            (Anchor::End, Anchor::End) => DependencyKind::FinishToFinish,
            (Anchor::Start, Anchor::End) => DependencyKind::StartToFinish,
        }
    }

    /// `(from_side, to_side)` of this kind.
    pub fn anchors(self) -> (Anchor, Anchor) {
        match self {
            DependencyKind::FinishToStart => (Anchor::End, Anchor::Start),
            DependencyKind::StartToStart => (Anchor::Start, Anchor::Start),
            DependencyKind::FinishToFinish => (Anchor::End, Anchor::End),
            DependencyKind::StartToFinish => (Anchor::Start, Anchor::End),
        }
    }

    pub fn short_label(self) -> &'static str {
        match self {
            DependencyKind::FinishToStart => "FS",
            DependencyKind::StartToStart => "SS",
            DependencyKind::FinishToFinish => "FF",
            DependencyKind::StartToFinish => "SF",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            DependencyKind::FinishToStart => "Finish → Start: starts after the predecessor ends",
            DependencyKind::StartToStart => "Start → Start: starts no earlier than the predecessor",
            DependencyKind::FinishToFinish => "Finish → Finish: ends no earlier than the predecessor",
            DependencyKind::StartToFinish => "Start → Finish: ends no earlier than the predecessor starts",
        }
    }
}

/// A directed link from one task anchor to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    pub id: DependencyId,
    pub from_id: TaskId,
    pub from_side: Anchor,
    pub to_id: TaskId,
    pub to_side: Anchor,
    #[serde(default)]
    pub offset_days: i64,
}

impl Dependency {
    pub fn kind(&self) -> DependencyKind {
        DependencyKind::from_anchors(self.from_side, self.to_side)
    }

    pub fn is_self_edge(&self) -> bool {
        self.from_id == self.to_id
    }

    pub fn touches(&self, task: TaskId) -> bool {
        self.from_id == task || self.to_id == task
    }

    /// Same endpoints and sides, ignoring id and offset.
    pub fn same_link(&self, from: TaskId, from_side: Anchor, to: TaskId, to_side: Anchor) -> bool {
        self.from_id == from && self.from_side == from_side && self.to_id == to && self.to_side == to_side
    }
}
