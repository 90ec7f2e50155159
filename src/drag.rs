//! Pointer gestures over timeline bars.
//!
//! A drag session is opened on a bar from the current [`DrawModel`], fed raw
//! pointer x positions while the button is held, and closed by either
//! [`DragController::commit_drag`] or [`DragController::cancel_drag`]. Both
//! take the session out of the controller; nothing is written to the project
//! until commit.

use chrono::NaiveDate;

use crate::config::Settings;
use crate::error::DragError;
use crate::layout::{bar_extent, BarShape, DrawModel, MILESTONE_SIZE};
use crate::model::store::DateUpdate;
use crate::model::task::TaskId;
use crate::model::timeline::Timeline;
use crate::planner::Planner;
use crate::schedule::ScheduleReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Move,
    ResizeStart,
    ResizeEnd,
}

/// Candidate geometry for the bar being dragged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragPreview {
    pub task_id: TaskId,
    pub mode: DragMode,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub left: f32,
    pub width: f32,
    /// X of the bar edge the candidate snapped to, for drawing a guide.
    pub guide_x: Option<f32>,
}

#[derive(Debug, Clone)]
struct DragSession {
    task_id: TaskId,
    mode: DragMode,
    milestone: bool,
    original: (NaiveDate, NaiveDate),
    start_x: f32,
    end_x: f32,
    pointer_origin: f32,
    snap_points: Vec<f32>,
    timeline: Timeline,
    col_width: f32,
    /// Set once the pointer has travelled past the drag threshold.
    engaged: bool,
    candidate: Option<DragPreview>,
}

impl DragSession {
    fn anchor_x(&self) -> f32 {
        match self.mode {
            DragMode::Move if self.milestone => self.end_x,
            DragMode::Move | DragMode::ResizeStart => self.start_x,
            DragMode::ResizeEnd => self.end_x,
        }
    }

    fn dates_for(&self, date: NaiveDate) -> (NaiveDate, NaiveDate) {
        let (start, end) = self.original;
        match self.mode {
            DragMode::Move if self.milestone => (date, date),
            DragMode::Move => (date, date.checked_add_signed(end - start).unwrap_or(date)),
            DragMode::ResizeStart => (date.min(end), end),
            DragMode::ResizeEnd => (start, date.max(start)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DragController {
    session: Option<DragSession>,
    drag_threshold: f32,
    snap_threshold: f32,
}

impl Default for DragController {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl DragController {
    pub fn new(drag_threshold: f32, snap_threshold: f32) -> Self {
        Self {
            session: None,
            drag_threshold,
            snap_threshold,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.drag_threshold_px, settings.snap_threshold_px)
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn active_task(&self) -> Option<TaskId> {
        self.session.as_ref().map(|s| s.task_id)
    }

    /// Latest candidate, once the pointer has moved far enough.
    pub fn preview(&self) -> Option<DragPreview> {
        self.session.as_ref().and_then(|s| s.candidate)
    }

    /// Open a session on `task_id`'s bar in `model`.
    pub fn begin_drag(
        &mut self,
        model: &DrawModel,
        task_id: TaskId,
        mode: DragMode,
        pointer_x: f32,
    ) -> Result<(), DragError> {
        if self.session.is_some() {
            return Err(DragError::AlreadyDragging);
        }
        let bar = model.bar(task_id).ok_or(DragError::BarNotFound(task_id))?;
        let milestone = match bar.shape {
            BarShape::Placeholder => return Err(DragError::Placeholder(task_id)),
            BarShape::Milestone if mode != DragMode::Move => {
                return Err(DragError::MilestoneResize)
            }
            BarShape::Milestone => true,
            BarShape::Range => false,
        };

        let snap_points = model
            .bars
            .iter()
            .filter(|b| b.row != bar.row)
            .flat_map(|b| [b.left, b.right()])
            .collect();

        let timeline = model.timeline;
        let col_width = model.col_width;
        self.session = Some(DragSession {
            task_id,
            mode,
            milestone,
            original: (bar.start, bar.end),
            start_x: timeline.date_to_x(bar.start, col_width),
            end_x: timeline.date_to_x(bar.end, col_width),
            pointer_origin: pointer_x,
            snap_points,
            timeline,
            col_width,
            engaged: false,
            candidate: None,
        });
        tracing::debug!(%task_id, ?mode, "drag started");
        Ok(())
    }

    /// Feed a pointer position. Returns the new candidate, or `None` while
    /// the pointer is still inside the drag threshold (or no session is open).
    pub fn update_drag(&mut self, pointer_x: f32) -> Option<DragPreview> {
        let threshold = self.drag_threshold;
        let snap_threshold = self.snap_threshold;
        let session = self.session.as_mut()?;

        let delta = pointer_x - session.pointer_origin;
        if !session.engaged {
            if delta.abs() <= threshold {
                return None;
            }
            session.engaged = true;
        }

        let raw = session.anchor_x() + delta;
        let guide_x = nearest_snap(&session.snap_points, raw, snap_threshold);
        let x = Timeline::quantize(guide_x.unwrap_or(raw), session.col_width);
        let date = session.timeline.x_to_date(x, session.col_width);
        let (start, end) = session.dates_for(date);

        let (left, width) = if session.milestone {
            let cx = session.timeline.date_to_x(end, session.col_width);
            (cx - MILESTONE_SIZE / 2.0, MILESTONE_SIZE)
        } else {
            bar_extent(
                session.timeline.date_to_x(start, session.col_width),
                session.timeline.date_to_x(end, session.col_width),
            )
        };

        let preview = DragPreview {
            task_id: session.task_id,
            mode: session.mode,
            start,
            end,
            left,
            width,
            guide_x,
        };
        session.candidate = Some(preview);
        Some(preview)
    }

    /// Close the session and write the candidate through the planner as one
    /// undo step. Returns `None` when there was nothing to commit (no session,
    /// or the pointer never left the threshold).
    pub fn commit_drag(
        &mut self,
        planner: &mut Planner,
    ) -> Result<Option<ScheduleReport>, DragError> {
        let Some(session) = self.session.take() else {
            return Ok(None);
        };
        let Some(candidate) = session.candidate else {
            return Ok(None);
        };
        if (candidate.start, candidate.end) == session.original {
            return Ok(None);
        }

        let update = if session.milestone {
            DateUpdate::end(Some(candidate.end))
        } else {
            DateUpdate::range(candidate.start, candidate.end)
        };
        let report = planner.update_task_dates(session.task_id, &update, false)?;
        tracing::info!(
            task = %session.task_id,
            start = %candidate.start,
            end = %candidate.end,
            cascaded = report.writes(),
            "drag committed"
        );
        Ok(Some(report))
    }

    /// Discard the session. Returns whether one was open.
    pub fn cancel_drag(&mut self) -> bool {
        let cancelled = self.session.take().is_some();
        if cancelled {
            tracing::debug!("drag cancelled");
        }
        cancelled
    }
}

fn nearest_snap(points: &[f32], x: f32, threshold: f32) -> Option<f32> {
    points
        .iter()
        .copied()
        .filter(|p| (p - x).abs() <= threshold)
        .min_by(|a, b| (a - x).abs().total_cmp(&(b - x).abs()))
}
