//! Pure draw-model generation for the timeline.
//!
//! `build_draw_model` turns the task tree, a [`Timeline`] and the current
//! viewport into plain geometry. It performs no I/O and reads no clock; the
//! front-end paints whatever comes out, and the drag controller reads bar
//! positions from the same model.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::model::store::TaskStore;
use crate::model::task::{add_days_or_keep, Task, TaskId, TaskKind, TaskStatus};
use crate::model::timeline::{Granularity, Timeline, TimelineViewport};

/// Bars never get narrower than this, so short tasks stay clickable.
pub const MIN_BAR_WIDTH: f32 = 24.0;
/// Side length of a milestone marker.
pub const MILESTONE_SIZE: f32 = 10.0;
/// Rough per-character text width used to decide label placement.
pub const CHAR_WIDTH_ESTIMATE: f32 = 12.0;
const INSIDE_LABEL_PADDING: f32 = 20.0;
const OUTSIDE_LABEL_GAP: f32 = 12.0;
const MIN_GROUP_SPAN: f32 = 24.0;
const OPEN_RANGE_DAYS: i64 = 7;
/// Day width below which weekend shading is skipped.
const WEEKEND_MIN_DAY_WIDTH: f32 = 3.0;

/// Which rows the timeline shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawFilter {
    pub groups: bool,
    pub units: bool,
    pub steps: bool,
    pub hidden_statuses: Vec<TaskStatus>,
}

impl Default for DrawFilter {
    fn default() -> Self {
        Self {
            groups: true,
            units: true,
            steps: true,
            hidden_statuses: Vec::new(),
        }
    }
}

impl DrawFilter {
    pub fn shows(&self, task: &Task) -> bool {
        let kind_on = match task.kind {
            TaskKind::Group => self.groups,
            TaskKind::Unit => self.units,
            TaskKind::Step => self.steps,
        };
        task.visible && kind_on && !self.hidden_statuses.contains(&task.status)
    }

    pub fn toggle_status(&mut self, status: TaskStatus) {
        if let Some(idx) = self.hidden_statuses.iter().position(|s| *s == status) {
            self.hidden_statuses.remove(idx);
        } else {
            self.hidden_statuses.push(status);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarShape {
    /// A dated range (possibly open-ended on the right).
    Range,
    /// Only an end date: a fixed-size marker.
    Milestone,
    /// No dates at all: drawn ghosted over the parent's range.
    Placeholder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelSide {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Label {
    /// Centered on `center_x`, inside the bar.
    Inside { center_x: f32 },
    /// Next to the bar; `x` is the edge the text hugs.
    Outside { side: LabelSide, x: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub task_id: TaskId,
    pub kind: TaskKind,
    pub title: String,
    pub status: TaskStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub task_id: TaskId,
    pub kind: TaskKind,
    pub status: TaskStatus,
    pub title: String,
    pub row: usize,
    pub left: f32,
    pub width: f32,
    pub shape: BarShape,
    /// Dates the bar was drawn from (fallbacks already applied).
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub label: Label,
}

impl Bar {
    pub fn right(&self) -> f32 {
        self.left + self.width
    }
}

/// Background enclosure behind a group or unit and its visible descendants.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupBackground {
    pub task_id: TaskId,
    pub kind: TaskKind,
    pub first_row: usize,
    pub last_row: usize,
    pub left: f32,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridLine {
    pub index: u32,
    pub x: f32,
    /// Year, e.g. "2024".
    pub label: String,
    /// Month or quarter within the year; empty in year mode.
    pub sub_label: String,
}

/// A horizontal span, used for weekend shading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub left: f32,
    pub width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NowMarker {
    pub x: f32,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawModel {
    pub timeline: Timeline,
    pub col_width: f32,
    pub total_width: f32,
    pub rows: Vec<Row>,
    pub bars: Vec<Bar>,
    pub groups: Vec<GroupBackground>,
    pub grid_lines: Vec<GridLine>,
    pub weekends: Vec<Band>,
    pub now_marker: Option<NowMarker>,
}

impl DrawModel {
    pub fn bar(&self, task_id: TaskId) -> Option<&Bar> {
        self.bars.iter().find(|b| b.task_id == task_id)
    }
}

/// Build the complete draw model for one frame.
pub fn build_draw_model(
    tasks: &TaskStore,
    timeline: Timeline,
    viewport: &TimelineViewport,
    filter: &DrawFilter,
) -> DrawModel {
    let col_width = timeline.granularity.column_width(viewport.width);
    let x = |date: NaiveDate| timeline.date_to_x(date, col_width);

    let mut rows = Vec::new();
    let mut bars = Vec::new();
    for task in tasks.walk() {
        if !filter.shows(task) {
            continue;
        }
        let row = rows.len();
        rows.push(Row {
            task_id: task.id,
            kind: task.kind,
            title: task.title.clone(),
            status: task.status,
        });
        bars.push(layout_bar(task, row, tasks, &x, viewport));
    }

    let groups = tasks
        .walk()
        .into_iter()
        .filter(|t| t.kind != TaskKind::Step)
        .filter_map(|t| group_background(t, tasks, &rows, &x, viewport.today))
        .collect();

    let grid_lines = (0..timeline.granularity.unit_count())
        .map(|i| grid_line(&timeline, i, col_width))
        .collect();

    let weekends = if timeline.day_width(col_width) >= WEEKEND_MIN_DAY_WIDTH {
        weekend_bands(&timeline, col_width)
    } else {
        Vec::new()
    };

    let now_marker = (viewport.today >= timeline.epoch && viewport.today < timeline.end()).then(|| {
        NowMarker {
            x: x(viewport.today),
            date: viewport.today,
        }
    });

    DrawModel {
        timeline,
        col_width,
        total_width: timeline.total_width(col_width),
        rows,
        bars,
        groups,
        grid_lines,
        weekends,
        now_marker,
    }
}

/// Horizontal extent of a bar ending at `x_end`: the right edge stays on the
/// end date even when the minimum width kicks in.
pub fn bar_extent(x_start: f32, x_end: f32) -> (f32, f32) {
    let width = (x_end - x_start).max(MIN_BAR_WIDTH);
    (x_end - width, width)
}

fn layout_bar(
    task: &Task,
    row: usize,
    tasks: &TaskStore,
    x: &impl Fn(NaiveDate) -> f32,
    viewport: &TimelineViewport,
) -> Bar {
    let (shape, start, end) = match (task.start, task.end) {
        (Some(s), Some(e)) => (BarShape::Range, s, e),
        (Some(s), None) => (BarShape::Range, s, add_days_or_keep(s, OPEN_RANGE_DAYS)),
        (None, Some(e)) => (BarShape::Milestone, e, e),
        (None, None) => {
            let (s, e) = task
                .parent
                .and_then(|p| tasks.get(p))
                .and_then(Task::range)
                .unwrap_or((viewport.today, add_days_or_keep(viewport.today, 1)));
            (BarShape::Placeholder, s, e)
        }
    };

    let (left, width) = match shape {
        BarShape::Milestone => (x(end) - MILESTONE_SIZE / 2.0, MILESTONE_SIZE),
        _ => bar_extent(x(start), x(end)),
    };
    let label = place_label(&task.title, left, width, shape, viewport);

    Bar {
        task_id: task.id,
        kind: task.kind,
        status: task.status,
        title: task.title.clone(),
        row,
        left,
        width,
        shape,
        start,
        end,
        label,
    }
}

/// Decide where a bar's title goes for the current scroll position.
pub fn place_label(
    title: &str,
    left: f32,
    width: f32,
    shape: BarShape,
    viewport: &TimelineViewport,
) -> Label {
    let estimate = title.chars().count() as f32 * CHAR_WIDTH_ESTIMATE;
    if shape != BarShape::Milestone && width > estimate + INSIDE_LABEL_PADDING {
        let visible_start = left.max(viewport.scroll_left);
        let visible_end = (left + width).min(viewport.right());
        let center_x = if visible_end - visible_start > estimate {
            (visible_start + visible_end) / 2.0
        } else {
            left + width / 2.0
        };
        return Label::Inside { center_x };
    }

    if left + width / 2.0 < viewport.center() {
        Label::Outside {
            side: LabelSide::Right,
            x: left + width + OUTSIDE_LABEL_GAP,
        }
    } else {
        Label::Outside {
            side: LabelSide::Left,
            x: left - OUTSIDE_LABEL_GAP,
        }
    }
}

fn group_background(
    task: &Task,
    tasks: &TaskStore,
    rows: &[Row],
    x: &impl Fn(NaiveDate) -> f32,
    today: NaiveDate,
) -> Option<GroupBackground> {
    let mut members = tasks.descendants(task.id);
    members.push(task.id);
    let (first_row, last_row) = rows
        .iter()
        .enumerate()
        .filter(|(_, r)| members.contains(&r.task_id))
        .fold(None, |acc: Option<(usize, usize)>, (i, _)| match acc {
            None => Some((i, i)),
            Some((lo, hi)) => Some((lo.min(i), hi.max(i))),
        })?;

    let start = task.start.or(task.end).unwrap_or(today);
    let end = task
        .end
        .unwrap_or_else(|| add_days_or_keep(start, OPEN_RANGE_DAYS));
    let padding = match task.kind {
        TaskKind::Group => 10.0,
        _ => 6.0,
    };
    let x1 = x(start);
    let span = (x(end) - x1).max(MIN_GROUP_SPAN);

    Some(GroupBackground {
        task_id: task.id,
        kind: task.kind,
        first_row,
        last_row,
        left: x1 - padding,
        width: span + padding * 2.0,
    })
}

fn grid_line(timeline: &Timeline, index: u32, col_width: f32) -> GridLine {
    let date = timeline.unit_start(index);
    let sub_label = match timeline.granularity {
        Granularity::Month => date.format("%b").to_string(),
        Granularity::Quarter => format!("Q{}", date.month0() / 3 + 1),
        Granularity::Year => String::new(),
    };
    GridLine {
        index,
        x: index as f32 * col_width,
        label: date.format("%Y").to_string(),
        sub_label,
    }
}

fn weekend_bands(timeline: &Timeline, col_width: f32) -> Vec<Band> {
    let mut bands: Vec<Band> = Vec::new();
    let end = timeline.end();
    let mut day = timeline.epoch;
    while day < end {
        if matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            let left = timeline.date_to_x(day, col_width);
            let right = timeline.date_to_x(day + chrono::Duration::days(1), col_width);
            match bands.last_mut() {
                Some(last) if (last.left + last.width - left).abs() < 0.01 => {
                    last.width = right - last.left;
                }
                _ => bands.push(Band {
                    left,
                    width: right - left,
                }),
            }
        }
        day += chrono::Duration::days(1);
    }
    bands
}
