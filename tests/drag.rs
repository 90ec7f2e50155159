use chrono::NaiveDate;
use projed::{
    Anchor, DateUpdate, DragController, DragError, DragMode, DrawFilter, DrawModel, Planner,
    TaskFields, TaskId, TaskKind, TimelineViewport,
};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Month view, 1200px wide: 100px per month, 25px per drag quantum.
fn model(planner: &Planner) -> DrawModel {
    let viewport = TimelineViewport::new(1200.0, ymd(2024, 6, 1));
    planner.draw_model(&viewport, &DrawFilter::default())
}

/// A group parked in 2025 plus one unit per range, set up without history.
fn board(ranges: &[(NaiveDate, NaiveDate)]) -> (Planner, TaskId, Vec<TaskId>) {
    let mut planner = Planner::default();
    let group = planner
        .create_task_on(TaskKind::Group, None, "Release", ymd(2025, 1, 1), true)
        .unwrap();
    planner
        .update_task_dates(group, &DateUpdate::range(ymd(2025, 1, 1), ymd(2025, 2, 1)), true)
        .unwrap();
    let units = ranges
        .iter()
        .map(|(start, end)| {
            let id = planner
                .create_task_on(TaskKind::Unit, Some(group), "Unit", *start, true)
                .unwrap();
            planner
                .update_task_dates(id, &DateUpdate::range(*start, *end), true)
                .unwrap();
            id
        })
        .collect();
    (planner, group, units)
}

fn chained_board() -> (Planner, Vec<TaskId>) {
    let (mut planner, _, units) = board(&[
        (ymd(2024, 3, 1), ymd(2024, 3, 10)),
        (ymd(2024, 3, 11), ymd(2024, 3, 15)),
        (ymd(2024, 3, 16), ymd(2024, 3, 20)),
        (ymd(2024, 3, 21), ymd(2024, 3, 25)),
    ]);
    for pair in units.windows(2) {
        let (_, report) = planner
            .add_dependency(pair[0], Anchor::End, pair[1], Anchor::Start, 0, true)
            .unwrap();
        assert_eq!(report.writes(), 0);
    }
    (planner, units)
}

fn range_of(planner: &Planner, id: TaskId) -> (Option<NaiveDate>, Option<NaiveDate>) {
    let task = planner.tasks().get(id).unwrap();
    (task.start, task.end)
}

#[test]
fn move_commits_one_undo_step_for_the_whole_cascade() {
    let (mut planner, units) = chained_board();
    let before = planner.tasks().clone();
    let mut drag = DragController::default();

    drag.begin_drag(&model(&planner), units[0], DragMode::Move, 250.0)
        .unwrap();
    let preview = drag.update_drag(275.0).unwrap();
    // Snapped to the next bar's left edge, then rounded back onto the grid.
    assert!(preview.guide_x.is_some());
    assert_eq!(preview.start, ymd(2024, 3, 9));
    assert_eq!(preview.end, ymd(2024, 3, 18));
    assert_eq!(range_of(&planner, units[0]).0, Some(ymd(2024, 3, 1)));

    let report = drag.commit_drag(&mut planner).unwrap().unwrap();
    assert!(!drag.is_dragging());
    assert_eq!(report.writes(), 3);

    let expected = [
        (ymd(2024, 3, 9), ymd(2024, 3, 18)),
        (ymd(2024, 3, 19), ymd(2024, 3, 23)),
        (ymd(2024, 3, 24), ymd(2024, 3, 28)),
        (ymd(2024, 3, 29), ymd(2024, 4, 2)),
    ];
    for (id, (start, end)) in units.iter().zip(expected) {
        assert_eq!(range_of(&planner, *id), (Some(start), Some(end)));
    }

    assert_eq!(planner.undo_depth(), 1);
    assert!(planner.undo());
    assert_eq!(planner.tasks(), &before);
}

#[test]
fn jitter_below_threshold_changes_nothing() {
    let (mut planner, units) = chained_board();
    let mut drag = DragController::default();
    drag.begin_drag(&model(&planner), units[0], DragMode::Move, 250.0)
        .unwrap();

    assert_eq!(drag.update_drag(253.0), None);
    assert_eq!(drag.update_drag(246.5), None);
    assert_eq!(drag.preview(), None);

    assert_eq!(drag.commit_drag(&mut planner).unwrap(), None);
    assert!(!drag.is_dragging());
    assert!(!planner.can_undo());
}

#[test]
fn cancel_discards_the_candidate() {
    let (mut planner, units) = chained_board();
    let before = planner.tasks().clone();
    let mut drag = DragController::default();
    drag.begin_drag(&model(&planner), units[1], DragMode::Move, 300.0)
        .unwrap();
    drag.update_drag(400.0).unwrap();
    assert_eq!(drag.active_task(), Some(units[1]));

    assert!(drag.cancel_drag());
    assert!(!drag.cancel_drag());
    assert_eq!(drag.commit_drag(&mut planner).unwrap(), None);
    assert_eq!(planner.tasks(), &before);
    assert!(!planner.can_undo());
}

#[test]
fn only_one_session_at_a_time() {
    let (planner, units) = chained_board();
    let frame = model(&planner);
    let mut drag = DragController::default();
    drag.begin_drag(&frame, units[0], DragMode::Move, 250.0)
        .unwrap();
    assert_eq!(
        drag.begin_drag(&frame, units[1], DragMode::Move, 300.0),
        Err(DragError::AlreadyDragging)
    );
    assert_eq!(drag.active_task(), Some(units[0]));
}

#[test]
fn hidden_and_undated_bars_cannot_be_dragged() {
    let (mut planner, group, units) = board(&[(ymd(2024, 3, 1), ymd(2024, 3, 10))]);
    let step = planner
        .create_task_on(TaskKind::Step, Some(units[0]), "Step", ymd(2024, 3, 1), true)
        .unwrap();
    let clear = DateUpdate {
        start: Some(None),
        end: Some(None),
    };
    planner.update_task_dates(step, &clear, true).unwrap();
    let hide = TaskFields {
        visible: Some(false),
        ..Default::default()
    };
    planner.update_task_fields(group, &hide, true).unwrap();

    let frame = model(&planner);
    let mut drag = DragController::default();
    assert_eq!(
        drag.begin_drag(&frame, step, DragMode::Move, 200.0),
        Err(DragError::Placeholder(step))
    );
    assert_eq!(
        drag.begin_drag(&frame, group, DragMode::Move, 1200.0),
        Err(DragError::BarNotFound(group))
    );
    assert!(!drag.is_dragging());
}

#[test]
fn milestone_moves_but_never_resizes() {
    let (mut planner, _, units) = board(&[(ymd(2024, 3, 1), ymd(2024, 3, 10))]);
    let milestone = units[0];
    planner
        .update_task_dates(milestone, &DateUpdate::start(None), true)
        .unwrap();

    let mut drag = DragController::default();
    let frame = model(&planner);
    assert_eq!(
        drag.begin_drag(&frame, milestone, DragMode::ResizeEnd, 229.0),
        Err(DragError::MilestoneResize)
    );

    drag.begin_drag(&frame, milestone, DragMode::Move, 500.0)
        .unwrap();
    let preview = drag.update_drag(550.0).unwrap();
    assert_eq!(preview.width, 10.0);
    assert_eq!(preview.end, ymd(2024, 3, 24));

    drag.commit_drag(&mut planner).unwrap().unwrap();
    assert_eq!(range_of(&planner, milestone), (None, Some(ymd(2024, 3, 24))));
}

#[test]
fn resize_never_inverts_the_range() {
    let (mut planner, _, units) = board(&[(ymd(2024, 3, 1), ymd(2024, 3, 10))]);
    let id = units[0];
    let mut drag = DragController::default();

    drag.begin_drag(&model(&planner), id, DragMode::ResizeEnd, 300.0)
        .unwrap();
    let preview = drag.update_drag(100.0).unwrap();
    assert_eq!((preview.start, preview.end), (ymd(2024, 3, 1), ymd(2024, 3, 1)));
    assert_eq!(preview.width, 24.0);
    drag.commit_drag(&mut planner).unwrap().unwrap();
    assert_eq!(
        range_of(&planner, id),
        (Some(ymd(2024, 3, 1)), Some(ymd(2024, 3, 1)))
    );

    planner.undo();
    drag.begin_drag(&model(&planner), id, DragMode::ResizeStart, 200.0)
        .unwrap();
    let preview = drag.update_drag(400.0).unwrap();
    assert_eq!((preview.start, preview.end), (ymd(2024, 3, 10), ymd(2024, 3, 10)));
}
