use chrono::NaiveDate;
use projed::{
    Anchor, DateUpdate, Planner, Settings, StoreError, TaskFields, TaskKind, TaskStatus,
};

fn ymd(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, m, d).unwrap()
}

#[test]
fn hierarchy_rules_are_enforced() {
    let mut planner = Planner::default();
    let g = planner
        .create_task_on(TaskKind::Group, None, "G", ymd(1, 1), false)
        .unwrap();
    let u = planner
        .create_task_on(TaskKind::Unit, Some(g), "U", ymd(1, 1), false)
        .unwrap();

    assert!(matches!(
        planner.create_task_on(TaskKind::Step, Some(g), "S", ymd(1, 1), false),
        Err(StoreError::InvalidParent { kind: TaskKind::Step, .. })
    ));
    assert!(matches!(
        planner.create_task_on(TaskKind::Unit, None, "U", ymd(1, 1), false),
        Err(StoreError::InvalidParent { .. })
    ));
    assert!(matches!(
        planner.create_task_on(TaskKind::Group, Some(u), "G", ymd(1, 1), false),
        Err(StoreError::InvalidParent { .. })
    ));
    assert_eq!(planner.tasks().len(), 2);
    assert_eq!(planner.undo_depth(), 2);
}

#[test]
fn new_tasks_get_the_default_range() {
    let settings = Settings {
        default_duration_days: 5,
        ..Settings::default()
    };
    let mut planner = Planner::new(settings);
    let g = planner
        .create_task_on(TaskKind::Group, None, "", ymd(3, 1), false)
        .unwrap();
    let task = planner.tasks().get(g).unwrap();
    assert_eq!(task.title, "New group");
    assert_eq!(task.range(), Some((ymd(3, 1), ymd(3, 6))));
    assert_eq!(task.status, TaskStatus::Todo);
    assert!(task.visible);
}

#[test]
fn malformed_dates_are_rejected_without_side_effects() {
    let mut planner = Planner::default();
    let g = planner
        .create_task_on(TaskKind::Group, None, "G", ymd(1, 1), true)
        .unwrap();
    let before = planner.tasks().clone();

    for (start, end) in [("2024-02-30", "2024-03-01"), ("2024-01-01", "01/03/2024")] {
        let err = planner
            .update_task_dates_text(g, Some(start), Some(end), false)
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidDate { .. }));
    }
    assert_eq!(planner.tasks(), &before);
    assert!(!planner.can_undo());

    planner
        .update_task_dates_text(g, Some(""), None, false)
        .unwrap();
    let task = planner.tasks().get(g).unwrap();
    assert_eq!(task.start, None);
    assert_eq!(task.end, Some(ymd(1, 8)));
}

#[test]
fn delete_cascades_to_subtree_and_edges() {
    let mut planner = Planner::default();
    let g = planner
        .create_task_on(TaskKind::Group, None, "G", ymd(1, 1), true)
        .unwrap();
    let u1 = planner
        .create_task_on(TaskKind::Unit, Some(g), "U1", ymd(1, 1), true)
        .unwrap();
    let s1 = planner
        .create_task_on(TaskKind::Step, Some(u1), "S1", ymd(1, 1), true)
        .unwrap();
    let u2 = planner
        .create_task_on(TaskKind::Unit, Some(g), "U2", ymd(1, 1), true)
        .unwrap();

    planner
        .add_dependency(s1, Anchor::End, u2, Anchor::Start, 0, true)
        .unwrap();
    planner
        .add_dependency(u2, Anchor::Start, u1, Anchor::Start, 0, true)
        .unwrap();
    let (kept, _) = planner
        .add_dependency(g, Anchor::Start, u2, Anchor::Start, 0, true)
        .unwrap();

    let removed = planner.delete_task(u1, false).unwrap();
    assert_eq!(removed.len(), 2);
    assert!(removed.contains(&u1) && removed.contains(&s1));
    assert!(!planner.tasks().contains(s1));
    assert_eq!(planner.tasks().children(g), &[u2]);

    let remaining: Vec<_> = planner.dependencies().iter().map(|e| e.id).collect();
    assert_eq!(remaining, vec![kept]);

    assert!(planner.undo());
    assert!(planner.tasks().contains(s1));
    assert_eq!(planner.dependencies().len(), 3);
}

#[test]
fn duplicate_dependency_is_a_no_op() {
    let mut planner = Planner::default();
    let g = planner
        .create_task_on(TaskKind::Group, None, "G", ymd(1, 1), true)
        .unwrap();
    let u = planner
        .create_task_on(TaskKind::Unit, Some(g), "U", ymd(1, 1), true)
        .unwrap();

    let (first, _) = planner
        .add_dependency(g, Anchor::Start, u, Anchor::Start, 0, false)
        .unwrap();
    let (second, _) = planner
        .add_dependency(g, Anchor::Start, u, Anchor::Start, 4, false)
        .unwrap();
    assert_eq!(first, second);
    assert_eq!(planner.dependencies().len(), 1);
    assert_eq!(planner.undo_depth(), 1);
    assert_eq!(planner.list_dependencies(u).len(), 1);
}

#[test]
fn self_dependency_needs_distinct_sides() {
    let mut planner = Planner::default();
    let g = planner
        .create_task_on(TaskKind::Group, None, "G", ymd(1, 1), true)
        .unwrap();
    assert_eq!(
        planner
            .add_dependency(g, Anchor::End, g, Anchor::End, 0, false)
            .unwrap_err(),
        StoreError::SelfDependencySameSide
    );
    assert!(planner.dependencies().is_empty());
}

#[test]
fn offset_change_reschedules_in_one_step() {
    let mut planner = Planner::default();
    let g = planner
        .create_task_on(TaskKind::Group, None, "G", ymd(1, 1), true)
        .unwrap();
    let u = planner
        .create_task_on(TaskKind::Unit, Some(g), "U", ymd(1, 1), true)
        .unwrap();
    let (edge, _) = planner
        .add_dependency(g, Anchor::Start, u, Anchor::Start, 0, true)
        .unwrap();

    let report = planner.set_dependency_offset(edge, 10, false).unwrap();
    assert_eq!(report.writes(), 1);
    assert_eq!(planner.tasks().get(u).unwrap().start, Some(ymd(1, 11)));

    assert!(planner.undo());
    assert_eq!(planner.tasks().get(u).unwrap().start, Some(ymd(1, 1)));
    assert_eq!(planner.dependencies().get(edge).unwrap().offset_days, 0);
}

#[test]
fn undo_restores_a_cascade_and_redo_reapplies_it() {
    let mut planner = Planner::default();
    let g = planner
        .create_task_on(TaskKind::Group, None, "G", ymd(1, 1), true)
        .unwrap();
    let units: Vec<_> = (0..4)
        .map(|i| {
            planner
                .create_task_on(TaskKind::Unit, Some(g), &format!("U{i}"), ymd(1, 1), true)
                .unwrap()
        })
        .collect();
    for pair in units.windows(2) {
        planner
            .add_dependency(pair[0], Anchor::End, pair[1], Anchor::Start, 0, true)
            .unwrap();
    }
    let settled = planner.tasks().clone();

    let report = planner
        .update_task_dates(units[0], &DateUpdate::end(Some(ymd(2, 1))), false)
        .unwrap();
    assert_eq!(report.writes(), 3);
    let moved = planner.tasks().clone();

    assert!(planner.undo());
    assert_eq!(planner.tasks(), &settled);
    assert!(!planner.can_undo());

    assert!(planner.redo());
    assert_eq!(planner.tasks(), &moved);
}

#[test]
fn history_keeps_only_the_configured_depth() {
    let settings = Settings {
        history_depth: 3,
        ..Settings::default()
    };
    let mut planner = Planner::new(settings);
    let g = planner
        .create_task_on(TaskKind::Group, None, "G", ymd(1, 1), true)
        .unwrap();
    for title in ["a", "b", "c", "d", "e"] {
        let fields = TaskFields {
            title: Some(title.to_string()),
            ..Default::default()
        };
        planner.update_task_fields(g, &fields, false).unwrap();
    }
    assert_eq!(planner.undo_depth(), 3);
    while planner.undo() {}
    assert_eq!(planner.tasks().get(g).unwrap().title, "b");
}

#[test]
fn hidden_tasks_still_schedule() {
    let mut planner = Planner::default();
    let g = planner
        .create_task_on(TaskKind::Group, None, "G", ymd(1, 1), true)
        .unwrap();
    let u = planner
        .create_task_on(TaskKind::Unit, Some(g), "U", ymd(1, 1), true)
        .unwrap();
    let hide = TaskFields {
        visible: Some(false),
        ..Default::default()
    };
    planner.update_task_fields(u, &hide, true).unwrap();
    planner
        .add_dependency(g, Anchor::End, u, Anchor::Start, 0, true)
        .unwrap();
    assert_eq!(planner.tasks().get(u).unwrap().start, Some(ymd(1, 9)));
}

#[test]
fn replace_project_clears_history() {
    let mut planner = Planner::default();
    planner
        .create_task_on(TaskKind::Group, None, "G", ymd(1, 1), false)
        .unwrap();
    assert!(planner.can_undo());
    planner.replace_project(projed::Project::new("Fresh"));
    assert!(!planner.can_undo());
    assert!(planner.tasks().is_empty());
    assert_eq!(planner.project().name, "Fresh");
}
