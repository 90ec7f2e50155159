use chrono::NaiveDate;
use projed::schedule::is_violated;
use projed::{
    Anchor, ConstraintPolicy, DateUpdate, DependencyGraph, Planner, Scheduler, TaskId, TaskKind,
    TaskStore,
};

fn ymd(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, m, d).unwrap()
}

/// A group holding one unit per range; returns the unit ids in order.
fn planner_with_units(ranges: &[(NaiveDate, NaiveDate)]) -> (Planner, Vec<TaskId>) {
    let mut planner = Planner::default();
    let group = planner
        .create_task_on(TaskKind::Group, None, "G", ymd(1, 1), true)
        .unwrap();
    let ids = ranges
        .iter()
        .enumerate()
        .map(|(i, (start, end))| {
            let id = planner
                .create_task_on(TaskKind::Unit, Some(group), &format!("U{i}"), *start, true)
                .unwrap();
            planner
                .update_task_dates(id, &DateUpdate::range(*start, *end), true)
                .unwrap();
            id
        })
        .collect();
    (planner, ids)
}

fn range_of(planner: &Planner, id: TaskId) -> (NaiveDate, NaiveDate) {
    planner.tasks().get(id).unwrap().range().unwrap()
}

#[test]
fn finish_to_start_starts_the_day_after() {
    let (mut planner, ids) =
        planner_with_units(&[(ymd(1, 1), ymd(1, 10)), (ymd(1, 5), ymd(1, 8))]);
    let (_, report) = planner
        .add_dependency(ids[0], Anchor::End, ids[1], Anchor::Start, 0, true)
        .unwrap();

    assert_eq!(range_of(&planner, ids[1]), (ymd(1, 11), ymd(1, 14)));
    assert_eq!(report.writes(), 1);
    assert!(report.converged());
}

#[test]
fn satisfied_graph_is_idempotent() {
    let (mut planner, ids) =
        planner_with_units(&[(ymd(1, 1), ymd(1, 10)), (ymd(1, 5), ymd(1, 8))]);
    planner
        .add_dependency(ids[0], Anchor::End, ids[1], Anchor::Start, 0, true)
        .unwrap();

    let before = planner.tasks().clone();
    let report = planner.reschedule(ids[0]).unwrap();
    assert_eq!(report.writes(), 0);
    assert_eq!(planner.tasks(), &before);
    assert!(!planner.can_undo());
}

#[test]
fn offset_adds_days() {
    let (mut planner, ids) =
        planner_with_units(&[(ymd(1, 1), ymd(1, 10)), (ymd(1, 1), ymd(1, 2))]);
    planner
        .add_dependency(ids[0], Anchor::End, ids[1], Anchor::Start, 3, true)
        .unwrap();
    assert_eq!(range_of(&planner, ids[1]), (ymd(1, 14), ymd(1, 15)));
}

#[test]
fn start_to_start_never_pulls_earlier() {
    let (mut planner, ids) =
        planner_with_units(&[(ymd(1, 10), ymd(1, 12)), (ymd(1, 15), ymd(1, 18))]);
    planner
        .add_dependency(ids[0], Anchor::Start, ids[1], Anchor::Start, 0, true)
        .unwrap();

    planner
        .update_task_dates(ids[0], &DateUpdate::range(ymd(1, 2), ymd(1, 4)), true)
        .unwrap();
    assert_eq!(range_of(&planner, ids[1]), (ymd(1, 15), ymd(1, 18)));

    planner
        .update_task_dates(ids[0], &DateUpdate::range(ymd(1, 20), ymd(1, 25)), true)
        .unwrap();
    assert_eq!(range_of(&planner, ids[1]), (ymd(1, 20), ymd(1, 23)));
}

#[test]
fn finish_to_finish_translates_whole_range() {
    let (mut planner, ids) =
        planner_with_units(&[(ymd(1, 1), ymd(1, 20)), (ymd(1, 5), ymd(1, 10))]);
    planner
        .add_dependency(ids[0], Anchor::End, ids[1], Anchor::End, 0, true)
        .unwrap();
    assert_eq!(range_of(&planner, ids[1]), (ymd(1, 15), ymd(1, 20)));
}

#[test]
fn chain_propagates_transitively() {
    let (mut planner, ids) = planner_with_units(&[
        (ymd(1, 1), ymd(1, 10)),
        (ymd(1, 1), ymd(1, 3)),
        (ymd(1, 1), ymd(1, 2)),
    ]);
    planner
        .add_dependency(ids[0], Anchor::End, ids[1], Anchor::Start, 0, true)
        .unwrap();
    planner
        .add_dependency(ids[1], Anchor::End, ids[2], Anchor::Start, 0, true)
        .unwrap();
    assert_eq!(range_of(&planner, ids[1]), (ymd(1, 11), ymd(1, 13)));
    assert_eq!(range_of(&planner, ids[2]), (ymd(1, 14), ymd(1, 15)));

    let report = planner
        .update_task_dates(ids[0], &DateUpdate::end(Some(ymd(1, 20))), true)
        .unwrap();
    assert_eq!(report.writes(), 2);
    assert_eq!(range_of(&planner, ids[1]), (ymd(1, 21), ymd(1, 23)));
    assert_eq!(range_of(&planner, ids[2]), (ymd(1, 24), ymd(1, 25)));
}

#[test]
fn cycle_terminates_and_reports_unresolved_edge() {
    let (mut planner, ids) =
        planner_with_units(&[(ymd(1, 1), ymd(1, 5)), (ymd(1, 6), ymd(1, 8))]);
    let (forward, report) = planner
        .add_dependency(ids[0], Anchor::End, ids[1], Anchor::Start, 0, true)
        .unwrap();
    assert_eq!(report.writes(), 0);

    let (_, report) = planner
        .add_dependency(ids[1], Anchor::End, ids[0], Anchor::Start, 0, true)
        .unwrap();
    assert_eq!(report.writes(), 1);
    assert!(report.shifted(ids[0]));
    assert_eq!(report.unresolved, vec![forward]);
    assert_eq!(range_of(&planner, ids[0]), (ymd(1, 9), ymd(1, 13)));
    // The origin of the pass is never moved by an incoming edge.
    assert_eq!(range_of(&planner, ids[1]), (ymd(1, 6), ymd(1, 8)));
}

#[test]
fn self_edge_moves_only_the_constrained_anchor() {
    let (mut planner, ids) = planner_with_units(&[(ymd(1, 1), ymd(1, 5))]);
    let (_, report) = planner
        .add_dependency(ids[0], Anchor::Start, ids[0], Anchor::End, 10, true)
        .unwrap();
    assert_eq!(report.writes(), 1);
    assert_eq!(range_of(&planner, ids[0]), (ymd(1, 1), ymd(1, 11)));
}

#[test]
fn undated_dependents_are_unconstrained() {
    let (mut planner, ids) =
        planner_with_units(&[(ymd(1, 1), ymd(1, 10)), (ymd(1, 1), ymd(1, 2))]);
    planner
        .update_task_dates(ids[1], &DateUpdate::start(None), true)
        .unwrap();
    let (_, report) = planner
        .add_dependency(ids[0], Anchor::End, ids[1], Anchor::End, 0, true)
        .unwrap();
    assert_eq!(report.writes(), 0);
    let milestone = planner.tasks().get(ids[1]).unwrap();
    assert_eq!((milestone.start, milestone.end), (None, Some(ymd(1, 2))));
}

#[test]
fn constraint_policy_decides_between_incoming_edges() {
    let build = || {
        let mut store = TaskStore::new();
        let g = store
            .create(TaskKind::Group, None, "G", ymd(1, 1), 0)
            .unwrap();
        let mut unit = |end: NaiveDate| {
            let id = store
                .create(TaskKind::Unit, Some(g), "U", ymd(1, 1), 0)
                .unwrap();
            store
                .update_dates(id, &DateUpdate::range(ymd(1, 1), end))
                .unwrap();
            id
        };
        let a = unit(ymd(1, 10));
        let b = unit(ymd(1, 20));
        let c = unit(ymd(1, 2));
        let mut graph = DependencyGraph::new();
        graph.add_edge(a, Anchor::End, c, Anchor::Start, 0).unwrap();
        graph.add_edge(b, Anchor::End, c, Anchor::Start, 0).unwrap();
        (store, graph, a, c)
    };

    let (mut store, graph, a, c) = build();
    Scheduler::new(ConstraintPolicy::Sequential).propagate(&mut store, &graph, a);
    assert_eq!(store.get(c).unwrap().range(), Some((ymd(1, 11), ymd(1, 12))));

    let (mut store, graph, a, c) = build();
    Scheduler::new(ConstraintPolicy::MostRestrictive).propagate(&mut store, &graph, a);
    assert_eq!(store.get(c).unwrap().range(), Some((ymd(1, 21), ymd(1, 22))));
}

/// A bare store with one unit per range under a single group, for driving the
/// scheduler over a hand-built graph.
fn store_with_units(ranges: &[(NaiveDate, NaiveDate)]) -> (TaskStore, Vec<TaskId>) {
    let mut store = TaskStore::new();
    let group = store
        .create(TaskKind::Group, None, "G", ymd(1, 1), 0)
        .unwrap();
    let ids = ranges
        .iter()
        .map(|(start, end)| {
            let id = store
                .create(TaskKind::Unit, Some(group), "U", *start, 0)
                .unwrap();
            store
                .update_dates(id, &DateUpdate::range(*start, *end))
                .unwrap();
            id
        })
        .collect();
    (store, ids)
}

#[test]
fn diamond_settles_on_the_latest_branch() {
    let (mut store, ids) = store_with_units(&[
        (ymd(1, 1), ymd(1, 10)),
        (ymd(1, 1), ymd(1, 2)),
        (ymd(1, 1), ymd(1, 5)),
        (ymd(1, 1), ymd(1, 2)),
    ]);
    let (a, b, c, d) = (ids[0], ids[1], ids[2], ids[3]);
    let mut graph = DependencyGraph::new();
    for (from, to) in [(a, b), (a, c), (b, d), (c, d)] {
        graph.add_edge(from, Anchor::End, to, Anchor::Start, 0).unwrap();
    }

    let report = Scheduler::default().propagate(&mut store, &graph, a);
    assert!(report.converged());
    assert_eq!(store.get(b).unwrap().range(), Some((ymd(1, 11), ymd(1, 12))));
    assert_eq!(store.get(c).unwrap().range(), Some((ymd(1, 11), ymd(1, 15))));
    assert_eq!(store.get(d).unwrap().range(), Some((ymd(1, 16), ymd(1, 17))));
    assert_eq!(report.writes(), 4);
    assert!(graph.iter().all(|e| is_violated(e, &store) == Some(false)));
}

#[test]
fn later_edge_on_the_same_anchor_still_applies() {
    let (mut store, ids) = store_with_units(&[(ymd(1, 1), ymd(1, 10)), (ymd(1, 1), ymd(1, 5))]);
    let (a, c) = (ids[0], ids[1]);
    let mut graph = DependencyGraph::new();
    graph.add_edge(a, Anchor::End, c, Anchor::Start, 0).unwrap();
    graph.add_edge(a, Anchor::Start, c, Anchor::Start, 15).unwrap();

    let report = Scheduler::default().propagate(&mut store, &graph, a);
    assert!(report.converged());
    assert_eq!(store.get(c).unwrap().range(), Some((ymd(1, 16), ymd(1, 20))));
}

#[test]
fn cycle_away_from_the_origin_terminates() {
    let (mut store, ids) = store_with_units(&[
        (ymd(1, 1), ymd(1, 10)),
        (ymd(1, 1), ymd(1, 2)),
        (ymd(1, 1), ymd(1, 2)),
    ]);
    let (o, x, y) = (ids[0], ids[1], ids[2]);
    let mut graph = DependencyGraph::new();
    graph.add_edge(o, Anchor::End, x, Anchor::Start, 0).unwrap();
    graph.add_edge(x, Anchor::End, y, Anchor::Start, 0).unwrap();
    let back = graph.add_edge(y, Anchor::End, x, Anchor::Start, 0).unwrap();

    let report = Scheduler::default().propagate(&mut store, &graph, o);
    assert!(!report.converged());
    assert!(report.unresolved.contains(&back));
    assert!(report.writes() <= 2 * store.len());
    assert_eq!(store.get(o).unwrap().range(), Some((ymd(1, 1), ymd(1, 10))));
}

#[test]
fn negative_offset_allows_overlap() {
    let (mut planner, ids) =
        planner_with_units(&[(ymd(1, 1), ymd(1, 10)), (ymd(1, 1), ymd(1, 2))]);
    planner
        .add_dependency(ids[0], Anchor::End, ids[1], Anchor::Start, -3, true)
        .unwrap();
    assert_eq!(range_of(&planner, ids[1]), (ymd(1, 8), ymd(1, 9)));
}

#[test]
fn out_of_calendar_offsets_leave_dependents_alone() {
    let (mut planner, ids) =
        planner_with_units(&[(ymd(1, 1), ymd(1, 10)), (ymd(1, 1), ymd(1, 2))]);
    for offset in [100_000_000, i64::MAX] {
        let (edge, report) = planner
            .add_dependency(ids[0], Anchor::End, ids[1], Anchor::Start, offset, true)
            .unwrap();
        assert_eq!(report.writes(), 0);
        assert_eq!(is_violated(planner.dependencies().get(edge).unwrap(), planner.tasks()), None);
        planner.remove_dependency(edge, true).unwrap();
    }
    assert_eq!(range_of(&planner, ids[1]), (ymd(1, 1), ymd(1, 2)));
}
