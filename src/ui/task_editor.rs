use crate::ui::theme;
use egui::{Color32, Id, RichText, Ui};
use egui_phosphor::regular as icons;
use projed::model::dependency::MAX_OFFSET_DAYS;
use projed::model::task::format_date;
use projed::schedule::is_violated;
use projed::{Anchor, DependencyId, DependencyKind, Planner, Task, TaskId, TaskStatus};

/// Actions the editor can request.
pub enum EditorAction {
    None,
    Rename(String),
    SetStatus(TaskStatus),
    SetDates { start: String, end: String },
    Reschedule,
    AddDependency {
        from: TaskId,
        from_side: Anchor,
        to: TaskId,
        to_side: Anchor,
        offset_days: i64,
    },
    RemoveDependency(DependencyId),
    SetOffset(DependencyId, i64),
}

/// Text buffers for the editable fields, resynced whenever the task changes
/// underneath them (drag, undo, cascade).
#[derive(Clone, Default)]
struct EditorBuffers {
    synced: (String, String, String),
    title: String,
    start: String,
    end: String,
}

/// Persistent state for the "add dependency" picker.
#[derive(Clone)]
struct DepPickerState {
    target_id: Option<TaskId>,
    kind: DependencyKind,
    offset_days: i64,
}

fn field_label(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).size(10.0).color(theme::TEXT_DIM).strong());
}

/// Render the inline editor for the selected task.
pub fn show_task_editor(task: &Task, planner: &Planner, ui: &mut Ui) -> EditorAction {
    let mut action = EditorAction::None;
    let task_id = task.id;

    let buffers_id = Id::new(("editor-buffers", task_id));
    let current = (
        task.title.clone(),
        format_date(task.start),
        format_date(task.end),
    );
    let mut buffers: EditorBuffers = ui
        .ctx()
        .data_mut(|d| d.get_temp(buffers_id))
        .unwrap_or_default();
    if buffers.synced != current {
        buffers = EditorBuffers {
            title: current.0.clone(),
            start: current.1.clone(),
            end: current.2.clone(),
            synced: current,
        };
    }

    ui.add_space(6.0);
    ui.horizontal(|ui| {
        ui.label(RichText::new(theme::kind_icon(task.kind)).color(theme::status_color(task.status)));
        ui.label(
            RichText::new(format!("Edit {}", task.kind))
                .strong()
                .size(13.0)
                .color(theme::TEXT_PRIMARY),
        );
    });
    ui.add_space(4.0);

    let frame = egui::Frame {
        fill: theme::BG_DARK,
        rounding: egui::Rounding::same(5.0),
        inner_margin: egui::Margin::same(8.0),
        stroke: egui::Stroke::new(1.0, theme::BORDER_SUBTLE),
        ..Default::default()
    };

    frame.show(ui, |ui| {
        ui.spacing_mut().item_spacing.y = 6.0;
        ui.visuals_mut().extreme_bg_color = theme::BG_FIELD;

        // ── Title ─────────────────────────────────────────────────────
        field_label(ui, "Title");
        let title_edit = ui.add_sized(
            [ui.available_width(), 24.0],
            egui::TextEdit::singleline(&mut buffers.title).font(egui::FontId::proportional(12.0)),
        );
        if title_edit.lost_focus() && buffers.title.trim() != task.title {
            action = EditorAction::Rename(buffers.title.trim().to_string());
        }

        // ── Status ────────────────────────────────────────────────────
        field_label(ui, "Status");
        egui::ComboBox::from_id_salt(("status_combo", task_id))
            .selected_text(RichText::new(task.status.label()).size(11.0))
            .width(ui.available_width())
            .show_ui(ui, |ui| {
                for status in TaskStatus::all() {
                    if ui
                        .selectable_label(task.status == *status, status.label())
                        .clicked()
                    {
                        action = EditorAction::SetStatus(*status);
                    }
                }
            });

        // ── Dates ─────────────────────────────────────────────────────
        ui.horizontal(|ui| {
            for (label, buffer) in [("Start", &mut buffers.start), ("End", &mut buffers.end)] {
                ui.vertical(|ui| {
                    field_label(ui, label);
                    ui.add(
                        egui::TextEdit::singleline(buffer)
                            .desired_width(96.0)
                            .hint_text("YYYY-MM-DD"),
                    );
                });
            }
        });
        let dirty = buffers.start != buffers.synced.1 || buffers.end != buffers.synced.2;
        ui.horizontal(|ui| {
            if ui
                .add_enabled(dirty, egui::Button::new("Apply dates"))
                .clicked()
            {
                action = EditorAction::SetDates {
                    start: buffers.start.clone(),
                    end: buffers.end.clone(),
                };
            }
            if ui
                .button(RichText::new(format!("{} Reschedule", icons::ARROWS_CLOCKWISE)).size(11.0))
                .on_hover_text("Push dependents so every link from this task holds")
                .clicked()
            {
                action = EditorAction::Reschedule;
            }
        });
        if task.start.is_none() && task.end.is_some() {
            ui.label(RichText::new("Milestone (end date only)").size(9.5).color(theme::TEXT_DIM));
        }

        ui.separator();

        // ── Dependencies ──────────────────────────────────────────────
        field_label(ui, "Dependencies");
        let deps = planner.list_dependencies(task_id);
        if deps.is_empty() {
            ui.label(RichText::new("No dependencies yet").size(9.5).color(theme::TEXT_DIM));
        }
        for dep in deps {
            let is_outgoing = dep.from_id == task_id;
            let other_id = if is_outgoing { dep.to_id } else { dep.from_id };
            let other_name = if dep.is_self_edge() {
                "(this task)".to_string()
            } else {
                planner
                    .tasks()
                    .get(other_id)
                    .map(|t| t.title.clone())
                    .unwrap_or_else(|| "?".to_string())
            };
            let arrow = if is_outgoing { icons::ARROW_RIGHT } else { icons::ARROW_LEFT };
            let violated = is_violated(dep, planner.tasks()).unwrap_or(false);

            ui.horizontal(|ui| {
                ui.label(
                    RichText::new(format!("[{}] {} {}", dep.kind().short_label(), arrow, other_name))
                        .size(11.0)
                        .color(theme::TEXT_SECONDARY),
                )
                .on_hover_text(dep.kind().description());
                if violated {
                    ui.label(RichText::new(icons::WARNING).color(theme::TEXT_ERROR))
                        .on_hover_text("Constraint not satisfied");
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let del = ui.add(
                        egui::Button::new(RichText::new(icons::X).size(9.0).color(theme::TEXT_DIM))
                            .frame(false),
                    );
                    if del.on_hover_text("Remove dependency").clicked() {
                        action = EditorAction::RemoveDependency(dep.id);
                    }
                    let mut offset = dep.offset_days;
                    let resp = ui.add(
                        egui::DragValue::new(&mut offset)
                            .range(-MAX_OFFSET_DAYS..=MAX_OFFSET_DAYS)
                            .suffix(" d")
                            .speed(0.2),
                    );
                    if resp.changed() {
                        action = EditorAction::SetOffset(dep.id, offset);
                    }
                });
            });
        }

        ui.add_space(4.0);

        // ── Add dependency picker ─────────────────────────────────────
        // This task is the predecessor; the picked task is constrained.
        let picker_id = Id::new(("dep-picker", task_id));
        let mut state: DepPickerState = ui.ctx().data_mut(|d| {
            d.get_temp(picker_id).unwrap_or(DepPickerState {
                target_id: None,
                kind: DependencyKind::FinishToStart,
                offset_days: 0,
            })
        });

        let candidates: Vec<(TaskId, String)> = planner
            .tasks()
            .walk()
            .into_iter()
            .map(|t| {
                let name = if t.id == task_id {
                    "(this task)".to_string()
                } else {
                    format!("{}{}", "  ".repeat(t.kind.depth()), t.title)
                };
                (t.id, name)
            })
            .collect();
        let target_label = state
            .target_id
            .and_then(|id| candidates.iter().find(|(cid, _)| *cid == id))
            .map(|(_, name)| name.trim().to_string())
            .unwrap_or_else(|| "pick task…".to_string());

        field_label(ui, "Add dependency");
        ui.horizontal(|ui| {
            egui::ComboBox::from_id_salt(("new-dep-kind", task_id))
                .selected_text(RichText::new(state.kind.short_label()).size(11.0))
                .width(46.0)
                .show_ui(ui, |ui| {
                    for k in DependencyKind::all() {
                        let row = ui.selectable_label(state.kind == *k, k.short_label());
                        if row.on_hover_text(k.description()).clicked() {
                            state.kind = *k;
                        }
                    }
                })
                .response
                .on_hover_text(state.kind.description());

            let combo_w = (ui.available_width() - 90.0).clamp(60.0, 200.0);
            egui::ComboBox::from_id_salt(("new-dep-target", task_id))
                .selected_text(RichText::new(&target_label).size(11.0))
                .width(combo_w)
                .show_ui(ui, |ui| {
                    for (cid, cname) in &candidates {
                        if ui
                            .selectable_label(state.target_id == Some(*cid), cname.as_str())
                            .clicked()
                        {
                            state.target_id = Some(*cid);
                        }
                    }
                });

            ui.add(
                egui::DragValue::new(&mut state.offset_days)
                    .range(-MAX_OFFSET_DAYS..=MAX_OFFSET_DAYS)
                    .suffix(" d")
                    .speed(0.2),
            )
            .on_hover_text("Offset in days");

            let can_add = state.target_id.is_some();
            let btn = egui::Button::new(RichText::new(icons::PLUS).size(13.0).color(Color32::WHITE))
                .fill(if can_add { theme::ACCENT } else { theme::BG_FIELD })
                .rounding(egui::Rounding::same(4.0));
            if ui.add_enabled(can_add, btn).clicked() {
                if let Some(target) = state.target_id.take() {
                    let (from_side, to_side) = state.kind.anchors();
                    action = EditorAction::AddDependency {
                        from: task_id,
                        from_side,
                        to: target,
                        to_side,
                        offset_days: state.offset_days,
                    };
                }
            }
        });

        ui.ctx().data_mut(|d| d.insert_temp(picker_id, state));
    });

    ui.ctx().data_mut(|d| d.insert_temp(buffers_id, buffers));
    action
}
