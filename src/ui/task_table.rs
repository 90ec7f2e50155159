use crate::ui::theme;
use egui::{Color32, RichText, Ui};
use egui_phosphor::regular as icons;
use projed::{TaskId, TaskKind, TaskStore};

/// Actions that the task table can request.
pub enum TaskTableAction {
    None,
    Select(TaskId),
    Delete(TaskId),
    AddGroup,
    AddChild(TaskId),
    ToggleVisible(TaskId),
}

/// Render the task hierarchy in board order.
pub fn show_task_table(
    tasks: &TaskStore,
    selected_task: Option<TaskId>,
    ui: &mut Ui,
) -> TaskTableAction {
    let mut action = TaskTableAction::None;

    ui.add_space(2.0);
    ui.horizontal(|ui| {
        ui.label(
            RichText::new("Tasks")
                .strong()
                .size(15.0)
                .color(theme::TEXT_PRIMARY),
        );
        ui.add_space(4.0);
        ui.label(
            RichText::new(format!("({})", tasks.len()))
                .size(11.0)
                .color(theme::TEXT_DIM),
        );
    });
    ui.add_space(4.0);

    let btn = egui::Button::new(
        RichText::new(format!("{}  Add Group", icons::PLUS))
            .color(Color32::WHITE)
            .size(12.0),
    )
    .fill(theme::ACCENT)
    .rounding(egui::Rounding::same(5.0));
    if ui.add_sized([ui.available_width(), 30.0], btn).clicked() {
        action = TaskTableAction::AddGroup;
    }

    ui.add_space(6.0);
    ui.separator();

    egui::ScrollArea::vertical()
        .id_salt("task-table")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for task in tasks.walk() {
                let is_selected = selected_task == Some(task.id);
                let row_bg = if is_selected {
                    theme::BG_SELECTED
                } else {
                    Color32::TRANSPARENT
                };

                let frame = egui::Frame {
                    fill: row_bg,
                    rounding: egui::Rounding::same(4.0),
                    inner_margin: egui::Margin::symmetric(6.0, 3.0),
                    ..Default::default()
                };

                let frame_resp = frame.show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.spacing_mut().item_spacing.x = 6.0;
                        ui.add_space(task.kind.depth() as f32 * 14.0);

                        let icon_color = if task.visible {
                            theme::status_color(task.status)
                        } else {
                            theme::TEXT_DIM
                        };
                        ui.label(RichText::new(theme::kind_icon(task.kind)).color(icon_color));

                        let mut name = RichText::new(&task.title).size(12.0);
                        name = if !task.visible {
                            name.color(theme::TEXT_DIM).italics()
                        } else if is_selected {
                            name.color(Color32::WHITE)
                        } else {
                            name.color(theme::TEXT_PRIMARY)
                        };
                        ui.add(egui::Label::new(name).truncate());

                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.spacing_mut().item_spacing.x = 2.0;
                            let small = |text: &str| {
                                egui::Button::new(RichText::new(text).size(11.0).color(theme::TEXT_DIM))
                                    .frame(false)
                            };

                            if ui.add(small(icons::TRASH)).on_hover_text("Delete").clicked() {
                                action = TaskTableAction::Delete(task.id);
                            }
                            let eye = if task.visible { icons::EYE } else { icons::EYE_SLASH };
                            if ui
                                .add(small(eye))
                                .on_hover_text("Show on timeline")
                                .clicked()
                            {
                                action = TaskTableAction::ToggleVisible(task.id);
                            }
                            if let Some(child) = task.kind.child_kind() {
                                let hint = match child {
                                    TaskKind::Unit => "Add unit",
                                    _ => "Add step",
                                };
                                if ui.add(small(icons::PLUS)).on_hover_text(hint).clicked() {
                                    action = TaskTableAction::AddChild(task.id);
                                }
                            }
                        });
                    });
                });

                let row_click = ui.interact(
                    frame_resp.response.rect,
                    egui::Id::new(("task-row", task.id)),
                    egui::Sense::click(),
                );
                if row_click.clicked() {
                    action = TaskTableAction::Select(task.id);
                }
            }
        });

    action
}
