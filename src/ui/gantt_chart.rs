use crate::ui::theme;
use egui::{Color32, Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2};
use projed::layout::{Bar, BarShape, DrawModel, Label, LabelSide};
use projed::{
    DragController, DragError, DragMode, DrawFilter, Planner, ScheduleReport, TaskId, TaskKind,
    TimelineViewport,
};

const ROW_HEIGHT: f32 = theme::ROW_HEIGHT;
const ROW_PADDING: f32 = theme::ROW_GAP;
const HEADER_HEIGHT: f32 = theme::HEADER_HEIGHT;
const HANDLE_WIDTH: f32 = theme::HANDLE_WIDTH;

/// Result details from interactions in the chart.
#[derive(Debug, Default)]
pub struct ChartInteraction {
    /// Set when a drag was released this frame.
    pub committed: Option<Result<Option<ScheduleReport>, DragError>>,
    pub cancelled: bool,
    pub error: Option<String>,
}

fn row_top(origin: Pos2, row: usize) -> f32 {
    origin.y + HEADER_HEIGHT + row as f32 * (ROW_HEIGHT + ROW_PADDING)
}

/// Render the timeline (central panel) and drive bar drags.
pub fn show_gantt_chart(
    planner: &mut Planner,
    drag: &mut DragController,
    filter: &DrawFilter,
    selected_task: &mut Option<TaskId>,
    ui: &mut Ui,
) -> ChartInteraction {
    let mut interaction = ChartInteraction::default();
    let today = chrono::Local::now().date_naive();

    egui::ScrollArea::both()
        .auto_shrink([false, false])
        .show_viewport(ui, |ui, visible| {
            let viewport = TimelineViewport {
                scroll_left: visible.min.x,
                width: visible.width(),
                today,
            };
            let mut model = planner.draw_model(&viewport, filter);
            apply_preview(&mut model, drag);

            let chart_height = HEADER_HEIGHT
                + model.rows.len() as f32 * (ROW_HEIGHT + ROW_PADDING)
                + 40.0;
            let (response, painter) = ui.allocate_painter(
                Vec2::new(model.total_width, chart_height.max(visible.height())),
                Sense::click(),
            );
            let origin = response.rect.min;
            let canvas = response.rect;
            let mut consumed_click = false;

            painter.rect_filled(canvas, 0.0, theme::BG_DARK);

            for band in &model.weekends {
                painter.rect_filled(
                    Rect::from_min_size(
                        Pos2::new(origin.x + band.left, origin.y + HEADER_HEIGHT),
                        Vec2::new(band.width, canvas.height() - HEADER_HEIGHT),
                    ),
                    0.0,
                    theme::WEEKEND_BAND,
                );
            }

            draw_timeline_header(&painter, origin, &model, canvas.height());

            for row in 0..model.rows.len() {
                if row % 2 == 0 {
                    painter.rect_filled(
                        Rect::from_min_size(
                            Pos2::new(origin.x, row_top(origin, row)),
                            Vec2::new(model.total_width, ROW_HEIGHT + ROW_PADDING),
                        ),
                        0.0,
                        Color32::from_white_alpha(4),
                    );
                }
            }

            for group in &model.groups {
                let top = row_top(origin, group.first_row);
                let bottom = row_top(origin, group.last_row + 1) - ROW_PADDING;
                let fill = match group.kind {
                    TaskKind::Group => theme::GROUP_BG,
                    _ => theme::UNIT_BG,
                };
                painter.rect_filled(
                    Rect::from_min_max(
                        Pos2::new(origin.x + group.left, top),
                        Pos2::new(origin.x + group.left + group.width, bottom),
                    ),
                    Rounding::same(6.0),
                    fill,
                );
            }

            if let Some(now) = model.now_marker {
                draw_today_line(&painter, origin, now.x, canvas.height());
            }

            for bar in &model.bars {
                let is_selected = *selected_task == Some(bar.task_id);
                let bar_rect = draw_bar(&painter, origin, bar, is_selected);
                draw_label(&painter, origin, bar);

                let body = ui.interact(
                    bar_rect,
                    ui.make_persistent_id(("bar", bar.task_id)),
                    Sense::click_and_drag(),
                );
                let mut mode = body.drag_started().then_some(DragMode::Move);

                if bar.shape == BarShape::Range {
                    let left = ui.interact(
                        handle_rect(bar_rect.left(), bar_rect),
                        ui.make_persistent_id(("bar-resize-start", bar.task_id)),
                        Sense::drag(),
                    );
                    let right = ui.interact(
                        handle_rect(bar_rect.right(), bar_rect),
                        ui.make_persistent_id(("bar-resize-end", bar.task_id)),
                        Sense::drag(),
                    );
                    if left.hovered() || right.hovered() {
                        ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeHorizontal);
                    }
                    if left.drag_started() {
                        mode = Some(DragMode::ResizeStart);
                    } else if right.drag_started() {
                        mode = Some(DragMode::ResizeEnd);
                    }
                    if is_selected {
                        draw_handles(&painter, bar_rect);
                    }
                }

                if body.clicked() {
                    *selected_task = Some(bar.task_id);
                    consumed_click = true;
                }

                if let Some(mode) = mode {
                    *selected_task = Some(bar.task_id);
                    consumed_click = true;
                    let press_x = ui
                        .input(|i| i.pointer.press_origin())
                        .map(|p| p.x - origin.x)
                        .unwrap_or(bar.left);
                    if let Err(e) = drag.begin_drag(&model, bar.task_id, mode, press_x) {
                        interaction.error = Some(e.to_string());
                    }
                }

                if body.hovered() && !drag.is_dragging() {
                    body.on_hover_ui_at_pointer(|ui| {
                        ui.strong(&bar.title);
                        ui.label(format!("{} → {}", bar.start, bar.end));
                        ui.label(bar.status.label());
                    });
                }
            }

            if let Some(guide) = drag.preview().and_then(|p| p.guide_x) {
                painter.line_segment(
                    [
                        Pos2::new(origin.x + guide, origin.y + HEADER_HEIGHT),
                        Pos2::new(origin.x + guide, canvas.bottom()),
                    ],
                    Stroke::new(1.0, theme::SNAP_GUIDE),
                );
            }

            // The gesture is tracked at canvas scope so it survives the
            // pointer leaving the bar.
            if drag.is_dragging() {
                ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
                if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                    drag.cancel_drag();
                    interaction.cancelled = true;
                } else if ui.input(|i| i.pointer.any_released()) {
                    interaction.committed = Some(drag.commit_drag(planner));
                } else if let Some(pos) = ui.input(|i| i.pointer.interact_pos()) {
                    drag.update_drag(pos.x - origin.x);
                }
            }

            if response.clicked() && !consumed_click {
                *selected_task = None;
            }
        });

    interaction
}

/// Replace the dragged bar's geometry with the controller's candidate.
fn apply_preview(model: &mut DrawModel, drag: &DragController) {
    let Some(preview) = drag.preview() else {
        return;
    };
    if let Some(bar) = model.bars.iter_mut().find(|b| b.task_id == preview.task_id) {
        bar.left = preview.left;
        bar.width = preview.width;
        bar.start = preview.start;
        bar.end = preview.end;
        bar.label = Label::Inside {
            center_x: preview.left + preview.width / 2.0,
        };
    }
}

fn handle_rect(x: f32, bar_rect: Rect) -> Rect {
    Rect::from_min_max(
        Pos2::new(x - HANDLE_WIDTH * 0.5, bar_rect.top()),
        Pos2::new(x + HANDLE_WIDTH * 0.5, bar_rect.bottom()),
    )
    .expand(2.0)
}

fn draw_timeline_header(painter: &egui::Painter, origin: Pos2, model: &DrawModel, height: f32) {
    painter.rect_filled(
        Rect::from_min_size(origin, Vec2::new(model.total_width, HEADER_HEIGHT)),
        0.0,
        theme::BG_HEADER,
    );
    painter.line_segment(
        [
            Pos2::new(origin.x, origin.y + HEADER_HEIGHT),
            Pos2::new(origin.x + model.total_width, origin.y + HEADER_HEIGHT),
        ],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );

    let mut last_year = String::new();
    for line in &model.grid_lines {
        let x = origin.x + line.x;
        painter.line_segment(
            [Pos2::new(x, origin.y + HEADER_HEIGHT), Pos2::new(x, origin.y + height)],
            Stroke::new(0.5, theme::GRID_LINE),
        );

        if line.label != last_year || line.sub_label.is_empty() {
            painter.text(
                Pos2::new(x + 4.0, origin.y + 12.0),
                egui::Align2::LEFT_CENTER,
                &line.label,
                theme::font_header(),
                theme::TEXT_PRIMARY,
            );
            last_year = line.label.clone();
        }
        if !line.sub_label.is_empty() {
            painter.text(
                Pos2::new(x + 4.0, origin.y + 30.0),
                egui::Align2::LEFT_CENTER,
                &line.sub_label,
                theme::font_sub(),
                theme::TEXT_SECONDARY,
            );
        }
    }
}

fn draw_today_line(painter: &egui::Painter, origin: Pos2, x: f32, height: f32) {
    let x = origin.x + x;
    painter.line_segment(
        [
            Pos2::new(x, origin.y + HEADER_HEIGHT),
            Pos2::new(x, origin.y + height),
        ],
        Stroke::new(1.5, theme::TODAY_LINE),
    );

    let badge_w = 42.0;
    let badge_rect = Rect::from_min_size(
        Pos2::new(x - badge_w / 2.0, origin.y + HEADER_HEIGHT - 1.0),
        Vec2::new(badge_w, 14.0),
    );
    painter.rect_filled(badge_rect, Rounding::same(3.0), theme::TODAY_LINE);
    painter.text(
        badge_rect.center(),
        egui::Align2::CENTER_CENTER,
        "Today",
        theme::font_small(),
        Color32::WHITE,
    );
}

fn draw_bar(painter: &egui::Painter, origin: Pos2, bar: &Bar, is_selected: bool) -> Rect {
    let y = row_top(origin, bar.row) + ROW_PADDING;
    let color = theme::status_color(bar.status);

    if bar.shape == BarShape::Milestone {
        let center = Pos2::new(origin.x + bar.left + bar.width / 2.0, y + ROW_HEIGHT / 2.0);
        let size = bar.width / 2.0 + 3.0;
        let points = vec![
            Pos2::new(center.x, center.y - size),
            Pos2::new(center.x + size, center.y),
            Pos2::new(center.x, center.y + size),
            Pos2::new(center.x - size, center.y),
        ];
        let stroke = if is_selected {
            Stroke::new(2.0, theme::BORDER_ACCENT)
        } else {
            Stroke::NONE
        };
        painter.add(egui::Shape::convex_polygon(points, color, stroke));
        return Rect::from_center_size(center, Vec2::splat(size * 2.0 + 4.0));
    }

    let inset = theme::BAR_INSET;
    let bar_rect = Rect::from_min_size(
        Pos2::new(origin.x + bar.left, y + inset),
        Vec2::new(bar.width, ROW_HEIGHT - inset * 2.0),
    );
    let rounding = Rounding::same(theme::BAR_ROUNDING);

    if bar.shape == BarShape::Placeholder {
        painter.rect_filled(bar_rect, rounding, color.gamma_multiply(0.15));
        painter.rect_stroke(bar_rect, rounding, Stroke::new(1.0, color.gamma_multiply(0.5)));
    } else {
        painter.rect_filled(
            bar_rect.translate(Vec2::new(1.0, 2.0)),
            rounding,
            Color32::from_black_alpha(35),
        );
        let fill = match bar.kind {
            TaskKind::Step => color.gamma_multiply(0.8),
            _ => color,
        };
        painter.rect_filled(bar_rect, rounding, fill);
    }

    if is_selected {
        painter.rect_stroke(
            bar_rect.expand(1.5),
            Rounding::same(theme::BAR_ROUNDING + 1.5),
            Stroke::new(2.0, theme::BORDER_ACCENT),
        );
    }

    bar_rect
}

fn draw_handles(painter: &egui::Painter, bar_rect: Rect) {
    let handle_h = bar_rect.height() * 0.55;
    let handle_y = bar_rect.center().y - handle_h / 2.0;
    for x in [bar_rect.left() - 1.5, bar_rect.right() - 2.5] {
        painter.rect_filled(
            Rect::from_min_size(Pos2::new(x, handle_y), Vec2::new(4.0, handle_h)),
            Rounding::same(2.0),
            theme::HANDLE_COLOR,
        );
    }
}

fn draw_label(painter: &egui::Painter, origin: Pos2, bar: &Bar) {
    let y = row_top(origin, bar.row) + ROW_PADDING + ROW_HEIGHT / 2.0;
    match bar.label {
        Label::Inside { center_x } => {
            let clip = Rect::from_min_size(
                Pos2::new(origin.x + bar.left, y - ROW_HEIGHT / 2.0),
                Vec2::new(bar.width, ROW_HEIGHT),
            );
            painter.with_clip_rect(clip).text(
                Pos2::new(origin.x + center_x, y),
                egui::Align2::CENTER_CENTER,
                &bar.title,
                theme::font_bar(),
                theme::TEXT_ON_BAR,
            );
        }
        Label::Outside { side, x } => {
            let align = match side {
                LabelSide::Right => egui::Align2::LEFT_CENTER,
                LabelSide::Left => egui::Align2::RIGHT_CENTER,
            };
            painter.text(
                Pos2::new(origin.x + x, y),
                align,
                &bar.title,
                theme::font_bar(),
                theme::TEXT_SECONDARY,
            );
        }
    }
}
