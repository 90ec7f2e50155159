use crate::app::ProjedApp;
use crate::ui::theme;
use egui::{Color32, Context, RichText, Window};

/// Render the "Rename project" dialog.
pub fn show_rename_dialog(app: &mut ProjedApp, ctx: &Context) {
    let mut should_close = false;
    let mut apply = false;
    Window::new(RichText::new("Rename Project").strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([300.0, 0.0])
        .show(ctx, |ui| {
            ui.visuals_mut().extreme_bg_color = theme::BG_FIELD;
            ui.add_space(4.0);
            let edit = ui.add_sized(
                [ui.available_width(), 24.0],
                egui::TextEdit::singleline(&mut app.rename_buffer).hint_text("Project name..."),
            );
            if edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                apply = true;
            }
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                let ok = egui::Button::new(RichText::new("Rename").color(Color32::WHITE))
                    .fill(theme::ACCENT)
                    .rounding(egui::Rounding::same(4.0));
                if ui.add_sized([80.0, 28.0], ok).clicked() {
                    apply = true;
                }
                if ui.add_sized([80.0, 28.0], egui::Button::new("Cancel")).clicked() {
                    should_close = true;
                }
            });
        });

    if apply {
        let name = app.rename_buffer.trim().to_string();
        if !name.is_empty() {
            app.planner.rename_project(name);
        }
        should_close = true;
    }
    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.show_rename = false;
    }
}

/// Render the "About" dialog.
pub fn show_about_dialog(app: &mut ProjedApp, ctx: &Context) {
    let mut should_close = false;
    Window::new("About")
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([300.0, 180.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(12.0);
                ui.heading(RichText::new("ProJED").strong());
                ui.add_space(2.0);
                ui.label(
                    RichText::new(format!("Version {}", projed::core_version()))
                        .color(theme::TEXT_SECONDARY),
                );
                ui.add_space(10.0);
                ui.label("Groups, units and steps on a timeline,");
                ui.label("kept in order by their dependencies.");
                ui.add_space(14.0);
                if ui.add_sized([100.0, 28.0], egui::Button::new("Close")).clicked() {
                    should_close = true;
                }
            });
        });
    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.show_about = false;
    }
}
