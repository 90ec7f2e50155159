use crate::app::ProjedApp;
use crate::ui::theme;
use egui::{menu, RichText, Ui};
use projed::{Granularity, TaskStatus};

/// Render the top toolbar / menu bar.
pub fn show_toolbar(app: &mut ProjedApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button(RichText::new("  File  ").font(theme::font_menu()), |ui| {
            if ui.button("  New Project").clicked() {
                app.new_project();
                ui.close_menu();
            }
            if ui.button("  Open...").clicked() {
                app.open_project();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Save          Ctrl+S").clicked() {
                app.save_project();
                ui.close_menu();
            }
            if ui.button("  Save As...").clicked() {
                app.save_project_as();
                ui.close_menu();
            }
            if ui.button("  Rename...").clicked() {
                app.rename_buffer = app.planner.project().name.clone();
                app.show_rename = true;
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Export CSV...").clicked() {
                app.export_csv();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Open Settings Folder").clicked() {
                app.open_settings_folder();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  Edit  ").font(theme::font_menu()), |ui| {
            if ui
                .add_enabled(app.planner.can_undo(), egui::Button::new("  Undo          Ctrl+Z"))
                .clicked()
            {
                app.undo();
                ui.close_menu();
            }
            if ui
                .add_enabled(app.planner.can_redo(), egui::Button::new("  Redo          Ctrl+Y"))
                .clicked()
            {
                app.redo();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  View  ").font(theme::font_menu()), |ui| {
            ui.label(RichText::new("Timeline Scale").small().weak());
            let current = app.planner.settings().granularity;
            for granularity in Granularity::all() {
                if ui.radio(current == *granularity, granularity.label()).clicked() {
                    app.set_granularity(*granularity);
                    ui.close_menu();
                }
            }
            ui.separator();
            ui.label(RichText::new("Show").small().weak());
            ui.checkbox(&mut app.filter.groups, "Groups");
            ui.checkbox(&mut app.filter.units, "Units");
            ui.checkbox(&mut app.filter.steps, "Steps");
            ui.separator();
            ui.label(RichText::new("Status").small().weak());
            for status in TaskStatus::all() {
                let mut shown = !app.filter.hidden_statuses.contains(status);
                if ui.checkbox(&mut shown, status.label()).changed() {
                    app.filter.toggle_status(*status);
                }
            }
        });

        ui.menu_button(RichText::new("  Help  ").font(theme::font_menu()), |ui| {
            if ui.button("About").clicked() {
                app.show_about = true;
                ui.close_menu();
            }
        });

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let modified = if app.file_path.is_some() { "" } else { " (unsaved)" };
            ui.label(
                RichText::new(format!("{}{}", app.planner.project().name, modified))
                    .size(11.0)
                    .weak(),
            );
        });
    });
}
