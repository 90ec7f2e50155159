use std::path::PathBuf;

use chrono::NaiveDate;
use projed::{
    Anchor, DateUpdate, DragController, DrawFilter, Granularity, Planner, Project,
    ScheduleReport, Settings, StoreError, TaskFields, TaskId, TaskKind,
};

use crate::ui;
use crate::ui::task_editor::EditorAction;
use crate::ui::task_table::TaskTableAction;

/// Main application state.
pub struct ProjedApp {
    pub planner: Planner,
    pub drag: DragController,
    pub filter: DrawFilter,
    pub file_path: Option<PathBuf>,
    pub selected_task: Option<TaskId>,

    // Dialog state
    pub show_about: bool,
    pub show_rename: bool,
    pub rename_buffer: String,

    // Status message
    pub status_message: String,
}

impl ProjedApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings) -> Self {
        // Register Phosphor icon font as a fallback so icons render inline with text
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);
        ui::theme::apply_theme(&cc.egui_ctx);

        let drag = DragController::from_settings(&settings);
        let mut planner = Planner::new(settings);
        if let Err(e) = Self::sample_project(&mut planner) {
            tracing::warn!(%e, "could not build the sample project");
        }

        Self {
            planner,
            drag,
            filter: DrawFilter::default(),
            file_path: None,
            selected_task: None,
            show_about: false,
            show_rename: false,
            rename_buffer: String::new(),
            status_message: "Ready".to_string(),
        }
    }

    /// Populate a demonstration project. Nothing here is undoable.
    fn sample_project(planner: &mut Planner) -> Result<(), StoreError> {
        let today = chrono::Local::now().date_naive();
        let days = |n: i64| today + chrono::Duration::days(n);
        planner.rename_project("Sample Project");

        let mut add = |kind: TaskKind,
                       parent: Option<TaskId>,
                       title: &str,
                       start: Option<NaiveDate>,
                       end: Option<NaiveDate>|
         -> Result<TaskId, StoreError> {
            let id = planner.create_task_on(kind, parent, title, today, true)?;
            planner.update_task_dates(id, &DateUpdate { start: Some(start), end: Some(end) }, true)?;
            Ok(id)
        };

        let planning = add(TaskKind::Group, None, "Planning", Some(days(-5)), Some(days(10)))?;
        let kickoff = add(TaskKind::Unit, Some(planning), "Kickoff", Some(days(-5)), Some(days(-3)))?;
        let reqs = add(TaskKind::Unit, Some(planning), "Requirements", Some(days(-2)), Some(days(6)))?;
        add(TaskKind::Step, Some(reqs), "Interview users", Some(days(-2)), Some(days(1)))?;
        add(TaskKind::Step, Some(reqs), "Write brief", Some(days(2)), Some(days(6)))?;
        let signoff = add(TaskKind::Unit, Some(planning), "Sign-off", None, Some(days(8)))?;

        let build = add(TaskKind::Group, None, "Build", Some(days(9)), Some(days(40)))?;
        let design = add(TaskKind::Unit, Some(build), "UI design", Some(days(9)), Some(days(20)))?;
        let backend = add(TaskKind::Unit, Some(build), "Backend", Some(days(9)), Some(days(32)))?;
        let qa = add(TaskKind::Unit, Some(build), "Testing & QA", Some(days(33)), Some(days(40)))?;
        add(TaskKind::Step, Some(qa), "Regression pass", None, None)?;

        let links = [
            (kickoff, Anchor::End, reqs, Anchor::Start),
            (reqs, Anchor::End, signoff, Anchor::End),
            (signoff, Anchor::End, design, Anchor::Start),
            (design, Anchor::Start, backend, Anchor::Start),
            (backend, Anchor::End, qa, Anchor::Start),
        ];
        for (from, from_side, to, to_side) in links {
            planner.add_dependency(from, from_side, to, to_side, 0, true)?;
        }
        Ok(())
    }

    // --- File operations ---

    pub fn new_project(&mut self) {
        self.drag.cancel_drag();
        self.planner.replace_project(Project::default());
        self.file_path = None;
        self.selected_task = None;
        self.status_message = "New project created".to_string();
    }

    pub fn open_project(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("ProJED Project", &["projed.json", "json"])
            .pick_file()
        {
            match projed::io::load_project(&path) {
                Ok(project) => {
                    self.drag.cancel_drag();
                    self.planner.replace_project(project);
                    self.file_path = Some(path);
                    self.selected_task = None;
                    self.status_message = "Project loaded".to_string();
                }
                Err(e) => {
                    self.status_message = format!("Error loading: {}", e);
                }
            }
        }
    }

    pub fn save_project(&mut self) {
        match self.file_path.clone() {
            Some(path) => self.write_project(&path),
            None => self.save_project_as(),
        }
    }

    pub fn save_project_as(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("ProJED Project", &["projed.json", "json"])
            .set_file_name(format!("{}.projed.json", self.planner.project().name))
            .save_file()
        {
            self.write_project(&path);
            self.file_path = Some(path);
        }
    }

    fn write_project(&mut self, path: &std::path::Path) {
        match projed::io::save_project(self.planner.project(), path) {
            Ok(()) => self.status_message = "Project saved".to_string(),
            Err(e) => self.status_message = format!("Error saving: {}", e),
        }
    }

    pub fn export_csv(&mut self) {
        if self.planner.tasks().is_empty() {
            self.status_message = "Nothing to export, the project has no tasks".to_string();
            return;
        }

        let default_name = format!("{}.csv", self.planner.project().name);
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_file_name(default_name)
            .save_file()
        {
            match projed::io::export_csv(self.planner.tasks(), &path) {
                Ok(count) => {
                    self.status_message = format!("Exported {} tasks to CSV", count);
                }
                Err(e) => {
                    self.status_message = format!("CSV export failed: {}", e);
                }
            }
        }
    }

    pub fn open_settings_folder(&mut self) {
        let Some(dir) = Settings::config_dir() else {
            self.status_message = "No config directory on this platform".to_string();
            return;
        };
        if let Err(e) = std::fs::create_dir_all(&dir).and_then(|_| open::that(&dir)) {
            self.status_message = format!("Could not open {}: {}", dir.display(), e);
        }
    }

    pub fn set_granularity(&mut self, granularity: Granularity) {
        let settings = Settings {
            granularity,
            ..self.planner.settings().clone()
        };
        if let Err(e) = settings.save() {
            tracing::warn!(%e, "could not persist settings");
        }
        self.planner.set_settings(settings);
    }

    // --- Task operations ---

    pub fn undo(&mut self) {
        self.drag.cancel_drag();
        if self.planner.undo() {
            self.forget_missing_selection();
            self.status_message = "Undo".to_string();
        }
    }

    pub fn redo(&mut self) {
        self.drag.cancel_drag();
        if self.planner.redo() {
            self.forget_missing_selection();
            self.status_message = "Redo".to_string();
        }
    }

    fn forget_missing_selection(&mut self) {
        if let Some(id) = self.selected_task {
            if !self.planner.tasks().contains(id) {
                self.selected_task = None;
            }
        }
    }

    fn report(&mut self, what: &str, report: &ScheduleReport) {
        self.status_message = match (report.writes(), report.unresolved.len()) {
            (0, 0) => what.to_string(),
            (n, 0) => format!("{what}; moved {n} dependent task(s)"),
            (n, u) => format!("{what}; moved {n}, {u} link(s) could not be satisfied"),
        };
    }

    fn handle_table_action(&mut self, action: TaskTableAction) {
        match action {
            TaskTableAction::Select(id) => self.selected_task = Some(id),
            TaskTableAction::AddGroup => {
                match self.planner.create_task(TaskKind::Group, None, "", false) {
                    Ok(id) => {
                        self.selected_task = Some(id);
                        self.status_message = "Group added".to_string();
                    }
                    Err(e) => self.status_message = e.to_string(),
                }
            }
            TaskTableAction::AddChild(parent) => {
                let Some(kind) = self
                    .planner
                    .tasks()
                    .get(parent)
                    .and_then(|t| t.kind.child_kind())
                else {
                    return;
                };
                match self.planner.create_task(kind, Some(parent), "", false) {
                    Ok(id) => {
                        self.selected_task = Some(id);
                        self.status_message = format!("Added {kind}");
                    }
                    Err(e) => self.status_message = e.to_string(),
                }
            }
            TaskTableAction::ToggleVisible(id) => {
                let visible = self.planner.tasks().get(id).map(|t| !t.visible);
                let fields = TaskFields {
                    visible,
                    ..Default::default()
                };
                if let Err(e) = self.planner.update_task_fields(id, &fields, false) {
                    self.status_message = e.to_string();
                }
            }
            TaskTableAction::Delete(id) => match self.planner.delete_task(id, false) {
                Ok(removed) => {
                    if self.selected_task.is_some_and(|s| removed.contains(&s)) {
                        self.selected_task = None;
                    }
                    self.status_message = format!("Deleted {} task(s)", removed.len());
                }
                Err(e) => self.status_message = e.to_string(),
            },
            TaskTableAction::None => {}
        }
    }

    fn handle_editor_action(&mut self, task_id: TaskId, action: EditorAction) {
        let result: Result<(), StoreError> = match action {
            EditorAction::None => Ok(()),
            EditorAction::Rename(title) => {
                let fields = TaskFields {
                    title: Some(title),
                    ..Default::default()
                };
                self.planner
                    .update_task_fields(task_id, &fields, false)
                    .map(|_| self.status_message = "Task renamed".to_string())
            }
            EditorAction::SetStatus(status) => {
                let fields = TaskFields {
                    status: Some(status),
                    ..Default::default()
                };
                self.planner
                    .update_task_fields(task_id, &fields, false)
                    .map(|_| self.status_message = format!("Status set to {}", status.label()))
            }
            EditorAction::SetDates { start, end } => self
                .planner
                .update_task_dates_text(task_id, Some(&start), Some(&end), false)
                .map(|report| self.report("Dates updated", &report)),
            EditorAction::Reschedule => self
                .planner
                .reschedule(task_id)
                .map(|report| self.report("Rescheduled", &report)),
            EditorAction::AddDependency {
                from,
                from_side,
                to,
                to_side,
                offset_days,
            } => self
                .planner
                .add_dependency(from, from_side, to, to_side, offset_days, false)
                .map(|(_, report)| self.report("Dependency added", &report)),
            EditorAction::RemoveDependency(id) => self
                .planner
                .remove_dependency(id, false)
                .map(|_| self.status_message = "Dependency removed".to_string()),
            EditorAction::SetOffset(id, offset) => self
                .planner
                .set_dependency_offset(id, offset, false)
                .map(|report| self.report("Offset updated", &report)),
        };
        if let Err(e) = result {
            self.status_message = e.to_string();
        }
    }
}

impl eframe::App for ProjedApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Handle keyboard shortcuts outside closures to avoid borrow issues
        let typing = ctx.wants_keyboard_input();
        let should_save = ctx.input(|i| i.modifiers.ctrl && i.key_pressed(egui::Key::S));
        let should_undo = !typing
            && ctx.input(|i| i.modifiers.ctrl && !i.modifiers.shift && i.key_pressed(egui::Key::Z));
        let should_redo = !typing
            && ctx.input(|i| {
                i.modifiers.ctrl
                    && (i.key_pressed(egui::Key::Y)
                        || (i.modifiers.shift && i.key_pressed(egui::Key::Z)))
            });
        if should_save {
            self.save_project();
        }
        if should_undo {
            self.undo();
        }
        if should_redo {
            self.redo();
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::STATUS_BAR_BG)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .size(11.0)
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(format!(
                                "Tasks: {} · Links: {} · {}",
                                self.planner.tasks().len(),
                                self.planner.dependencies().len(),
                                self.planner.settings().granularity.label(),
                            ))
                            .size(10.5)
                            .color(ui::theme::TEXT_DIM),
                        );
                    });
                });
            });

        let mut table_action = TaskTableAction::None;
        let mut editor_action = EditorAction::None;
        egui::SidePanel::left("task_panel")
            .default_width(ui::theme::SIDE_PANEL_WIDTH)
            .min_width(ui::theme::SIDE_PANEL_MIN_WIDTH)
            .max_width(ui::theme::SIDE_PANEL_WIDTH * 2.0)
            .resizable(true)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_PANEL)
                    .inner_margin(egui::Margin::same(8.0))
                    .stroke(egui::Stroke::new(1.0, ui::theme::BORDER_SUBTLE)),
            )
            .show(ctx, |ui| {
                if let Some(task) = self.selected_task.and_then(|id| self.planner.tasks().get(id)) {
                    editor_action = ui::task_editor::show_task_editor(task, &self.planner, ui);
                    ui.add_space(4.0);
                    ui.separator();
                }
                table_action =
                    ui::task_table::show_task_table(self.planner.tasks(), self.selected_task, ui);
            });

        if let Some(selected) = self.selected_task {
            self.handle_editor_action(selected, editor_action);
        }
        self.handle_table_action(table_action);

        let chart_frame = egui::Frame::default()
            .fill(ui::theme::BG_DARK)
            .inner_margin(egui::Margin::ZERO);
        egui::CentralPanel::default().frame(chart_frame).show(ctx, |ui| {
            let interaction = ui::gantt_chart::show_gantt_chart(
                &mut self.planner,
                &mut self.drag,
                &self.filter,
                &mut self.selected_task,
                ui,
            );
            if let Some(error) = interaction.error {
                self.status_message = error;
            }
            if interaction.cancelled {
                self.status_message = "Drag cancelled".to_string();
            }
            match interaction.committed {
                Some(Ok(Some(report))) => self.report("Timeline updated", &report),
                Some(Err(e)) => self.status_message = e.to_string(),
                Some(Ok(None)) | None => {}
            }
        });

        if self.show_rename {
            ui::dialogs::show_rename_dialog(self, ctx);
        }
        if self.show_about {
            ui::dialogs::show_about_dialog(self, ctx);
        }
    }
}
