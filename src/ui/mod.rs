//! The egui user interface: app shell, toolbar, and keyboard shortcuts.

pub mod canvas;
pub mod file_ops;
pub mod rendering;
pub mod state;
pub mod undo;

#[cfg(test)]
mod tests;

pub use state::DrillApp;

use crate::templates;
use crate::types::NodeKind;
use eframe::egui;
use state::EditorState;

/// Node kinds offered by the placement menu, in toolbar order.
const PLACEABLE_KINDS: &[NodeKind] = &[
    NodeKind::Coach,
    NodeKind::Player,
    NodeKind::Target,
    NodeKind::TargetBox,
    NodeKind::TargetLine,
    NodeKind::Ball,
    NodeKind::Text,
    NodeKind::Cone,
    NodeKind::Feeder,
    NodeKind::Ladder,
];

impl DrillApp {
    /// Creates the app, restoring persisted state when available.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        if let Some(storage) = cc.storage {
            if let Some(app) = eframe::get_value(storage, eframe::APP_KEY) {
                return app;
            }
        }
        Self::default()
    }

    fn handle_keyboard_shortcuts(&mut self, ctx: &egui::Context, now: f64) {
        if ctx.wants_keyboard_input() {
            return;
        }

        struct Keys {
            undo: bool,
            redo: bool,
            delete: bool,
            duplicate: bool,
            escape: bool,
            enter: bool,
            arrows: (f32, f32),
            save: bool,
            save_as: bool,
            open: bool,
            new_file: bool,
        }
        let keys = ctx.input(|i| {
            let cmd = i.modifiers.command;
            let shift = i.modifiers.shift;
            let mut arrows = (0.0, 0.0);
            if i.key_pressed(egui::Key::ArrowLeft) {
                arrows.0 -= 1.0;
            }
            if i.key_pressed(egui::Key::ArrowRight) {
                arrows.0 += 1.0;
            }
            if i.key_pressed(egui::Key::ArrowUp) {
                arrows.1 -= 1.0;
            }
            if i.key_pressed(egui::Key::ArrowDown) {
                arrows.1 += 1.0;
            }
            Keys {
                undo: cmd && !shift && i.key_pressed(egui::Key::Z),
                redo: cmd && (i.key_pressed(egui::Key::Y) || (shift && i.key_pressed(egui::Key::Z))),
                delete: i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace),
                duplicate: cmd && i.key_pressed(egui::Key::D),
                escape: i.key_pressed(egui::Key::Escape),
                enter: i.key_pressed(egui::Key::Enter),
                arrows,
                save: cmd && !shift && i.key_pressed(egui::Key::S),
                save_as: cmd && shift && i.key_pressed(egui::Key::S),
                open: cmd && i.key_pressed(egui::Key::O),
                new_file: cmd && i.key_pressed(egui::Key::N),
            }
        });

        if keys.undo {
            self.perform_undo(now);
        }
        if keys.redo {
            self.perform_redo(now);
        }
        if keys.delete {
            self.delete_selection(now);
        }
        if keys.duplicate {
            self.duplicate_selection(now);
        }
        if keys.escape {
            self.handle_escape(now);
        }
        if keys.enter {
            self.finish_path_gesture(now);
        }
        if keys.arrows != (0.0, 0.0) {
            self.nudge_selection(keys.arrows.0, keys.arrows.1, now);
        }
        if keys.save {
            self.save_drill();
        }
        if keys.save_as {
            self.save_drill_as();
        }
        if keys.open {
            self.load_drill();
        }
        if keys.new_file {
            self.new_drill(now);
        }
    }

    fn draw_toolbar(&mut self, ui: &mut egui::Ui, now: f64) {
        ui.horizontal_wrapped(|ui| {
            let is_idle = matches!(self.interaction.state, EditorState::Idle);
            if ui.selectable_label(is_idle, "Select").clicked() {
                self.interaction.state = EditorState::Idle;
            }

            let placing_kind = match &self.interaction.state {
                EditorState::Placing(kind) => Some(kind.clone()),
                _ => None,
            };
            ui.menu_button(
                placing_kind
                    .as_ref()
                    .map(|k| format!("Place: {}", k.display_name()))
                    .unwrap_or_else(|| "Place".to_owned()),
                |ui| {
                    for kind in PLACEABLE_KINDS {
                        let active = placing_kind.as_ref() == Some(kind);
                        if ui.selectable_label(active, kind.display_name()).clicked() {
                            self.interaction.state = EditorState::Placing(kind.clone());
                            ui.close();
                        }
                    }
                },
            );

            let drawing_linear =
                matches!(self.interaction.state, EditorState::DrawingLinear { .. });
            if ui.selectable_label(drawing_linear, "Line").clicked() {
                self.interaction.state = EditorState::DrawingLinear { points: Vec::new() };
            }
            let drawing_curve = matches!(self.interaction.state, EditorState::DrawingCurve { .. });
            if ui.selectable_label(drawing_curve, "Curve").clicked() {
                self.interaction.state = EditorState::DrawingCurve {
                    start: None,
                    end: None,
                };
            }
            ui.checkbox(&mut self.interaction.quick_segments, "Two-click lines");

            ui.separator();

            ui.add_enabled_ui(self.history.can_undo(), |ui| {
                if ui.button("Undo").clicked() {
                    self.perform_undo(now);
                }
            });
            ui.add_enabled_ui(self.history.can_redo(), |ui| {
                if ui.button("Redo").clicked() {
                    self.perform_redo(now);
                }
            });

            let has_selection = !self.interaction.selection.is_empty();
            ui.add_enabled_ui(has_selection, |ui| {
                if ui.button("Duplicate").clicked() {
                    self.duplicate_selection(now);
                }
                if ui.button("Delete").clicked() {
                    self.delete_selection(now);
                }
            });

            ui.separator();

            ui.checkbox(&mut self.canvas.snap_enabled, "Snap");
            if ui.button("Rotate court").clicked() {
                self.toggle_orientation(now);
            }
            if ui
                .button(if self.player.is_playing() { "Stop" } else { "Play" })
                .clicked()
            {
                self.player.toggle(now);
            }

            ui.menu_button("Templates", |ui| {
                for info in templates::all_templates() {
                    if ui.button(info.name).clicked() {
                        self.apply_template(info.kind, now);
                        ui.close();
                    }
                }
            });
            if ui.button("Clear").clicked() {
                self.clear_scene(now);
            }

            ui.separator();

            if ui.button("New").clicked() {
                self.new_drill(now);
            }
            if ui.button("Open").clicked() {
                self.load_drill();
            }
            if ui.button("Save").clicked() {
                self.save_drill();
            }
            if ui.button("Save As").clicked() {
                self.save_drill_as();
            }

            ui.separator();

            if ui
                .button(if self.dark_mode { "Light" } else { "Dark" })
                .clicked()
            {
                self.dark_mode = !self.dark_mode;
            }
            if ui.button("Fit").clicked() {
                self.canvas.needs_fit = true;
            }
            ui.label(format!("{:.0}%", self.canvas.zoom_factor * 100.0));
            if self.file.has_unsaved_changes {
                ui.label("Unsaved changes");
            }
        });
    }
}

impl eframe::App for DrillApp {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = ctx.input(|i| i.time);

        if self.dark_mode {
            ctx.set_visuals(egui::Visuals::dark());
        } else {
            ctx.set_visuals(egui::Visuals::light());
        }

        self.pump_host_events(now);
        let scene = self.scene.clone();
        self.host.flush_due(now, &scene);
        self.handle_pending_operations(ctx, now);
        self.handle_keyboard_shortcuts(ctx, now);

        let name = self
            .file
            .current_path
            .as_deref()
            .unwrap_or("untitled drill");
        let marker = if self.file.has_unsaved_changes { "*" } else { "" };
        ctx.send_viewport_cmd(egui::ViewportCommand::Title(format!(
            "Drill Designer - {name}{marker}"
        )));

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui, now);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            canvas::draw_canvas(self, ui, now);
        });
    }
}
