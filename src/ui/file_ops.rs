//! Saving and loading drill files.
//!
//! Dialogs run on the tokio runtime so the UI thread never blocks; results
//! come back over the file-operation channel and are applied on the next
//! frame. Files hold the scene JSON only, not editor state, so a drill saved
//! here can be applied by any host that speaks the same format.

use super::state::{
    DrillApp, FileOperationResult, PendingLoadOperation, PendingSaveOperation,
};
use crate::host::ChangeSource;
use crate::types::Scene;
use eframe::egui;

impl DrillApp {
    /// Processes completed async file operations and starts pending ones.
    pub fn handle_pending_operations(&mut self, ctx: &egui::Context, now: f64) {
        if let Some(receiver) = &self.file.file_operation_receiver {
            let mut results = Vec::new();
            while let Ok(result) = receiver.try_recv() {
                results.push(result);
            }
            for result in results {
                match result {
                    FileOperationResult::SaveCompleted(path) => {
                        log::info!("drill saved to {path}");
                        self.file.current_path = Some(path);
                        self.file.has_unsaved_changes = false;
                    }
                    FileOperationResult::LoadCompleted(path, content) => {
                        match Scene::from_json(&content) {
                            Ok(scene) => {
                                log::info!("drill loaded from {path}");
                                self.install_scene(scene, ChangeSource::External, now);
                                self.file.current_path = Some(path);
                                self.file.has_unsaved_changes = false;
                            }
                            Err(e) => log::error!("failed to parse drill file {path}: {e}"),
                        }
                    }
                    FileOperationResult::OperationFailed(error) => {
                        log::error!("file operation failed: {error}");
                    }
                }
            }
        }

        if let Some(save_op) = self.file.pending_save_operation.take() {
            let ctx = ctx.clone();
            let scene_json = self.scene.to_json().unwrap_or_default();
            let sender = self.file.file_operation_sender.clone();

            match save_op {
                PendingSaveOperation::SaveAs => {
                    tokio::spawn(async move {
                        if let Some(handle) = rfd::AsyncFileDialog::new()
                            .add_filter("JSON", &["json"])
                            .set_file_name("drill.json")
                            .save_file()
                            .await
                        {
                            let path = handle.path();
                            let result = match std::fs::write(path, scene_json) {
                                Ok(_) => {
                                    FileOperationResult::SaveCompleted(path.display().to_string())
                                }
                                Err(e) => FileOperationResult::OperationFailed(format!(
                                    "failed to save file: {e}"
                                )),
                            };
                            if let Some(tx) = sender {
                                let _ = tx.send(result);
                            }
                        }
                        ctx.request_repaint();
                    });
                }
                PendingSaveOperation::Save => {
                    if let Some(path) = self.file.current_path.clone() {
                        tokio::spawn(async move {
                            let result = match std::fs::write(&path, scene_json) {
                                Ok(_) => FileOperationResult::SaveCompleted(path),
                                Err(e) => FileOperationResult::OperationFailed(format!(
                                    "failed to save file: {e}"
                                )),
                            };
                            if let Some(tx) = sender {
                                let _ = tx.send(result);
                            }
                            ctx.request_repaint();
                        });
                    } else {
                        self.file.pending_save_operation = Some(PendingSaveOperation::SaveAs);
                    }
                }
            }
        }

        if let Some(PendingLoadOperation::Load) = self.file.pending_load_operation.take() {
            let ctx = ctx.clone();
            let sender = self.file.file_operation_sender.clone();

            tokio::spawn(async move {
                if let Some(handle) = rfd::AsyncFileDialog::new()
                    .add_filter("JSON", &["json"])
                    .pick_file()
                    .await
                {
                    let path = handle.path();
                    let result = match std::fs::read_to_string(path) {
                        Ok(json) => {
                            FileOperationResult::LoadCompleted(path.display().to_string(), json)
                        }
                        Err(e) => {
                            FileOperationResult::OperationFailed(format!("failed to read file: {e}"))
                        }
                    };
                    if let Some(tx) = sender {
                        let _ = tx.send(result);
                    }
                }
                ctx.request_repaint();
            });
        }
    }

    /// Opens a file dialog to save the drill under a new name.
    pub fn save_drill_as(&mut self) {
        self.file.pending_save_operation = Some(PendingSaveOperation::SaveAs);
    }

    /// Saves to the current file path, or falls back to "Save As".
    pub fn save_drill(&mut self) {
        if self.file.current_path.is_some() {
            self.file.pending_save_operation = Some(PendingSaveOperation::Save);
        } else {
            self.save_drill_as();
        }
    }

    /// Opens a file dialog to load a drill from disk.
    pub fn load_drill(&mut self) {
        self.file.pending_load_operation = Some(PendingLoadOperation::Load);
    }

    /// Starts a fresh drill with no backing file.
    pub fn new_drill(&mut self, now: f64) {
        self.clear_scene(now);
        self.history.clear();
        self.file.current_path = None;
        self.file.has_unsaved_changes = false;
        self.canvas.needs_fit = true;
    }
}
