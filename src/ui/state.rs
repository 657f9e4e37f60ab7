//! Application state structures.
//!
//! This module contains the main `DrillApp` struct plus the state the UI
//! tracks between frames: canvas navigation, the interaction state machine,
//! and file operations.

use super::undo::SceneHistory;
use crate::animation::AnimationPlayer;
use crate::constants::{NUDGE_STEP, SNAP_STEP};
use crate::host::{ChangeSource, HostEvent, HostLink};
use crate::templates::TemplateKind;
use crate::types::{Grid, NodeKind, PathPoint, Scene, SceneId};
use eframe::egui;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{channel, Receiver, Sender};

/// State related to canvas navigation and display.
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasState {
    /// Current canvas pan offset in screen space
    #[serde(skip)]
    pub offset: egui::Vec2,
    /// Current zoom level (1.0 = one scene unit per pixel)
    pub zoom_factor: f32,
    /// Whether coordinates snap to the grid during placement and drags
    pub snap_enabled: bool,
    /// Whether the court is shown in portrait orientation
    pub portrait: bool,
    /// One-shot flag: fit the court into the viewport on the next frame
    #[serde(skip)]
    pub needs_fit: bool,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            offset: egui::Vec2::ZERO,
            zoom_factor: 1.0,
            snap_enabled: true,
            portrait: false,
            needs_fit: true,
        }
    }
}

/// The gesture/tool state machine driving all pointer interaction.
///
/// Placement and drawing variants double as the "armed tool" between
/// gestures; the press-driven variants carry their start-of-gesture
/// snapshot so intermediate pointer moves never accumulate error and the
/// gesture commits exactly once.
#[derive(Debug, Clone, Default)]
pub enum EditorState {
    /// No tool armed; clicks select, drags move or marquee
    #[default]
    Idle,
    /// A placement tool is armed; the next click places a node
    Placing(NodeKind),
    /// The selection is being dragged from a snapshot taken at press time
    Dragging {
        /// Pointer position at press, in scene coordinates
        start: PathPoint,
        /// Scene as of the press
        snapshot: Scene,
        /// Whether movement ever exceeded the click threshold
        moved: bool,
        /// Set on a plain press: if the gesture turns out to be a click,
        /// the selection collapses to this element on release
        click_target: Option<SceneId>,
    },
    /// The polyline tool is armed; accumulated points so far
    DrawingLinear {
        /// Points clicked so far (empty when freshly armed)
        points: Vec<PathPoint>,
    },
    /// The curve tool is armed; start/end fill in over three clicks
    DrawingCurve {
        /// First click
        start: Option<PathPoint>,
        /// Second click; the third click supplies the control point
        end: Option<PathPoint>,
    },
    /// An endpoint/control handle of a path is being dragged
    EditingHandle {
        /// The path whose point is being rewritten
        path_id: SceneId,
        /// Index of the point within the path
        index: usize,
        /// Scene as of the press
        snapshot: Scene,
    },
    /// A rubber-band selection is being dragged on empty canvas
    Marquee {
        /// Press position in scene coordinates
        origin: PathPoint,
        /// Whether the result unions with the pre-drag selection
        additive: bool,
    },
}

/// State related to user interactions with the scene.
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionState {
    /// Current gesture/tool state
    #[serde(skip)]
    pub state: EditorState,
    /// Selected ids, drawn from the combined node+path id space
    #[serde(skip)]
    pub selection: Vec<SceneId>,
    /// Live pointer position in scene coordinates, for previews
    #[serde(skip)]
    pub pointer: Option<PathPoint>,
    /// Current marquee corner while a marquee is active
    #[serde(skip)]
    pub marquee_end: Option<PathPoint>,
    /// Two-click segment mode for the polyline tool
    pub quick_segments: bool,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            state: EditorState::Idle,
            selection: Vec::new(),
            pointer: None,
            marquee_end: None,
            quick_segments: false,
        }
    }
}

/// Represents a pending save operation type.
#[derive(Debug)]
pub enum PendingSaveOperation {
    /// Save with a new file path (show file picker)
    SaveAs,
    /// Save to the existing file path
    Save,
}

/// Represents a pending load operation type.
#[derive(Debug)]
pub enum PendingLoadOperation {
    /// Load from a file (show file picker)
    Load,
}

/// Messages sent from async file operations back to the main app.
#[derive(Debug)]
pub enum FileOperationResult {
    /// Save completed successfully with the given path
    SaveCompleted(String),
    /// Load completed successfully with path and content
    LoadCompleted(String, String),
    /// Operation failed with an error message
    OperationFailed(String),
}

/// State related to file operations and persistence.
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct FileState {
    /// Current file path for save/load operations
    #[serde(skip)]
    pub current_path: Option<String>,
    /// Whether the drill has unsaved changes
    #[serde(skip)]
    pub has_unsaved_changes: bool,
    /// Pending async operations
    #[serde(skip)]
    pub pending_save_operation: Option<PendingSaveOperation>,
    #[serde(skip)]
    pub pending_load_operation: Option<PendingLoadOperation>,
    /// Channel for receiving file operation results from async contexts
    #[serde(skip)]
    pub file_operation_sender: Option<Sender<FileOperationResult>>,
    #[serde(skip)]
    pub file_operation_receiver: Option<Receiver<FileOperationResult>>,
}

impl Default for FileState {
    fn default() -> Self {
        let (sender, receiver) = channel();
        Self {
            current_path: None,
            has_unsaved_changes: false,
            pending_save_operation: None,
            pending_load_operation: None,
            file_operation_sender: Some(sender),
            file_operation_receiver: Some(receiver),
        }
    }
}

/// The main application: the scene being edited plus all UI state.
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct DrillApp {
    /// The drill diagram being edited
    pub scene: Scene,
    /// Undo/redo history of whole-scene snapshots
    pub history: SceneHistory,
    /// Playback state for the drill animation
    #[serde(skip)]
    pub player: AnimationPlayer,
    /// Canvas navigation and display state
    pub canvas: CanvasState,
    /// User interaction state
    pub interaction: InteractionState,
    /// File operations state
    pub file: FileState,
    /// Channels to and from the hosting application
    #[serde(skip)]
    pub host: HostLink,
    /// Whether dark mode visuals are enabled
    pub dark_mode: bool,
}

impl Default for DrillApp {
    fn default() -> Self {
        Self {
            scene: Scene::default(),
            history: SceneHistory::new(),
            player: AnimationPlayer::new(),
            canvas: CanvasState::default(),
            interaction: InteractionState::default(),
            file: FileState::default(),
            host: HostLink::new(),
            dark_mode: true,
        }
    }
}

impl DrillApp {
    /// Serializes the application state to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes application state from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The clamp/snap grid for the current orientation and snap setting.
    pub fn grid(&self) -> Grid {
        let step = self.canvas.snap_enabled.then_some(SNAP_STEP);
        if self.canvas.portrait {
            Grid::portrait(step)
        } else {
            Grid::landscape(step)
        }
    }

    /// Records one undoable transition: the scene as it was before the
    /// action goes into history, and the change is queued for the debounced
    /// scene-changed notification.
    pub fn commit_scene(&mut self, previous: Scene, now: f64) {
        self.history.commit(previous);
        self.file.has_unsaved_changes = true;
        self.host.mark_changed(now, ChangeSource::User);
    }

    /// Undoes the most recent committed action, if any.
    pub fn perform_undo(&mut self, now: f64) {
        if let Some(restored) = self.history.undo(self.scene.clone()) {
            self.scene = restored;
            self.prune_selection();
            self.file.has_unsaved_changes = true;
            self.host.mark_changed(now, ChangeSource::User);
        }
    }

    /// Redoes the most recently undone action, if any.
    pub fn perform_redo(&mut self, now: f64) {
        if let Some(restored) = self.history.redo(self.scene.clone()) {
            self.scene = restored;
            self.prune_selection();
            self.file.has_unsaved_changes = true;
            self.host.mark_changed(now, ChangeSource::User);
        }
    }

    /// Replaces the whole scene from outside the editor (template apply,
    /// drill switch, file load). One history entry; selection, in-progress
    /// gestures, and playback all reset.
    pub fn install_scene(&mut self, scene: Scene, source: ChangeSource, now: f64) {
        let previous = std::mem::replace(&mut self.scene, scene);
        self.history.commit(previous);
        self.interaction.selection.clear();
        self.interaction.state = EditorState::Idle;
        self.interaction.marquee_end = None;
        self.player.stop();
        self.file.has_unsaved_changes = true;
        self.host.mark_changed(now, source);
    }

    /// Empties the scene; same reset semantics as an external apply.
    pub fn clear_scene(&mut self, now: f64) {
        self.install_scene(Scene::default(), ChangeSource::External, now);
    }

    /// Applies a built-in template through the external path.
    pub fn apply_template(&mut self, kind: TemplateKind, now: f64) {
        self.install_scene(crate::templates::build_template(kind), ChangeSource::External, now);
    }

    /// Processes events from the hosting application.
    pub fn pump_host_events(&mut self, now: f64) {
        for event in self.host.drain_events() {
            match event {
                HostEvent::Apply(scene) => {
                    self.install_scene(scene, ChangeSource::External, now)
                }
                HostEvent::Clear => self.clear_scene(now),
                HostEvent::SuppressNextAutosave => {}
            }
        }
    }

    /// Deletes the current selection and clears it.
    pub fn delete_selection(&mut self, now: f64) {
        if self.interaction.selection.is_empty() {
            return;
        }
        let previous = self.scene.clone();
        self.scene = self.scene.remove(&self.interaction.selection);
        self.interaction.selection.clear();
        self.commit_scene(previous, now);
    }

    /// Duplicates the current selection and selects the copies.
    pub fn duplicate_selection(&mut self, now: f64) {
        if self.interaction.selection.is_empty() {
            return;
        }
        let previous = self.scene.clone();
        let (next, new_ids) = self.scene.duplicate(&self.interaction.selection, &self.grid());
        if new_ids.is_empty() {
            return;
        }
        self.scene = next;
        self.interaction.selection = new_ids;
        self.commit_scene(previous, now);
    }

    /// Translates the selection by one step in the given direction,
    /// committing immediately. The step is the snap step when snapping is
    /// enabled, otherwise a small fixed nudge.
    pub fn nudge_selection(&mut self, dx: f32, dy: f32, now: f64) {
        if self.interaction.selection.is_empty() {
            return;
        }
        let step = if self.canvas.snap_enabled {
            SNAP_STEP
        } else {
            NUDGE_STEP
        };
        let previous = self.scene.clone();
        let next =
            self.scene
                .translated(&self.interaction.selection, dx * step, dy * step, &self.grid());
        if next != previous {
            self.scene = next;
            self.commit_scene(previous, now);
        }
    }

    /// Pivots the court between landscape and portrait: every coordinate
    /// `(x, y)` becomes `(y, x)`. One history entry; applying twice is the
    /// identity.
    pub fn toggle_orientation(&mut self, now: f64) {
        let previous = self.scene.clone();
        self.scene = self.scene.flipped();
        self.canvas.portrait = !self.canvas.portrait;
        self.canvas.needs_fit = true;
        self.commit_scene(previous, now);
    }

    /// Drops selected ids that no longer exist in the scene.
    pub fn prune_selection(&mut self) {
        let scene = &self.scene;
        self.interaction.selection.retain(|id| scene.contains(*id));
    }
}
