//! Undo/redo history over whole-scene snapshots.
//!
//! Because `Scene` is an immutable value and every mutator returns a new
//! one, history is just two bounded stacks of scenes. A commit records the
//! scene as it was *before* an action; multi-step gestures snapshot once at
//! gesture start and commit once at gesture end.

use crate::constants::MAX_HISTORY;
use crate::types::Scene;
use serde::{Deserialize, Serialize};

/// Bounded undo/redo stacks for the scene.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneHistory {
    /// Scenes as they were before each committed action
    #[serde(skip)]
    undo_stack: Vec<Scene>,
    /// Scenes undone and available for redo
    #[serde(skip)]
    redo_stack: Vec<Scene>,
}

impl SceneHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the scene as it was before an action.
    ///
    /// Clears the redo stack (a new action invalidates undone futures) and
    /// drops the oldest entry past the cap.
    pub fn commit(&mut self, previous: Scene) {
        self.undo_stack.push(previous);
        self.redo_stack.clear();
        if self.undo_stack.len() > MAX_HISTORY {
            self.undo_stack.remove(0);
        }
    }

    /// Steps back: returns the scene to restore, pushing `current` onto the
    /// redo stack. `None` on an empty stack (no-op for the caller).
    pub fn undo(&mut self, current: Scene) -> Option<Scene> {
        let restored = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(restored)
    }

    /// Steps forward again; the mirror of [`SceneHistory::undo`].
    pub fn redo(&mut self, current: Scene) -> Option<Scene> {
        let restored = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        Some(restored)
    }

    /// True if there is anything to undo.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// True if there is anything to redo.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Drops all history, e.g. after loading a new drill file.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
