//! Shared application-wide constants.
//! Centralizes tweakable values used across the scene model, interactions,
//! animation, and rendering.

// Logical canvas
/// Canonical scene width in landscape orientation (scene units).
pub const CANVAS_WIDTH: f32 = 1200.0;
/// Canonical scene height in landscape orientation (scene units).
pub const CANVAS_HEIGHT: f32 = 600.0;

// Placement
/// Snap step (scene units) applied when snapping is enabled.
pub const SNAP_STEP: f32 = 20.0;
/// Arrow-key nudge distance (scene units) when snapping is disabled.
pub const NUDGE_STEP: f32 = 5.0;
/// Offset applied to every duplicated coordinate.
pub const DUPLICATE_OFFSET: f32 = 20.0;
/// Maximum number of ball nodes allowed in a scene.
pub const BALL_LIMIT: usize = 10;

// Canvas interactions
/// Movement threshold (scene units) distinguishing a click from a drag.
pub const CLICK_THRESHOLD: f32 = 6.0;
/// Hit radius for node glyphs (scene units) when no size override is set.
pub const NODE_HIT_RADIUS: f32 = 16.0;
/// Maximum distance (scene units) at which a path stroke counts as hit.
pub const PATH_HIT_DISTANCE: f32 = 8.0;
/// Hit radius for endpoint/control handles of a selected path.
pub const HANDLE_HIT_RADIUS: f32 = 10.0;

// Undo/redo
/// Maximum number of scene snapshots retained for undo.
pub const MAX_HISTORY: usize = 50;

// Animation
/// Duration of one playback traversal along a path, in milliseconds.
pub const PLAYBACK_CYCLE_MS: f64 = 2000.0;
/// Pause at the end of each traversal before the cycle repeats.
pub const PLAYBACK_PAUSE_MS: f64 = 500.0;
/// Distance between a node's rest position and a path's first point below
/// which the node is considered attached to that path.
pub const ATTACH_RADIUS: f32 = 40.0;

// Persistence
/// Quiet period before a pending scene-changed notification is flushed.
pub const AUTOSAVE_DEBOUNCE_SECS: f64 = 0.4;
