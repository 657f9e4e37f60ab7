//! Drill playback: a fixed-cycle time loop that slides qualifying nodes
//! along their attached path.
//!
//! Playback is a rendering-time transform only. Node rest coordinates are
//! never mutated, nothing here touches the history, and the player is fed
//! wall-clock seconds by the host each frame so the logic stays portable.

use crate::constants::{ATTACH_RADIUS, PLAYBACK_CYCLE_MS, PLAYBACK_PAUSE_MS};
use crate::geometry::path_position;
use crate::types::{Node, NodeKind, Path, PathPoint, PathType};

/// Play/stop state for the drill animation.
#[derive(Debug, Clone, Default)]
pub struct AnimationPlayer {
    playing: bool,
    started_at: Option<f64>,
}

impl AnimationPlayer {
    /// Creates a stopped player.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether playback is currently running.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Starts playback at `now` (seconds). Starting while already running is
    /// a no-op, so a second loop can never be registered.
    pub fn start(&mut self, now: f64) {
        if !self.playing {
            self.playing = true;
            self.started_at = Some(now);
        }
    }

    /// Stops playback and resets progress to zero, restoring rest positions
    /// on the next paint.
    pub fn stop(&mut self) {
        self.playing = false;
        self.started_at = None;
    }

    /// The single play/stop toggle exposed to the UI.
    pub fn toggle(&mut self, now: f64) {
        if self.playing {
            self.stop();
        } else {
            self.start(now);
        }
    }

    /// Progress through the current cycle, in `[0, 1]`.
    ///
    /// Each cycle is a traversal of `PLAYBACK_CYCLE_MS` followed by a pause
    /// of `PLAYBACK_PAUSE_MS`; during the pause the value holds at 1.
    pub fn progress(&self, now: f64) -> f32 {
        let Some(started) = self.started_at else {
            return 0.0;
        };
        let elapsed_ms = ((now - started) * 1000.0).max(0.0);
        let within = elapsed_ms % (PLAYBACK_CYCLE_MS + PLAYBACK_PAUSE_MS);
        (within / PLAYBACK_CYCLE_MS).min(1.0) as f32
    }
}

/// Finds the path a node is attached to, if any.
///
/// A node is attached to the first path whose starting point lies within
/// [`ATTACH_RADIUS`] of the node's rest position. Linear paths only carry
/// `player` nodes; curve paths carry any kind. Attachment is re-derived from
/// proximity on every tick rather than persisted, so two nodes resting near
/// the same path start animate identically.
pub fn attached_path<'a>(node: &Node, paths: &'a [Path]) -> Option<&'a Path> {
    paths.iter().find(|path| {
        let Some(first) = path.points.first() else {
            return false;
        };
        let dx = first.x - node.x;
        let dy = first.y - node.y;
        if (dx * dx + dy * dy).sqrt() > ATTACH_RADIUS {
            return false;
        }
        match path.path_type {
            PathType::Curve => true,
            PathType::Linear => matches!(node.kind, NodeKind::Player),
        }
    })
}

/// The position a node should be painted at during playback, or `None` when
/// the node is unattached and rests where it is.
pub fn playback_position(node: &Node, paths: &[Path], t: f32) -> Option<PathPoint> {
    attached_path(node, paths).map(|path| path_position(path, t))
}
