//! # Drill Designer
//!
//! A visual editor for tennis drill diagrams: typed court elements (players,
//! coaches, balls, targets, cones and more) connected by movement and shot
//! arrows, drawn on a court-shaped canvas.
//!
//! ## Features
//! - Click placement, selection, dragging, and marquee selection
//! - Polyline and curved arrow drawing with editable handles
//! - Snapshot-based undo/redo
//! - Drill playback animating nodes along their attached arrows
//! - Court orientation pivoting, snapping, duplication, templates
//! - JSON drill files plus typed channels for an embedding host

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod animation;
pub mod constants;
pub mod geometry;
pub mod host;
pub mod templates;
pub mod types;
pub mod ui;

pub use host::{ChangeSource, HostEvent, HostLink, SceneChanged};
pub use types::{
    ArrowHead, LineStyle, Node, NodeKind, Path, PathPoint, PathStyle, PathType, Scene, SceneId,
};
pub use ui::DrillApp;

/// Runs the drill designer application with default settings.
///
/// Starts a tokio runtime for the async file dialogs, then hands control to
/// the eframe event loop until the window closes.
///
/// # Example
///
/// ```no_run
/// fn main() -> Result<(), eframe::Error> {
///     drill_designer::run_app()
/// }
/// ```
pub fn run_app() -> Result<(), eframe::Error> {
    let runtime = tokio::runtime::Runtime::new().expect("failed to start tokio runtime");
    let _guard = runtime.enter();

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Drill Designer",
        options,
        Box::new(|cc| Ok(Box::new(DrillApp::new(cc)))),
    )
}
