//! Canvas interaction: coordinate transforms, hit-testing, and the pointer
//! gesture state machine.
//!
//! The gesture handlers (`pointer_pressed`, `pointer_moved`,
//! `pointer_released`) work entirely in scene coordinates so they can be
//! driven headlessly from tests; `draw_canvas` is the thin egui layer that
//! translates pointer input and hands the painter to the rendering module.

use super::rendering;
use super::state::{DrillApp, EditorState};
use crate::constants::{
    CLICK_THRESHOLD, HANDLE_HIT_RADIUS, NODE_HIT_RADIUS, PATH_HIT_DISTANCE,
};
use crate::geometry::distance_to_path;
use crate::types::{PathPoint, PathStyle, PathType, Scene, SceneId};
use eframe::egui;

/// Minimum and maximum zoom levels.
const ZOOM_RANGE: (f32, f32) = (0.25, 5.0);
/// Margin in screen pixels kept around the court when fitting.
const FIT_MARGIN: f32 = 40.0;

/// Mapping between scene coordinates and screen pixels.
#[derive(Clone, Copy)]
pub struct CanvasTransform {
    /// Top-left of the canvas widget in screen space
    pub origin: egui::Pos2,
    /// Pan offset in screen pixels
    pub offset: egui::Vec2,
    /// Screen pixels per scene unit
    pub zoom: f32,
}

impl CanvasTransform {
    /// Converts a scene point to screen space.
    pub fn to_screen(&self, p: PathPoint) -> egui::Pos2 {
        self.origin + self.offset + egui::vec2(p.x, p.y) * self.zoom
    }

    /// Converts a screen position to scene coordinates.
    pub fn to_scene(&self, pos: egui::Pos2) -> PathPoint {
        let v = (pos - self.origin - self.offset) / self.zoom;
        PathPoint::new(v.x, v.y)
    }

    /// Scales a scene-space length to screen pixels.
    pub fn scale(&self, len: f32) -> f32 {
        len * self.zoom
    }
}

/// What the pointer landed on, in priority order.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Hit {
    /// An endpoint/control handle of a selected path
    Handle { path_id: SceneId, index: usize },
    /// A node or path body
    Element(SceneId),
}

/// Finds what a press at `pos` should act on.
///
/// Handles of selected paths win over everything (they sit on top visually),
/// then nodes from topmost down, then path strokes.
fn hit_test(scene: &Scene, selection: &[SceneId], pos: PathPoint) -> Option<Hit> {
    for id in selection {
        let Some(path) = scene.path(*id) else { continue };
        for (index, point) in path.points.iter().enumerate() {
            let d = ((point.x - pos.x).powi(2) + (point.y - pos.y).powi(2)).sqrt();
            if d <= HANDLE_HIT_RADIUS {
                return Some(Hit::Handle {
                    path_id: *id,
                    index,
                });
            }
        }
    }

    for node in scene.nodes.iter().rev() {
        let radius = node.size.map(|s| s * 0.5).unwrap_or(NODE_HIT_RADIUS);
        let d = ((node.x - pos.x).powi(2) + (node.y - pos.y).powi(2)).sqrt();
        if d <= radius {
            return Some(Hit::Element(node.id));
        }
    }

    for path in scene.paths.iter().rev() {
        if distance_to_path(path, pos.x, pos.y) <= PATH_HIT_DISTANCE {
            return Some(Hit::Element(path.id));
        }
    }

    None
}

impl DrillApp {
    /// Handles a primary-button press at `pos` in scene coordinates.
    ///
    /// `additive` is true when a shift/cmd modifier is held.
    pub fn pointer_pressed(&mut self, pos: PathPoint, additive: bool, now: f64) {
        let state = std::mem::take(&mut self.interaction.state);
        match state {
            EditorState::Idle => self.press_idle(pos, additive),
            EditorState::Placing(kind) => {
                let previous = self.scene.clone();
                let (next, id) = self.scene.add_node(kind.clone(), pos.x, pos.y, &self.grid());
                if let Some(id) = id {
                    self.scene = next;
                    self.interaction.selection = vec![id];
                    self.commit_scene(previous, now);
                }
                self.interaction.state = if kind.sticky_placement() {
                    EditorState::Placing(kind)
                } else {
                    EditorState::Idle
                };
            }
            EditorState::DrawingLinear { mut points } => {
                let (x, y) = self.grid().place(pos.x, pos.y);
                points.push(PathPoint::new(x, y));
                if self.interaction.quick_segments && points.len() == 2 {
                    self.interaction.state = EditorState::DrawingLinear { points };
                    self.finish_path_gesture(now);
                } else {
                    self.interaction.state = EditorState::DrawingLinear { points };
                }
            }
            EditorState::DrawingCurve { start, end } => {
                let (x, y) = self.grid().place(pos.x, pos.y);
                let clicked = PathPoint::new(x, y);
                self.interaction.state = match (start, end) {
                    (None, _) => EditorState::DrawingCurve {
                        start: Some(clicked),
                        end: None,
                    },
                    (Some(start), None) => EditorState::DrawingCurve {
                        start: Some(start),
                        end: Some(clicked),
                    },
                    (Some(start), Some(end)) => {
                        // Third click supplies the control point
                        let previous = self.scene.clone();
                        let (next, id) = self.scene.add_path(
                            PathType::Curve,
                            vec![start, clicked, end],
                            PathStyle::default(),
                        );
                        self.scene = next;
                        if let Some(id) = id {
                            self.interaction.selection = vec![id];
                            self.commit_scene(previous, now);
                        }
                        EditorState::DrawingCurve {
                            start: None,
                            end: None,
                        }
                    }
                };
            }
            // A press while a press-driven gesture is somehow still live:
            // treat the old gesture as lost before handling the new press.
            other @ (EditorState::Dragging { .. }
            | EditorState::EditingHandle { .. }
            | EditorState::Marquee { .. }) => {
                self.interaction.state = other;
                self.pointer_lost();
                self.pointer_pressed(pos, additive, now);
            }
        }
    }

    fn press_idle(&mut self, pos: PathPoint, additive: bool) {
        match hit_test(&self.scene, &self.interaction.selection, pos) {
            Some(Hit::Handle { path_id, index }) => {
                self.interaction.state = EditorState::EditingHandle {
                    path_id,
                    index,
                    snapshot: self.scene.clone(),
                };
            }
            Some(Hit::Element(id)) => {
                let selected = self.interaction.selection.contains(&id);
                if additive && selected {
                    self.interaction.selection.retain(|s| *s != id);
                    return;
                }
                if additive {
                    self.interaction.selection.push(id);
                } else if !selected {
                    self.interaction.selection = vec![id];
                }
                self.interaction.state = EditorState::Dragging {
                    start: pos,
                    snapshot: self.scene.clone(),
                    moved: false,
                    click_target: (!additive).then_some(id),
                };
            }
            None => {
                self.interaction.state = EditorState::Marquee {
                    origin: pos,
                    additive,
                };
                self.interaction.marquee_end = Some(pos);
            }
        }
    }

    /// Handles pointer movement to `pos` in scene coordinates.
    pub fn pointer_moved(&mut self, pos: PathPoint) {
        self.interaction.pointer = Some(pos);
        let state = std::mem::take(&mut self.interaction.state);
        match state {
            EditorState::Dragging {
                start,
                snapshot,
                moved,
                click_target,
            } => {
                let (dx, dy) = (pos.x - start.x, pos.y - start.y);
                let moved = moved || (dx * dx + dy * dy).sqrt() >= CLICK_THRESHOLD;
                if moved {
                    // Rebuild from the press-time snapshot each move so the
                    // whole drag is one transition with no accumulated error.
                    self.scene =
                        snapshot.translated(&self.interaction.selection, dx, dy, &self.grid());
                }
                self.interaction.state = EditorState::Dragging {
                    start,
                    snapshot,
                    moved,
                    click_target,
                };
            }
            EditorState::EditingHandle {
                path_id,
                index,
                snapshot,
            } => {
                self.scene = snapshot.with_path_point(path_id, index, pos.x, pos.y, &self.grid());
                self.interaction.state = EditorState::EditingHandle {
                    path_id,
                    index,
                    snapshot,
                };
            }
            EditorState::Marquee { origin, additive } => {
                self.interaction.marquee_end = Some(pos);
                self.interaction.state = EditorState::Marquee { origin, additive };
            }
            other => self.interaction.state = other,
        }
    }

    /// Handles a primary-button release at `pos` in scene coordinates.
    pub fn pointer_released(&mut self, pos: PathPoint, now: f64) {
        let state = std::mem::take(&mut self.interaction.state);
        match state {
            EditorState::Dragging {
                snapshot,
                moved,
                click_target,
                ..
            } => {
                if moved {
                    self.commit_scene(snapshot, now);
                } else if let Some(id) = click_target {
                    // A sub-threshold press/release was a plain click: the
                    // selection collapses to the clicked element.
                    self.interaction.selection = vec![id];
                }
            }
            EditorState::EditingHandle { snapshot, .. } => {
                if self.scene != snapshot {
                    self.commit_scene(snapshot, now);
                }
            }
            EditorState::Marquee { origin, additive } => {
                self.apply_marquee(origin, pos, additive);
                self.interaction.marquee_end = None;
            }
            other => self.interaction.state = other,
        }
    }

    fn apply_marquee(&mut self, origin: PathPoint, end: PathPoint, additive: bool) {
        let (min_x, max_x) = (origin.x.min(end.x), origin.x.max(end.x));
        let (min_y, max_y) = (origin.y.min(end.y), origin.y.max(end.y));

        // A sub-threshold marquee was a click on empty canvas: it clears the
        // selection even when the modifier is held.
        if max_x - min_x < CLICK_THRESHOLD && max_y - min_y < CLICK_THRESHOLD {
            self.interaction.selection.clear();
            return;
        }

        let inside = |p: &PathPoint| {
            p.x >= min_x && p.x <= max_x && p.y >= min_y && p.y <= max_y
        };
        let mut hits: Vec<SceneId> = self
            .scene
            .nodes
            .iter()
            .filter(|n| inside(&PathPoint::new(n.x, n.y)))
            .map(|n| n.id)
            .collect();
        // A path is caught as soon as any of its points falls inside
        hits.extend(
            self.scene
                .paths
                .iter()
                .filter(|p| p.points.iter().any(inside))
                .map(|p| p.id),
        );

        if additive {
            for id in hits {
                if !self.interaction.selection.contains(&id) {
                    self.interaction.selection.push(id);
                }
            }
        } else {
            self.interaction.selection = hits;
        }
    }

    /// Finalizes an in-progress polyline (right click, double click or
    /// Enter).
    ///
    /// A single pending point auto-closes to the current pointer position;
    /// with two or more points the polyline becomes a path and is selected.
    /// Anything shorter is discarded. The tool stays armed either way.
    pub fn finish_path_gesture(&mut self, now: f64) {
        if let EditorState::DrawingLinear { mut points } =
            std::mem::take(&mut self.interaction.state)
        {
            // A double click lands two presses on the same spot before it is
            // recognized; collapse the repeated point before finalizing.
            points.dedup();
            if points.len() == 1 {
                if let Some(p) = self.interaction.pointer {
                    let (x, y) = self.grid().place(p.x, p.y);
                    let end = PathPoint::new(x, y);
                    if end != points[0] {
                        points.push(end);
                    }
                }
            }
            if points.len() >= 2 {
                let previous = self.scene.clone();
                let (next, id) = self
                    .scene
                    .add_path(PathType::Linear, points, PathStyle::default());
                self.scene = next;
                if let Some(id) = id {
                    self.interaction.selection = vec![id];
                    self.commit_scene(previous, now);
                }
            }
            self.interaction.state = EditorState::DrawingLinear { points: Vec::new() };
        }
    }

    /// Escape: each state defines its own retreat.
    pub fn handle_escape(&mut self, now: f64) {
        match std::mem::take(&mut self.interaction.state) {
            EditorState::Idle => self.interaction.selection.clear(),
            EditorState::Placing(_) | EditorState::DrawingCurve { .. } => {}
            EditorState::DrawingLinear { points } => {
                // Escape finalizes a viable polyline instead of discarding it
                self.interaction.state = EditorState::DrawingLinear { points };
                self.finish_path_gesture(now);
                self.interaction.state = EditorState::Idle;
            }
            EditorState::Dragging { snapshot, .. }
            | EditorState::EditingHandle { snapshot, .. } => {
                self.scene = snapshot;
            }
            EditorState::Marquee { .. } => {
                self.interaction.marquee_end = None;
            }
        }
    }

    /// Recovers from losing the pointer mid-gesture (release off-window,
    /// focus loss). Press-driven gestures roll back to their snapshot.
    pub fn pointer_lost(&mut self) {
        match std::mem::take(&mut self.interaction.state) {
            EditorState::Dragging { snapshot, .. }
            | EditorState::EditingHandle { snapshot, .. } => {
                self.scene = snapshot;
            }
            EditorState::Marquee { .. } => {
                self.interaction.marquee_end = None;
            }
            other => self.interaction.state = other,
        }
    }
}

/// Fits the court into the viewport and centers it.
fn fit_to_view(app: &mut DrillApp, rect: egui::Rect) {
    let grid = app.grid();
    let zoom = ((rect.width() - FIT_MARGIN) / grid.width)
        .min((rect.height() - FIT_MARGIN) / grid.height)
        .clamp(ZOOM_RANGE.0, ZOOM_RANGE.1);
    app.canvas.zoom_factor = zoom;
    app.canvas.offset = egui::vec2(
        (rect.width() - grid.width * zoom) * 0.5,
        (rect.height() - grid.height * zoom) * 0.5,
    );
    app.canvas.needs_fit = false;
}

/// Handles canvas panning (middle-drag) and zooming about the cursor.
fn handle_pan_zoom(app: &mut DrillApp, ui: &egui::Ui, response: &egui::Response) {
    if response.dragged_by(egui::PointerButton::Middle) {
        app.canvas.offset += response.drag_delta();
    }

    if !response.hovered() {
        return;
    }
    let zoom_delta = ui.input(|i| i.zoom_delta());
    if zoom_delta != 1.0 {
        if let Some(hover) = response.hover_pos() {
            let old_zoom = app.canvas.zoom_factor;
            let new_zoom = (old_zoom * zoom_delta).clamp(ZOOM_RANGE.0, ZOOM_RANGE.1);
            // Keep the scene point under the cursor fixed while zooming
            let cursor = hover - response.rect.min - app.canvas.offset;
            app.canvas.offset += cursor - cursor * (new_zoom / old_zoom);
            app.canvas.zoom_factor = new_zoom;
        }
    }
    let scroll = ui.input(|i| i.raw_scroll_delta);
    if scroll != egui::Vec2::ZERO && ui.input(|i| !i.modifiers.command) {
        app.canvas.offset += scroll;
    }
}

/// Draws the canvas and routes pointer input into the gesture handlers.
pub fn draw_canvas(app: &mut DrillApp, ui: &mut egui::Ui, now: f64) {
    let (response, painter) =
        ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());

    if app.canvas.needs_fit {
        fit_to_view(app, response.rect);
    }
    handle_pan_zoom(app, ui, &response);

    let transform = CanvasTransform {
        origin: response.rect.min,
        offset: app.canvas.offset,
        zoom: app.canvas.zoom_factor,
    };

    let pointer_scene = response
        .hover_pos()
        .or_else(|| response.interact_pointer_pos())
        .map(|p| transform.to_scene(p));

    if let Some(pos) = pointer_scene {
        app.pointer_moved(pos);
    }

    let additive = ui.input(|i| i.modifiers.shift || i.modifiers.command);
    let pressed = response.hovered() && ui.input(|i| i.pointer.primary_pressed());
    let released = ui.input(|i| i.pointer.primary_released());

    if pressed {
        if let Some(pos) = pointer_scene {
            app.pointer_pressed(pos, additive, now);
        }
    }
    if released {
        match pointer_scene {
            Some(pos) => app.pointer_released(pos, now),
            None => app.pointer_lost(),
        }
    }
    let secondary = response.hovered() && ui.input(|i| i.pointer.secondary_pressed());
    if response.double_clicked() || secondary {
        app.finish_path_gesture(now);
    }

    rendering::draw_scene(app, &painter, &transform, now);

    if app.player.is_playing() {
        ui.ctx().request_repaint();
    }
}
