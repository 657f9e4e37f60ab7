//! Painting: the court, nodes, paths, previews, and selection chrome.
//!
//! Everything here is a pure function of the app state and the current
//! transform; playback repositions qualifying nodes at paint time without
//! touching their stored coordinates.

use super::canvas::CanvasTransform;
use super::state::{DrillApp, EditorState};
use crate::animation::playback_position;
use crate::geometry::bezier_point;
use crate::types::{ArrowHead, LineStyle, Node, NodeKind, Path, PathPoint, PathType};
use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Shape, Stroke, StrokeKind};

/// Segments used when flattening a curve for painting.
const CURVE_SEGMENTS: usize = 32;
/// Arrow head length in scene units.
const ARROW_SIZE: f32 = 12.0;
/// Default node glyph radius in scene units.
const NODE_RADIUS: f32 = 14.0;

/// Parses a `#rrggbb` hex string; anything else falls back to `fallback`.
fn parse_color(hex: Option<&str>, fallback: Color32) -> Color32 {
    let Some(hex) = hex else { return fallback };
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return fallback;
    }
    match (
        u8::from_str_radix(&hex[0..2], 16),
        u8::from_str_radix(&hex[2..4], 16),
        u8::from_str_radix(&hex[4..6], 16),
    ) {
        (Ok(r), Ok(g), Ok(b)) => Color32::from_rgb(r, g, b),
        _ => fallback,
    }
}

fn kind_color(kind: &NodeKind) -> Color32 {
    match kind {
        NodeKind::Coach => Color32::from_rgb(52, 120, 246),
        NodeKind::Player => Color32::from_rgb(46, 160, 67),
        NodeKind::Target | NodeKind::TargetBox | NodeKind::TargetLine => {
            Color32::from_rgb(218, 54, 51)
        }
        NodeKind::Ball => Color32::from_rgb(210, 210, 60),
        NodeKind::Text => Color32::from_rgb(160, 160, 160),
        NodeKind::Cone => Color32::from_rgb(235, 140, 50),
        NodeKind::Feeder => Color32::from_rgb(130, 90, 200),
        NodeKind::Ladder => Color32::from_rgb(110, 110, 110),
        NodeKind::Other(_) => Color32::from_rgb(120, 120, 120),
    }
}

/// Paints the whole canvas for one frame.
pub fn draw_scene(
    app: &DrillApp,
    painter: &egui::Painter,
    transform: &CanvasTransform,
    now: f64,
) {
    draw_court(app, painter, transform);

    let playing = app.player.is_playing();
    let t = app.player.progress(now);

    for path in &app.scene.paths {
        let selected = app.interaction.selection.contains(&path.id);
        draw_path(painter, transform, path, selected, app.dark_mode);
    }
    for id in &app.interaction.selection {
        if let Some(path) = app.scene.path(*id) {
            draw_handles(painter, transform, path);
        }
    }

    for node in &app.scene.nodes {
        let pos = if playing {
            playback_position(node, &app.scene.paths, t)
                .unwrap_or(PathPoint::new(node.x, node.y))
        } else {
            PathPoint::new(node.x, node.y)
        };
        let selected = !playing && app.interaction.selection.contains(&node.id);
        draw_node(painter, transform, node, pos, selected);
    }

    if !playing {
        draw_previews(app, painter, transform);
        draw_marquee(app, painter, transform);
    }
}

fn draw_court(app: &DrillApp, painter: &egui::Painter, transform: &CanvasTransform) {
    let grid = app.grid();
    let min = transform.to_screen(PathPoint::new(0.0, 0.0));
    let max = transform.to_screen(PathPoint::new(grid.width, grid.height));
    let court = Rect::from_min_max(min, max);

    let surface = if app.dark_mode {
        Color32::from_rgb(30, 70, 50)
    } else {
        Color32::from_rgb(70, 130, 95)
    };
    let line = Stroke::new(transform.scale(2.0).max(1.0), Color32::from_gray(235));

    painter.rect_filled(court, 2.0, surface);
    painter.rect_stroke(court, 2.0, line, StrokeKind::Inside);

    let h = |y: f32| {
        painter.line_segment(
            [
                transform.to_screen(PathPoint::new(0.0, y)),
                transform.to_screen(PathPoint::new(grid.width, y)),
            ],
            line,
        )
    };
    let v = |x: f32| {
        painter.line_segment(
            [
                transform.to_screen(PathPoint::new(x, 0.0)),
                transform.to_screen(PathPoint::new(x, grid.height)),
            ],
            line,
        )
    };

    // Net across the middle, service lines at the quarter marks, center
    // service line between them. Drawn from the grid dimensions so the
    // markings pivot with the orientation.
    if grid.width >= grid.height {
        v(grid.width * 0.5);
        v(grid.width * 0.25);
        v(grid.width * 0.75);
        painter.line_segment(
            [
                transform.to_screen(PathPoint::new(grid.width * 0.25, grid.height * 0.5)),
                transform.to_screen(PathPoint::new(grid.width * 0.75, grid.height * 0.5)),
            ],
            line,
        );
        h(grid.height * 0.12);
        h(grid.height * 0.88);
    } else {
        h(grid.height * 0.5);
        h(grid.height * 0.25);
        h(grid.height * 0.75);
        painter.line_segment(
            [
                transform.to_screen(PathPoint::new(grid.width * 0.5, grid.height * 0.25)),
                transform.to_screen(PathPoint::new(grid.width * 0.5, grid.height * 0.75)),
            ],
            line,
        );
        v(grid.width * 0.12);
        v(grid.width * 0.88);
    }
}

/// Flattens a path to screen points for stroking.
fn flatten(path: &Path, transform: &CanvasTransform) -> Vec<Pos2> {
    match path.path_type {
        PathType::Curve if path.points.len() == 3 => (0..=CURVE_SEGMENTS)
            .map(|i| {
                let t = i as f32 / CURVE_SEGMENTS as f32;
                transform.to_screen(bezier_point(
                    t,
                    path.points[0],
                    path.points[1],
                    path.points[2],
                ))
            })
            .collect(),
        _ => path
            .points
            .iter()
            .map(|p| transform.to_screen(*p))
            .collect(),
    }
}

fn stroke_polyline(
    painter: &egui::Painter,
    points: &[Pos2],
    stroke: Stroke,
    style: LineStyle,
) {
    if points.len() < 2 {
        return;
    }
    match style {
        LineStyle::Solid => painter.add(Shape::line(points.to_vec(), stroke)),
        LineStyle::Dashed => painter.add(Shape::Vec(Shape::dashed_line(
            points,
            stroke,
            stroke.width * 4.0,
            stroke.width * 3.0,
        ))),
        LineStyle::Dotted => painter.add(Shape::Vec(Shape::dashed_line(
            points,
            stroke,
            stroke.width,
            stroke.width * 2.0,
        ))),
    };
}

fn draw_path(
    painter: &egui::Painter,
    transform: &CanvasTransform,
    path: &Path,
    selected: bool,
    dark_mode: bool,
) {
    let fallback = if dark_mode {
        Color32::from_gray(230)
    } else {
        Color32::from_gray(25)
    };
    let color = parse_color(path.color.as_deref(), fallback);
    let width = transform.scale(path.width).max(1.0);
    let points = flatten(path, transform);

    if selected {
        let halo = Stroke::new(width + transform.scale(5.0), Color32::from_rgb(70, 140, 255).gamma_multiply(0.4));
        stroke_polyline(painter, &points, halo, LineStyle::Solid);
    }
    stroke_polyline(painter, &points, Stroke::new(width, color), path.line_style);
    draw_arrow_head(painter, transform, &points, color, path.arrow_head, width);
}

fn draw_arrow_head(
    painter: &egui::Painter,
    transform: &CanvasTransform,
    points: &[Pos2],
    color: Color32,
    head: ArrowHead,
    width: f32,
) {
    let Some((&tip, rest)) = points.split_last() else {
        return;
    };
    // Direction from the last sampled point with any length to the tip
    let Some(&back) = rest.iter().rev().find(|p| (**p - tip).length() > 0.1) else {
        return;
    };
    let dir = (tip - back).normalized();
    let normal = egui::vec2(-dir.y, dir.x);
    let size = transform.scale(ARROW_SIZE).max(6.0);
    let base = tip - dir * size;
    let left = base + normal * size * 0.5;
    let right = base - normal * size * 0.5;

    match head {
        ArrowHead::Filled => {
            painter.add(Shape::convex_polygon(
                vec![tip, left, right],
                color,
                Stroke::NONE,
            ));
        }
        ArrowHead::Outlined => {
            painter.add(Shape::closed_line(
                vec![tip, left, right],
                Stroke::new(width.max(1.5), color),
            ));
        }
    }
}

fn draw_handles(painter: &egui::Painter, transform: &CanvasTransform, path: &Path) {
    let radius = transform.scale(5.0).max(3.0);
    for (index, point) in path.points.iter().enumerate() {
        let center = transform.to_screen(*point);
        // The control point of a curve renders hollow
        let is_control = path.path_type == PathType::Curve && index == 1;
        if is_control {
            painter.circle_stroke(center, radius, Stroke::new(1.5, Color32::from_rgb(70, 140, 255)));
        } else {
            painter.circle_filled(center, radius, Color32::from_rgb(70, 140, 255));
        }
    }
}

fn draw_node(
    painter: &egui::Painter,
    transform: &CanvasTransform,
    node: &Node,
    pos: PathPoint,
    selected: bool,
) {
    let center = transform.to_screen(pos);
    let radius = transform.scale(node.size.map(|s| s * 0.5).unwrap_or(NODE_RADIUS));
    let color = parse_color(node.color.as_deref(), kind_color(&node.kind));
    let font = FontId::proportional((radius * 0.9).max(9.0));
    let label_font = FontId::proportional((radius * 0.8).max(8.0));

    if selected {
        painter.circle_stroke(
            center,
            radius + transform.scale(4.0),
            Stroke::new(2.0, Color32::from_rgb(70, 140, 255)),
        );
    }

    match &node.kind {
        NodeKind::Coach => {
            painter.circle_filled(center, radius, color);
            painter.text(center, Align2::CENTER_CENTER, "C", font, Color32::WHITE);
        }
        NodeKind::Player => {
            painter.circle_filled(center, radius, color);
            painter.text(center, Align2::CENTER_CENTER, "P", font, Color32::WHITE);
        }
        NodeKind::Target => {
            painter.circle_stroke(center, radius, Stroke::new(2.0, color));
            painter.circle_stroke(center, radius * 0.55, Stroke::new(2.0, color));
            if let Some(label) = &node.label {
                painter.text(center, Align2::CENTER_CENTER, label, label_font.clone(), color);
            }
        }
        NodeKind::TargetBox => {
            let rect = Rect::from_center_size(center, egui::vec2(radius * 2.4, radius * 2.4));
            painter.rect_stroke(rect, 2.0, Stroke::new(2.0, color), StrokeKind::Middle);
            if let Some(label) = &node.label {
                painter.text(center, Align2::CENTER_CENTER, label, label_font.clone(), color);
            }
        }
        NodeKind::TargetLine => {
            let angle = node.rotation.to_radians();
            let half = egui::vec2(angle.cos(), angle.sin()) * radius * 1.8;
            painter.line_segment([center - half, center + half], Stroke::new(3.0, color));
        }
        NodeKind::Ball => {
            painter.circle_filled(center, radius * 0.6, color);
            if let Some(label) = &node.label {
                painter.text(
                    center + egui::vec2(0.0, -radius * 1.2),
                    Align2::CENTER_CENTER,
                    label,
                    label_font.clone(),
                    color,
                );
            }
        }
        NodeKind::Text => {
            let text = node.label.as_deref().unwrap_or("Text");
            painter.text(center, Align2::CENTER_CENTER, text, font, color);
        }
        NodeKind::Cone => {
            let top = center + egui::vec2(0.0, -radius);
            let left = center + egui::vec2(-radius * 0.8, radius * 0.7);
            let right = center + egui::vec2(radius * 0.8, radius * 0.7);
            painter.add(Shape::convex_polygon(
                vec![top, right, left],
                color,
                Stroke::NONE,
            ));
        }
        NodeKind::Feeder => {
            let rect = Rect::from_center_size(center, egui::vec2(radius * 2.0, radius * 1.4));
            painter.rect_filled(rect, 3.0, color);
            painter.text(center, Align2::CENTER_CENTER, "F", label_font.clone(), Color32::WHITE);
        }
        NodeKind::Ladder => {
            let rect = Rect::from_center_size(center, egui::vec2(radius * 1.2, radius * 3.0));
            let stroke = Stroke::new(2.0, color);
            painter.rect_stroke(rect, 0.0, stroke, StrokeKind::Middle);
            for i in 1..4 {
                let y = rect.top() + rect.height() * i as f32 / 4.0;
                painter.line_segment(
                    [Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)],
                    stroke,
                );
            }
        }
        NodeKind::Other(name) => {
            painter.circle_stroke(center, radius, Stroke::new(2.0, color));
            let initial = name.chars().next().map(|c| c.to_string());
            painter.text(
                center,
                Align2::CENTER_CENTER,
                initial.as_deref().unwrap_or("?"),
                font,
                color,
            );
        }
    }

    // Generic label below the glyph, for kinds that don't place it themselves
    if let Some(label) = &node.label {
        if matches!(
            node.kind,
            NodeKind::Coach | NodeKind::Player | NodeKind::Cone | NodeKind::Feeder
        ) {
            painter.text(
                center + egui::vec2(0.0, radius * 1.6),
                Align2::CENTER_CENTER,
                label,
                label_font,
                color,
            );
        }
    }
}

/// Draws the in-progress drawing previews for the current tool state.
fn draw_previews(app: &DrillApp, painter: &egui::Painter, transform: &CanvasTransform) {
    let preview = Stroke::new(2.0, Color32::from_rgb(70, 140, 255).gamma_multiply(0.8));
    let pointer = app.interaction.pointer;

    match &app.interaction.state {
        EditorState::DrawingLinear { points } if !points.is_empty() => {
            let mut screen: Vec<Pos2> = points.iter().map(|p| transform.to_screen(*p)).collect();
            if let Some(pos) = pointer {
                let (x, y) = app.grid().place(pos.x, pos.y);
                screen.push(transform.to_screen(PathPoint::new(x, y)));
            }
            painter.add(Shape::line(screen.clone(), preview));
            for p in &screen {
                painter.circle_filled(*p, 3.0, preview.color);
            }
        }
        EditorState::DrawingCurve {
            start: Some(start),
            end,
        } => match (end, pointer) {
            // Between the second and third clicks the preview bends through
            // the pointer as the provisional control point.
            (Some(end), Some(pos)) => {
                let pts: Vec<Pos2> = (0..=CURVE_SEGMENTS)
                    .map(|i| {
                        let t = i as f32 / CURVE_SEGMENTS as f32;
                        transform.to_screen(bezier_point(t, *start, pos, *end))
                    })
                    .collect();
                painter.add(Shape::line(pts, preview));
            }
            (Some(end), None) => {
                painter.line_segment(
                    [transform.to_screen(*start), transform.to_screen(*end)],
                    preview,
                );
            }
            (None, Some(pos)) => {
                painter.line_segment(
                    [transform.to_screen(*start), transform.to_screen(pos)],
                    preview,
                );
            }
            (None, None) => {
                painter.circle_filled(transform.to_screen(*start), 3.0, preview.color);
            }
        },
        EditorState::Placing(kind) => {
            if let Some(pos) = pointer {
                // Sketch the pending placement faintly at the snapped spot
                let (x, y) = app.grid().place(pos.x, pos.y);
                painter.circle_stroke(
                    transform.to_screen(PathPoint::new(x, y)),
                    transform.scale(NODE_RADIUS),
                    Stroke::new(1.5, kind_color(kind).gamma_multiply(0.6)),
                );
            }
        }
        _ => {}
    }
}

fn draw_marquee(app: &DrillApp, painter: &egui::Painter, transform: &CanvasTransform) {
    let EditorState::Marquee { origin, .. } = &app.interaction.state else {
        return;
    };
    let Some(end) = app.interaction.marquee_end else {
        return;
    };
    let rect = Rect::from_two_pos(transform.to_screen(*origin), transform.to_screen(end));
    painter.rect_filled(rect, 0.0, Color32::from_rgb(70, 140, 255).gamma_multiply(0.15));
    painter.rect_stroke(
        rect,
        0.0,
        Stroke::new(1.0, Color32::from_rgb(70, 140, 255)),
        StrokeKind::Middle,
    );
}
