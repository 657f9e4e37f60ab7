//! Core data types for the drill diagram editor.
//!
//! This module defines the scene model: typed nodes, arrow paths, and the
//! `Scene` container that is the unit of undo/redo and persistence. All
//! mutators return a new `Scene` value rather than editing in place, which
//! makes whole-scene history snapshots correct by construction.

use crate::constants::{BALL_LIMIT, CANVAS_HEIGHT, CANVAS_WIDTH, DUPLICATE_OFFSET};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier shared by nodes and paths.
///
/// Selection treats nodes and paths interchangeably by id, so both draw
/// from this single id space.
pub type SceneId = Uuid;

/// The kind of a placeable scene element.
///
/// Unknown kinds encountered in persisted scenes are preserved opaquely in
/// [`NodeKind::Other`] so files written by newer versions degrade gracefully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    /// A coach figure
    Coach,
    /// A player figure
    Player,
    /// A target marker (auto-numbered at creation)
    Target,
    /// A rectangular target zone (auto-numbered at creation)
    TargetBox,
    /// A target line segment
    TargetLine,
    /// A tennis ball (auto-numbered while two or more exist)
    Ball,
    /// A free-standing text label
    Text,
    /// A training cone
    Cone,
    /// A ball feeder machine
    Feeder,
    /// An agility ladder
    Ladder,
    /// Any kind this version does not know about, kept verbatim
    #[serde(untagged)]
    Other(String),
}

impl NodeKind {
    /// Returns true if the placement tool stays armed after placing this kind.
    pub fn sticky_placement(&self) -> bool {
        matches!(self, NodeKind::Ball | NodeKind::Cone)
    }

    /// Returns true for the target kinds that share the running creation count.
    pub fn counts_as_target(&self) -> bool {
        matches!(self, NodeKind::Target | NodeKind::TargetBox)
    }

    /// Human-readable name for toolbars and labels.
    pub fn display_name(&self) -> &str {
        match self {
            NodeKind::Coach => "Coach",
            NodeKind::Player => "Player",
            NodeKind::Target => "Target",
            NodeKind::TargetBox => "Target Box",
            NodeKind::TargetLine => "Target Line",
            NodeKind::Ball => "Ball",
            NodeKind::Text => "Text",
            NodeKind::Cone => "Cone",
            NodeKind::Feeder => "Feeder",
            NodeKind::Ladder => "Ladder",
            NodeKind::Other(name) => name.as_str(),
        }
    }
}

/// A single placeable diagram element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier, stable for the node's lifetime
    pub id: SceneId,
    /// What this node represents on the court
    pub kind: NodeKind,
    /// Horizontal position in scene coordinates
    pub x: f32,
    /// Vertical position in scene coordinates
    pub y: f32,
    /// Rotation in degrees
    #[serde(default)]
    pub rotation: f32,
    /// Short text shown with the node (auto-assigned for balls/targets)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Color override as a hex string; absent means "use the kind default"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Size override in scene units; absent means "use the kind default"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f32>,
}

impl Node {
    /// Creates a new node of the given kind at the given position.
    pub fn new(kind: NodeKind, x: f32, y: f32) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            x,
            y,
            rotation: 0.0,
            label: None,
            color: None,
            size: None,
        }
    }
}

/// Whether a path is a polyline or a quadratic curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathType {
    /// A true polyline of two or more points
    Linear,
    /// Exactly three points interpreted as `[start, control, end]`
    Curve,
}

/// Stroke style of a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    /// Continuous stroke
    Solid,
    /// Dashed stroke
    Dashed,
    /// Dotted stroke
    Dotted,
}

/// Arrow head rendering of a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowHead {
    /// Solid triangle
    Filled,
    /// Triangle outline
    Outlined,
}

/// A single point of a path, in scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    /// Horizontal position
    pub x: f32,
    /// Vertical position
    pub y: f32,
}

impl PathPoint {
    /// Convenience constructor.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

fn default_path_width() -> f32 {
    3.0
}

fn default_line_style() -> LineStyle {
    LineStyle::Solid
}

fn default_arrow_head() -> ArrowHead {
    ArrowHead::Filled
}

/// An arrow/connector drawn on the court.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Path {
    /// Unique identifier, drawn from the same id space as nodes
    pub id: SceneId,
    /// Polyline or quadratic curve
    pub path_type: PathType,
    /// Ordered points; `linear` needs at least two, `curve` exactly three
    #[serde(default)]
    pub points: Vec<PathPoint>,
    /// Stroke color override as a hex string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Stroke width in scene units
    #[serde(default = "default_path_width")]
    pub width: f32,
    /// Solid, dashed, or dotted stroke
    #[serde(default = "default_line_style")]
    pub line_style: LineStyle,
    /// Filled or outlined arrow head
    #[serde(default = "default_arrow_head")]
    pub arrow_head: ArrowHead,
}

/// Stroke options for newly created paths.
#[derive(Debug, Clone)]
pub struct PathStyle {
    /// Optional color override
    pub color: Option<String>,
    /// Stroke width
    pub width: f32,
    /// Line style
    pub line_style: LineStyle,
    /// Arrow head style
    pub arrow_head: ArrowHead,
}

impl Default for PathStyle {
    fn default() -> Self {
        Self {
            color: None,
            width: default_path_width(),
            line_style: LineStyle::Solid,
            arrow_head: ArrowHead::Filled,
        }
    }
}

/// A partial update to a node. `None` fields are left untouched; the nested
/// options for `label`/`color`/`size` allow clearing an override back to the
/// kind default.
#[derive(Debug, Clone, Default)]
pub struct NodePatch {
    /// New horizontal position
    pub x: Option<f32>,
    /// New vertical position
    pub y: Option<f32>,
    /// New rotation in degrees
    pub rotation: Option<f32>,
    /// New label, or `Some(None)` to clear it
    pub label: Option<Option<String>>,
    /// New color override, or `Some(None)` to clear it
    pub color: Option<Option<String>>,
    /// New size override, or `Some(None)` to clear it
    pub size: Option<Option<f32>>,
}

/// A partial update to a path's stroke properties.
#[derive(Debug, Clone, Default)]
pub struct PathPatch {
    /// New color override, or `Some(None)` to clear it
    pub color: Option<Option<String>>,
    /// New stroke width
    pub width: Option<f32>,
    /// New line style
    pub line_style: Option<LineStyle>,
    /// New arrow head style
    pub arrow_head: Option<ArrowHead>,
}

/// Bounds and optional snap step applied to placed or dragged coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    /// Canvas width in the current orientation
    pub width: f32,
    /// Canvas height in the current orientation
    pub height: f32,
    /// Snap step; `None` disables snapping
    pub step: Option<f32>,
}

impl Grid {
    /// Grid for the landscape orientation.
    pub fn landscape(step: Option<f32>) -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            step,
        }
    }

    /// Grid for the portrait orientation (canvas dimensions swapped).
    pub fn portrait(step: Option<f32>) -> Self {
        Self {
            width: CANVAS_HEIGHT,
            height: CANVAS_WIDTH,
            step,
        }
    }

    /// Clamps a coordinate pair to the canvas and, when a snap step is set,
    /// rounds it to the nearest multiple of that step.
    pub fn place(&self, x: f32, y: f32) -> (f32, f32) {
        let mut x = x.clamp(0.0, self.width);
        let mut y = y.clamp(0.0, self.height);
        if let Some(step) = self.step {
            if step > 0.0 {
                x = (x / step).round() * step;
                y = (y / step).round() * step;
            }
        }
        (x.clamp(0.0, self.width), y.clamp(0.0, self.height))
    }

    /// Clamps a coordinate pair to the canvas without snapping.
    pub fn clamp(&self, x: f32, y: f32) -> (f32, f32) {
        (x.clamp(0.0, self.width), y.clamp(0.0, self.height))
    }
}

/// The full diagram: the unit of undo/redo and persistence.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Scene {
    /// All placed nodes, in creation order
    #[serde(default)]
    pub nodes: Vec<Node>,
    /// All arrow paths
    #[serde(default)]
    pub paths: Vec<Path>,
}

impl Scene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializes the scene to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a scene from JSON, applying defaults for missing fields.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Number of ball nodes currently in the scene.
    pub fn ball_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n.kind, NodeKind::Ball))
            .count()
    }

    fn target_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.kind.counts_as_target()).count()
    }

    /// Returns true if any node or path carries the given id.
    pub fn contains(&self, id: SceneId) -> bool {
        self.nodes.iter().any(|n| n.id == id) || self.paths.iter().any(|p| p.id == id)
    }

    /// Looks up a node by id.
    pub fn node(&self, id: SceneId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Looks up a path by id.
    pub fn path(&self, id: SceneId) -> Option<&Path> {
        self.paths.iter().find(|p| p.id == id)
    }

    /// Adds a node of `kind` at the snapped/clamped position.
    ///
    /// Adding a ball past the ball cap is a no-op that returns the scene
    /// unchanged and no id. Ball labels are renumbered and target labels
    /// assigned here, never by callers.
    pub fn add_node(&self, kind: NodeKind, x: f32, y: f32, grid: &Grid) -> (Scene, Option<SceneId>) {
        let is_ball = matches!(kind, NodeKind::Ball);
        if is_ball && self.ball_count() >= BALL_LIMIT {
            return (self.clone(), None);
        }

        let (x, y) = grid.place(x, y);
        let mut node = Node::new(kind, x, y);
        if node.kind.counts_as_target() {
            node.label = Some((self.target_count() + 1).to_string());
        }

        let id = node.id;
        let mut next = self.clone();
        next.nodes.push(node);
        if is_ball {
            renumber_balls(&mut next.nodes);
        }
        (next, Some(id))
    }

    /// Removes every node and path whose id appears in `ids`, renumbering
    /// ball labels if the ball count changed.
    pub fn remove(&self, ids: &[SceneId]) -> Scene {
        let mut next = self.clone();
        let balls_before = next.ball_count();
        next.nodes.retain(|n| !ids.contains(&n.id));
        next.paths.retain(|p| !ids.contains(&p.id));
        if next.ball_count() != balls_before {
            renumber_balls(&mut next.nodes);
        }
        next
    }

    /// Applies a patch to the node with the given id. Unknown ids leave the
    /// scene unchanged.
    pub fn update_node(&self, id: SceneId, patch: &NodePatch) -> Scene {
        let mut next = self.clone();
        if let Some(node) = next.nodes.iter_mut().find(|n| n.id == id) {
            if let Some(x) = patch.x {
                node.x = x;
            }
            if let Some(y) = patch.y {
                node.y = y;
            }
            if let Some(rotation) = patch.rotation {
                node.rotation = rotation;
            }
            if let Some(label) = &patch.label {
                node.label = label.clone();
            }
            if let Some(color) = &patch.color {
                node.color = color.clone();
            }
            if let Some(size) = patch.size {
                node.size = size;
            }
        }
        next
    }

    /// Adds a path of the given type and stroke style.
    ///
    /// Returns the scene unchanged and no id if the point count violates the
    /// path invariant (`linear` ⇒ at least two points, `curve` ⇒ exactly
    /// three).
    pub fn add_path(
        &self,
        path_type: PathType,
        points: Vec<PathPoint>,
        style: PathStyle,
    ) -> (Scene, Option<SceneId>) {
        let valid = match path_type {
            PathType::Linear => points.len() >= 2,
            PathType::Curve => points.len() == 3,
        };
        if !valid {
            return (self.clone(), None);
        }

        let path = Path {
            id: Uuid::new_v4(),
            path_type,
            points,
            color: style.color,
            width: style.width,
            line_style: style.line_style,
            arrow_head: style.arrow_head,
        };
        let id = path.id;
        let mut next = self.clone();
        next.paths.push(path);
        (next, Some(id))
    }

    /// Applies a stroke patch to the path with the given id.
    pub fn update_path(&self, id: SceneId, patch: &PathPatch) -> Scene {
        let mut next = self.clone();
        if let Some(path) = next.paths.iter_mut().find(|p| p.id == id) {
            if let Some(color) = &patch.color {
                path.color = color.clone();
            }
            if let Some(width) = patch.width {
                path.width = width;
            }
            if let Some(line_style) = patch.line_style {
                path.line_style = line_style;
            }
            if let Some(arrow_head) = patch.arrow_head {
                path.arrow_head = arrow_head;
            }
        }
        next
    }

    /// Rewrites a single point of a path, snapped and clamped.
    pub fn with_path_point(
        &self,
        id: SceneId,
        index: usize,
        x: f32,
        y: f32,
        grid: &Grid,
    ) -> Scene {
        let mut next = self.clone();
        if let Some(path) = next.paths.iter_mut().find(|p| p.id == id) {
            if let Some(point) = path.points.get_mut(index) {
                let (x, y) = grid.place(x, y);
                *point = PathPoint::new(x, y);
            }
        }
        next
    }

    /// Copies the selected nodes and paths, offsetting every coordinate by
    /// `(+DUPLICATE_OFFSET, +DUPLICATE_OFFSET)` and assigning fresh ids.
    ///
    /// Duplicating a path copies its points with the same offset; duplicating
    /// a node never drags unrelated paths along. Ball copies respect the ball
    /// cap like any other add.
    pub fn duplicate(&self, ids: &[SceneId], grid: &Grid) -> (Scene, Vec<SceneId>) {
        let mut next = self.clone();
        let mut new_ids = Vec::new();
        let mut balls = next.ball_count();
        let mut balls_changed = false;

        for node in &self.nodes {
            if !ids.contains(&node.id) {
                continue;
            }
            if matches!(node.kind, NodeKind::Ball) {
                if balls >= BALL_LIMIT {
                    continue;
                }
                balls += 1;
                balls_changed = true;
            }
            let mut copy = node.clone();
            copy.id = Uuid::new_v4();
            let (x, y) = grid.clamp(node.x + DUPLICATE_OFFSET, node.y + DUPLICATE_OFFSET);
            copy.x = x;
            copy.y = y;
            new_ids.push(copy.id);
            next.nodes.push(copy);
        }

        for path in &self.paths {
            if !ids.contains(&path.id) {
                continue;
            }
            let mut copy = path.clone();
            copy.id = Uuid::new_v4();
            for point in &mut copy.points {
                let (x, y) = grid.clamp(point.x + DUPLICATE_OFFSET, point.y + DUPLICATE_OFFSET);
                *point = PathPoint::new(x, y);
            }
            new_ids.push(copy.id);
            next.paths.push(copy);
        }

        if balls_changed {
            renumber_balls(&mut next.nodes);
        }
        (next, new_ids)
    }

    /// Translates the selected nodes and paths by `(dx, dy)`, snapping and
    /// clamping every resulting coordinate.
    ///
    /// Intended to be applied against a start-of-gesture snapshot with the
    /// accumulated pointer delta, so repeated moves stay numerically stable.
    pub fn translated(&self, ids: &[SceneId], dx: f32, dy: f32, grid: &Grid) -> Scene {
        let mut next = self.clone();
        for node in &mut next.nodes {
            if ids.contains(&node.id) {
                let (x, y) = grid.place(node.x + dx, node.y + dy);
                node.x = x;
                node.y = y;
            }
        }
        for path in &mut next.paths {
            if ids.contains(&path.id) {
                for point in &mut path.points {
                    let (x, y) = grid.place(point.x + dx, point.y + dy);
                    *point = PathPoint::new(x, y);
                }
            }
        }
        next
    }

    /// The landscape↔portrait pivot: every `(x, y)` becomes `(y, x)`.
    ///
    /// Applying it twice is the identity. No clamping is applied; the logical
    /// canvas swaps its dimensions along with the orientation.
    pub fn flipped(&self) -> Scene {
        let mut next = self.clone();
        for node in &mut next.nodes {
            std::mem::swap(&mut node.x, &mut node.y);
        }
        for path in &mut next.paths {
            for point in &mut path.points {
                *point = PathPoint::new(point.y, point.x);
            }
        }
        next
    }
}

/// Keeps ball labels a dense `"1".."N"` sequence in node order; a lone ball
/// is left unlabeled.
fn renumber_balls(nodes: &mut [Node]) {
    let total = nodes
        .iter()
        .filter(|n| matches!(n.kind, NodeKind::Ball))
        .count();
    let mut counter = 0;
    for node in nodes.iter_mut() {
        if !matches!(node.kind, NodeKind::Ball) {
            continue;
        }
        counter += 1;
        node.label = if total <= 1 {
            None
        } else {
            Some(counter.to_string())
        };
    }
}
