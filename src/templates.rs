//! Built-in drill templates that can be applied from the toolbar.
//!
//! Templates are complete scenes built programmatically; applying one goes
//! through the same wholesale-replace path as an external drill switch, so
//! it lands as a single history entry.

use crate::types::{Grid, LineStyle, NodeKind, PathPoint, PathStyle, PathType, Scene};

/// Kinds of built-in drill templates available from the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    /// Two players rallying cross-court into corner targets
    CrossCourtRally,
    /// Coach feeding balls to a player moving along the baseline
    BaselineFeed,
    /// Approach-and-volley pattern with cones marking the approach lane
    ApproachVolley,
}

/// Metadata for a single template.
pub struct TemplateInfo {
    /// Stable identifier for the template
    pub kind: TemplateKind,
    /// Human-friendly display name
    pub name: &'static str,
}

/// Returns all templates with their display names.
pub const fn all_templates() -> &'static [TemplateInfo] {
    const TEMPLATES: &[TemplateInfo] = &[
        TemplateInfo {
            kind: TemplateKind::CrossCourtRally,
            name: "Cross-Court Rally",
        },
        TemplateInfo {
            kind: TemplateKind::BaselineFeed,
            name: "Baseline Feed",
        },
        TemplateInfo {
            kind: TemplateKind::ApproachVolley,
            name: "Approach & Volley",
        },
    ];
    TEMPLATES
}

/// Builds the scene for the given template kind.
pub fn build_template(kind: TemplateKind) -> Scene {
    match kind {
        TemplateKind::CrossCourtRally => build_cross_court_rally(),
        TemplateKind::BaselineFeed => build_baseline_feed(),
        TemplateKind::ApproachVolley => build_approach_volley(),
    }
}

fn grid() -> Grid {
    Grid::landscape(None)
}

fn build_cross_court_rally() -> Scene {
    let mut scene = Scene::new();

    scene = scene.add_node(NodeKind::Player, 160.0, 460.0, &grid()).0;
    scene = scene.add_node(NodeKind::Player, 1040.0, 140.0, &grid()).0;
    scene = scene.add_node(NodeKind::Target, 1060.0, 460.0, &grid()).0;
    scene = scene.add_node(NodeKind::Target, 140.0, 140.0, &grid()).0;

    // Shot arcs over the net into the opposite corner targets
    scene = scene
        .add_path(
            PathType::Curve,
            vec![
                PathPoint::new(160.0, 460.0),
                PathPoint::new(600.0, 220.0),
                PathPoint::new(1060.0, 460.0),
            ],
            PathStyle::default(),
        )
        .0;
    scene = scene
        .add_path(
            PathType::Curve,
            vec![
                PathPoint::new(1040.0, 140.0),
                PathPoint::new(600.0, 380.0),
                PathPoint::new(140.0, 140.0),
            ],
            PathStyle::default(),
        )
        .0;

    scene
}

fn build_baseline_feed() -> Scene {
    let mut scene = Scene::new();

    scene = scene.add_node(NodeKind::Coach, 900.0, 300.0, &grid()).0;
    scene = scene.add_node(NodeKind::Feeder, 940.0, 360.0, &grid()).0;
    scene = scene.add_node(NodeKind::Player, 300.0, 480.0, &grid()).0;
    for i in 0..3 {
        scene = scene
            .add_node(NodeKind::Ball, 880.0 + 20.0 * i as f32, 320.0, &grid())
            .0;
    }

    // Player shuttles along the baseline between feeds
    scene = scene
        .add_path(
            PathType::Linear,
            vec![
                PathPoint::new(300.0, 480.0),
                PathPoint::new(160.0, 480.0),
                PathPoint::new(440.0, 480.0),
            ],
            PathStyle {
                line_style: LineStyle::Dashed,
                ..Default::default()
            },
        )
        .0;

    scene
}

fn build_approach_volley() -> Scene {
    let mut scene = Scene::new();

    scene = scene.add_node(NodeKind::Player, 200.0, 300.0, &grid()).0;
    scene = scene.add_node(NodeKind::Coach, 1000.0, 300.0, &grid()).0;
    scene = scene.add_node(NodeKind::Cone, 400.0, 260.0, &grid()).0;
    scene = scene.add_node(NodeKind::Cone, 480.0, 300.0, &grid()).0;
    scene = scene.add_node(NodeKind::Cone, 400.0, 340.0, &grid()).0;
    scene = scene.add_node(NodeKind::TargetBox, 1020.0, 480.0, &grid()).0;

    // Approach to the net, then the volley into the deep box
    scene = scene
        .add_path(
            PathType::Linear,
            vec![PathPoint::new(200.0, 300.0), PathPoint::new(540.0, 300.0)],
            PathStyle::default(),
        )
        .0;
    scene = scene
        .add_path(
            PathType::Curve,
            vec![
                PathPoint::new(540.0, 300.0),
                PathPoint::new(800.0, 340.0),
                PathPoint::new(1020.0, 480.0),
            ],
            PathStyle {
                line_style: LineStyle::Dotted,
                ..Default::default()
            },
        )
        .0;

    scene
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_template_builds_a_non_empty_scene() {
        for info in all_templates() {
            let scene = build_template(info.kind);
            assert!(!scene.nodes.is_empty(), "{} has no nodes", info.name);
            assert!(!scene.paths.is_empty(), "{} has no paths", info.name);
        }
    }

    #[test]
    fn baseline_feed_balls_are_numbered() {
        let scene = build_template(TemplateKind::BaselineFeed);
        let labels: Vec<_> = scene
            .nodes
            .iter()
            .filter(|n| matches!(n.kind, NodeKind::Ball))
            .map(|n| n.label.clone())
            .collect();
        assert_eq!(
            labels,
            vec![Some("1".into()), Some("2".into()), Some("3".into())]
        );
    }

    #[test]
    fn templates_survive_a_json_round_trip() {
        for info in all_templates() {
            let scene = build_template(info.kind);
            let json = scene.to_json().unwrap();
            assert_eq!(Scene::from_json(&json).unwrap(), scene);
        }
    }
}
