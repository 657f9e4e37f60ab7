//! Integration tests driving the app through its gesture handlers.
//!
//! The pointer handlers take scene coordinates directly, so these tests
//! exercise the full interaction state machine without an egui frame loop.

use super::canvas::CanvasTransform;
use super::rendering;
use super::state::{DrillApp, EditorState};
use crate::host::ChangeSource;
use crate::types::{NodeKind, PathPoint, PathStyle, PathType, Scene, SceneId};
use eframe::egui;

fn app() -> DrillApp {
    DrillApp::default()
}

fn add_node(app: &mut DrillApp, kind: NodeKind, x: f32, y: f32) -> SceneId {
    let (scene, id) = app.scene.add_node(kind, x, y, &app.grid());
    app.scene = scene;
    id.expect("node should be added")
}

fn add_linear_path(app: &mut DrillApp, points: Vec<PathPoint>) -> SceneId {
    let (scene, id) = app
        .scene
        .add_path(PathType::Linear, points, PathStyle::default());
    app.scene = scene;
    id.expect("path should be added")
}

fn undo_depth(app: &mut DrillApp) -> usize {
    let mut depth = 0;
    while app.history.can_undo() {
        app.perform_undo(1000.0 + depth as f64);
        depth += 1;
    }
    depth
}

#[test]
fn click_on_node_selects_without_history_entry() {
    let mut app = app();
    let id = add_node(&mut app, NodeKind::Player, 600.0, 300.0);

    app.pointer_pressed(PathPoint::new(600.0, 300.0), false, 1.0);
    app.pointer_moved(PathPoint::new(602.0, 301.0)); // below the threshold
    app.pointer_released(PathPoint::new(602.0, 301.0), 1.1);

    assert_eq!(app.interaction.selection, vec![id]);
    assert!(!app.history.can_undo());
    let node = app.scene.node(id).unwrap();
    assert_eq!((node.x, node.y), (600.0, 300.0));
}

#[test]
fn drag_commits_once_no_matter_how_many_moves() {
    let mut app = app();
    let id = add_node(&mut app, NodeKind::Player, 600.0, 300.0);

    app.pointer_pressed(PathPoint::new(600.0, 300.0), false, 1.0);
    for i in 1..=50 {
        app.pointer_moved(PathPoint::new(600.0 + 1.6 * i as f32, 300.0 + 0.8 * i as f32));
    }
    app.pointer_released(PathPoint::new(680.0, 340.0), 2.0);

    let node = app.scene.node(id).unwrap();
    assert_eq!((node.x, node.y), (680.0, 340.0));
    assert_eq!(undo_depth(&mut app), 1);
    let node = app.scene.node(id).unwrap();
    assert_eq!((node.x, node.y), (600.0, 300.0));
}

#[test]
fn escape_mid_drag_restores_the_press_snapshot() {
    let mut app = app();
    let id = add_node(&mut app, NodeKind::Coach, 200.0, 200.0);

    app.pointer_pressed(PathPoint::new(200.0, 200.0), false, 1.0);
    app.pointer_moved(PathPoint::new(320.0, 280.0));
    app.handle_escape(1.5);

    let node = app.scene.node(id).unwrap();
    assert_eq!((node.x, node.y), (200.0, 200.0));
    assert!(!app.history.can_undo());
    assert!(matches!(app.interaction.state, EditorState::Idle));
}

#[test]
fn marquee_then_duplicate_copies_the_group_with_an_offset() {
    let mut app = app();
    let player = add_node(&mut app, NodeKind::Player, 600.0, 300.0);
    let coach = add_node(&mut app, NodeKind::Coach, 700.0, 300.0);
    add_linear_path(
        &mut app,
        vec![PathPoint::new(600.0, 300.0), PathPoint::new(700.0, 300.0)],
    );

    app.pointer_pressed(PathPoint::new(560.0, 270.0), false, 1.0);
    app.pointer_moved(PathPoint::new(740.0, 330.0));
    app.pointer_released(PathPoint::new(740.0, 330.0), 1.2);
    assert_eq!(app.interaction.selection.len(), 3);

    app.duplicate_selection(2.0);

    assert_eq!(app.scene.nodes.len(), 4);
    assert_eq!(app.scene.paths.len(), 2);
    // Copies are selected, originals untouched
    assert_eq!(app.interaction.selection.len(), 3);
    assert!(!app.interaction.selection.contains(&player));
    let copies: Vec<_> = app
        .scene
        .nodes
        .iter()
        .filter(|n| n.id != player && n.id != coach)
        .map(|n| (n.x, n.y))
        .collect();
    assert!(copies.contains(&(620.0, 320.0)));
    assert!(copies.contains(&(720.0, 320.0)));
}

#[test]
fn sub_threshold_marquee_clears_selection_even_when_additive() {
    let mut app = app();
    let id = add_node(&mut app, NodeKind::Cone, 100.0, 100.0);
    app.interaction.selection = vec![id];

    app.pointer_pressed(PathPoint::new(500.0, 400.0), true, 1.0);
    app.pointer_released(PathPoint::new(502.0, 401.0), 1.1);

    assert!(app.interaction.selection.is_empty());
}

#[test]
fn additive_marquee_unions_with_the_existing_selection() {
    let mut app = app();
    let near = add_node(&mut app, NodeKind::Player, 100.0, 100.0);
    let far = add_node(&mut app, NodeKind::Player, 800.0, 400.0);
    app.interaction.selection = vec![far];

    app.pointer_pressed(PathPoint::new(60.0, 60.0), true, 1.0);
    app.pointer_moved(PathPoint::new(160.0, 160.0));
    app.pointer_released(PathPoint::new(160.0, 160.0), 1.2);

    assert!(app.interaction.selection.contains(&near));
    assert!(app.interaction.selection.contains(&far));
}

#[test]
fn additive_click_toggles_a_selected_element_off() {
    let mut app = app();
    let id = add_node(&mut app, NodeKind::Player, 300.0, 200.0);
    app.interaction.selection = vec![id];

    app.pointer_pressed(PathPoint::new(300.0, 200.0), true, 1.0);

    assert!(app.interaction.selection.is_empty());
    assert!(matches!(app.interaction.state, EditorState::Idle));
}

#[test]
fn plain_click_collapses_a_multi_selection_to_the_clicked_node() {
    let mut app = app();
    let player = add_node(&mut app, NodeKind::Player, 300.0, 200.0);
    let coach = add_node(&mut app, NodeKind::Coach, 500.0, 200.0);
    app.interaction.selection = vec![player, coach];

    app.pointer_pressed(PathPoint::new(300.0, 200.0), false, 1.0);
    // The whole group stays selected at press time so a drag moves everything
    assert_eq!(app.interaction.selection.len(), 2);
    app.pointer_released(PathPoint::new(300.0, 200.0), 1.1);

    assert_eq!(app.interaction.selection, vec![player]);
    assert!(!app.history.can_undo());
}

#[test]
fn dragging_a_member_of_a_multi_selection_moves_the_group() {
    let mut app = app();
    let player = add_node(&mut app, NodeKind::Player, 300.0, 200.0);
    let coach = add_node(&mut app, NodeKind::Coach, 500.0, 200.0);
    app.interaction.selection = vec![player, coach];

    app.pointer_pressed(PathPoint::new(300.0, 200.0), false, 1.0);
    app.pointer_moved(PathPoint::new(340.0, 200.0));
    app.pointer_released(PathPoint::new(340.0, 200.0), 1.2);

    assert_eq!(app.interaction.selection, vec![player, coach]);
    assert_eq!(app.scene.node(player).unwrap().x, 340.0);
    assert_eq!(app.scene.node(coach).unwrap().x, 540.0);
}

#[test]
fn additive_click_keeps_the_rest_of_the_selection() {
    let mut app = app();
    let player = add_node(&mut app, NodeKind::Player, 300.0, 200.0);
    let coach = add_node(&mut app, NodeKind::Coach, 500.0, 200.0);
    app.interaction.selection = vec![player];

    app.pointer_pressed(PathPoint::new(500.0, 200.0), true, 1.0);
    app.pointer_released(PathPoint::new(500.0, 200.0), 1.1);

    assert_eq!(app.interaction.selection, vec![player, coach]);
}

#[test]
fn placement_tool_stays_armed_for_balls_and_cones_only() {
    let mut app = app();

    app.interaction.state = EditorState::Placing(NodeKind::Ball);
    app.pointer_pressed(PathPoint::new(100.0, 100.0), false, 1.0);
    assert!(matches!(
        app.interaction.state,
        EditorState::Placing(NodeKind::Ball)
    ));

    app.interaction.state = EditorState::Placing(NodeKind::Coach);
    app.pointer_pressed(PathPoint::new(200.0, 100.0), false, 2.0);
    assert!(matches!(app.interaction.state, EditorState::Idle));
    assert_eq!(app.scene.nodes.len(), 2);
}

#[test]
fn ball_placement_stops_at_the_limit() {
    let mut app = app();
    app.interaction.state = EditorState::Placing(NodeKind::Ball);
    for i in 0..12 {
        app.pointer_pressed(PathPoint::new(40.0 * (i + 1) as f32, 100.0), false, i as f64);
    }
    assert_eq!(app.scene.ball_count(), crate::constants::BALL_LIMIT);
    assert_eq!(undo_depth(&mut app), crate::constants::BALL_LIMIT);
}

#[test]
fn curve_takes_start_end_then_control() {
    let mut app = app();
    app.interaction.state = EditorState::DrawingCurve {
        start: None,
        end: None,
    };

    app.pointer_pressed(PathPoint::new(100.0, 100.0), false, 1.0);
    app.pointer_pressed(PathPoint::new(300.0, 100.0), false, 1.2);
    assert!(app.scene.paths.is_empty());
    app.pointer_pressed(PathPoint::new(200.0, 20.0), false, 1.4);

    assert_eq!(app.scene.paths.len(), 1);
    let path = &app.scene.paths[0];
    assert_eq!(path.path_type, PathType::Curve);
    assert_eq!(
        path.points,
        vec![
            PathPoint::new(100.0, 100.0),
            PathPoint::new(200.0, 20.0),
            PathPoint::new(300.0, 100.0),
        ]
    );
    // Tool stays armed for the next curve
    assert!(matches!(
        app.interaction.state,
        EditorState::DrawingCurve {
            start: None,
            end: None
        }
    ));
}

#[test]
fn escape_finalizes_a_viable_polyline() {
    let mut app = app();
    app.interaction.state = EditorState::DrawingLinear { points: Vec::new() };
    app.pointer_pressed(PathPoint::new(100.0, 100.0), false, 1.0);
    app.pointer_pressed(PathPoint::new(200.0, 100.0), false, 1.1);
    app.pointer_pressed(PathPoint::new(200.0, 200.0), false, 1.2);

    app.handle_escape(1.5);

    assert_eq!(app.scene.paths.len(), 1);
    assert_eq!(app.scene.paths[0].points.len(), 3);
    assert!(matches!(app.interaction.state, EditorState::Idle));
}

#[test]
fn single_point_auto_closes_to_the_pointer_on_finalize() {
    let mut app = app();
    app.interaction.state = EditorState::DrawingLinear { points: Vec::new() };
    app.pointer_pressed(PathPoint::new(100.0, 100.0), false, 1.0);
    app.pointer_moved(PathPoint::new(240.0, 160.0));
    app.finish_path_gesture(1.2);

    assert_eq!(app.scene.paths.len(), 1);
    assert_eq!(
        app.scene.paths[0].points,
        vec![PathPoint::new(100.0, 100.0), PathPoint::new(240.0, 160.0)]
    );
}

#[test]
fn single_point_polyline_without_a_pointer_is_discarded() {
    let mut app = app();
    app.interaction.state = EditorState::DrawingLinear { points: Vec::new() };
    app.pointer_pressed(PathPoint::new(100.0, 100.0), false, 1.0);
    app.finish_path_gesture(1.2);

    assert!(app.scene.paths.is_empty());
    assert!(!app.history.can_undo());
}

#[test]
fn two_click_mode_finishes_segments_automatically() {
    let mut app = app();
    app.interaction.quick_segments = true;
    app.interaction.state = EditorState::DrawingLinear { points: Vec::new() };

    app.pointer_pressed(PathPoint::new(100.0, 100.0), false, 1.0);
    app.pointer_pressed(PathPoint::new(300.0, 200.0), false, 1.1);

    assert_eq!(app.scene.paths.len(), 1);
    assert_eq!(app.scene.paths[0].points.len(), 2);
    assert!(matches!(
        app.interaction.state,
        EditorState::DrawingLinear { ref points } if points.is_empty()
    ));
}

#[test]
fn double_click_finalize_drops_the_repeated_last_point() {
    let mut app = app();
    app.interaction.state = EditorState::DrawingLinear { points: Vec::new() };
    app.pointer_pressed(PathPoint::new(100.0, 100.0), false, 1.0);
    app.pointer_pressed(PathPoint::new(300.0, 200.0), false, 1.1);
    // The second press of the double click lands on the same spot
    app.pointer_pressed(PathPoint::new(300.0, 200.0), false, 1.2);
    app.finish_path_gesture(1.3);

    assert_eq!(app.scene.paths.len(), 1);
    assert_eq!(
        app.scene.paths[0].points,
        vec![PathPoint::new(100.0, 100.0), PathPoint::new(300.0, 200.0)]
    );
}

#[test]
fn handle_drag_rewrites_one_path_point() {
    let mut app = app();
    let path_id = add_linear_path(
        &mut app,
        vec![PathPoint::new(100.0, 100.0), PathPoint::new(300.0, 100.0)],
    );

    // Select the path by clicking its stroke, then grab the far endpoint
    app.pointer_pressed(PathPoint::new(200.0, 104.0), false, 1.0);
    app.pointer_released(PathPoint::new(200.0, 104.0), 1.1);
    assert_eq!(app.interaction.selection, vec![path_id]);

    app.pointer_pressed(PathPoint::new(300.0, 100.0), false, 2.0);
    assert!(matches!(
        app.interaction.state,
        EditorState::EditingHandle { index: 1, .. }
    ));
    app.pointer_moved(PathPoint::new(400.0, 220.0));
    app.pointer_released(PathPoint::new(400.0, 220.0), 2.5);

    let path = app.scene.path(path_id).unwrap();
    assert_eq!(path.points[1], PathPoint::new(400.0, 220.0));
    assert_eq!(undo_depth(&mut app), 1);
}

#[test]
fn nudge_moves_by_the_snap_step_and_commits_each_press() {
    let mut app = app();
    let id = add_node(&mut app, NodeKind::Player, 600.0, 300.0);
    app.interaction.selection = vec![id];

    app.nudge_selection(1.0, 0.0, 1.0);
    app.nudge_selection(0.0, -1.0, 1.1);

    let node = app.scene.node(id).unwrap();
    assert_eq!((node.x, node.y), (620.0, 280.0));
    assert_eq!(undo_depth(&mut app), 2);
}

#[test]
fn nudge_against_the_edge_does_not_commit() {
    let mut app = app();
    let id = add_node(&mut app, NodeKind::Player, 0.0, 300.0);
    app.interaction.selection = vec![id];

    app.nudge_selection(-1.0, 0.0, 1.0);

    assert!(!app.history.can_undo());
}

#[test]
fn external_apply_resets_selection_and_playback() {
    let mut app = app();
    let id = add_node(&mut app, NodeKind::Player, 600.0, 300.0);
    app.interaction.selection = vec![id];
    app.player.start(1.0);

    let replacement = Scene::new()
        .add_node(NodeKind::Coach, 100.0, 100.0, &app.grid())
        .0;
    app.install_scene(replacement, ChangeSource::External, 2.0);

    assert!(app.interaction.selection.is_empty());
    assert!(!app.player.is_playing());
    assert_eq!(app.scene.nodes.len(), 1);

    // The wholesale replace is one undoable step
    app.perform_undo(3.0);
    assert!(app.scene.node(id).is_some());
}

#[test]
fn undo_prunes_stale_selection() {
    let mut app = app();
    add_node(&mut app, NodeKind::Player, 100.0, 100.0);
    let previous = app.scene.clone();
    let added = add_node(&mut app, NodeKind::Cone, 200.0, 200.0);
    app.commit_scene(previous, 1.0);
    app.interaction.selection = vec![added];

    app.perform_undo(2.0);

    assert!(app.interaction.selection.is_empty());
}

#[test]
fn orientation_toggle_is_one_undoable_step_and_an_involution() {
    let mut app = app();
    let id = add_node(&mut app, NodeKind::Player, 840.0, 120.0);
    let before = app.scene.clone();

    app.toggle_orientation(1.0);
    let node = app.scene.node(id).unwrap();
    assert_eq!((node.x, node.y), (120.0, 840.0));
    assert!(app.canvas.portrait);

    app.toggle_orientation(2.0);
    assert_eq!(app.scene, before);
    assert!(!app.canvas.portrait);
    assert_eq!(undo_depth(&mut app), 2);
}

#[test]
fn duplicating_balls_respects_the_limit() {
    let mut app = app();
    let mut ids = Vec::new();
    for i in 0..6 {
        ids.push(add_node(&mut app, NodeKind::Ball, 60.0 * (i + 1) as f32, 100.0));
    }
    app.interaction.selection = ids;

    app.duplicate_selection(1.0);

    assert_eq!(app.scene.ball_count(), crate::constants::BALL_LIMIT);
}

#[test]
fn edits_notify_the_host_after_the_quiet_period() {
    let mut app = app();
    let (tx, rx) = std::sync::mpsc::channel();
    app.host.subscribe(tx);
    let id = add_node(&mut app, NodeKind::Player, 600.0, 300.0);
    app.interaction.selection = vec![id];

    app.nudge_selection(1.0, 0.0, 10.0);
    let scene = app.scene.clone();
    app.host.flush_due(10.1, &scene);
    assert!(rx.try_recv().is_err(), "still inside the debounce window");

    app.host.flush_due(10.6, &scene);
    let note = rx.try_recv().unwrap();
    assert_eq!(note.source, ChangeSource::User);
    assert_eq!(note.scene.node(id).unwrap().x, 620.0);
}

#[test]
fn host_apply_event_replaces_the_scene() {
    let mut app = app();
    add_node(&mut app, NodeKind::Player, 600.0, 300.0);

    let incoming = Scene::new()
        .add_node(NodeKind::Coach, 200.0, 200.0, &app.grid())
        .0;
    let sender = app.host.sender();
    sender.send(crate::host::HostEvent::Apply(incoming)).unwrap();

    app.pump_host_events(5.0);

    assert_eq!(app.scene.nodes.len(), 1);
    assert!(matches!(app.scene.nodes[0].kind, NodeKind::Coach));
}

#[test]
fn painting_a_full_scene_does_not_panic() {
    let mut app = app();
    let kinds = [
        NodeKind::Coach,
        NodeKind::Player,
        NodeKind::Target,
        NodeKind::TargetBox,
        NodeKind::TargetLine,
        NodeKind::Ball,
        NodeKind::Text,
        NodeKind::Cone,
        NodeKind::Feeder,
        NodeKind::Ladder,
        NodeKind::Other("net".to_string()),
    ];
    for (i, kind) in kinds.into_iter().enumerate() {
        add_node(&mut app, kind, 80.0 + 100.0 * i as f32, 200.0);
    }
    // A labelled player exercises the shared label placement below the glyph
    app.scene.nodes[1].label = Some("P1".to_string());
    let path = add_linear_path(
        &mut app,
        vec![PathPoint::new(100.0, 400.0), PathPoint::new(500.0, 400.0)],
    );
    app.interaction.selection = vec![path, app.scene.nodes[0].id];

    let ctx = egui::Context::default();
    let _ = ctx.run(egui::RawInput::default(), |ctx| {
        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Foreground,
            egui::Id::new("drill-canvas"),
        ));
        let transform = CanvasTransform {
            origin: egui::Pos2::ZERO,
            offset: egui::Vec2::ZERO,
            zoom: 1.0,
        };
        rendering::draw_scene(&app, &painter, &transform, 0.0);
    });
}

#[test]
fn pointer_lost_mid_drag_rolls_back() {
    let mut app = app();
    let id = add_node(&mut app, NodeKind::Player, 400.0, 300.0);

    app.pointer_pressed(PathPoint::new(400.0, 300.0), false, 1.0);
    app.pointer_moved(PathPoint::new(520.0, 360.0));
    app.pointer_lost();

    let node = app.scene.node(id).unwrap();
    assert_eq!((node.x, node.y), (400.0, 300.0));
    assert!(!app.history.can_undo());
}
