//! Integration tests: placing nodes in add-node mode (flow-editor).

use flow_core::model::*;
use flow_editor::{
    DragAddNode, EditorConfig, EditorEngine, GraphMode, NodePlacement, NodeTemplate, Overlay,
};
use pretty_assertions::assert_eq;

fn engine() -> EditorEngine {
    EditorEngine::new(FlowGraph::new(), &EditorConfig::default()).unwrap()
}

#[test]
fn drop_places_node_and_returns_to_default_mode() {
    let mut engine = engine();
    assert!(engine.start_add_node(NodeTemplate {
        label: Some("decision".into()),
        ..Default::default()
    }));
    assert_eq!(engine.mode(), GraphMode::AddNode);

    engine.pointer_enter_canvas(200.0, 200.0);
    let overlays = engine.overlays();
    assert_eq!(overlays.len(), 1);
    let Overlay::Delegate(bounds) = overlays[0];
    assert_eq!((bounds.x, bounds.y), (170.0, 170.0));

    engine.pointer_move(240.0, 220.0);
    engine.pointer_up(240.0, 220.0);

    assert_eq!(engine.mode(), GraphMode::Default);
    assert!(engine.overlays().is_empty());
    let graph = engine.graph().unwrap();
    assert_eq!(graph.node_count(), 1);
    let node = graph.nodes().next().unwrap();
    assert_eq!((node.x, node.y), (210.0, 190.0));
    assert_eq!(node.label.as_deref(), Some("decision"));
    assert_eq!(node.anchor_count(), 4);
}

#[test]
fn top_left_placement() {
    let mut engine = engine();
    engine.start_add_node(NodeTemplate {
        placement: NodePlacement::TopLeft,
        width: 120.0,
        height: 40.0,
        ..Default::default()
    });
    engine.pointer_move(10.0, 20.0);
    let Overlay::Delegate(delegate) = engine.overlays()[0];
    engine.pointer_up(10.0, 20.0);

    let node = engine.graph().unwrap().nodes().next().unwrap().clone();
    assert_eq!(node.bounds(), Bounds {
        x: 10.0,
        y: 20.0,
        width: 120.0,
        height: 40.0
    });
    assert_eq!(delegate, node.bounds());
}

#[test]
fn delegate_repaints_without_model_changes() {
    let mut engine = engine();
    engine.start_add_node(NodeTemplate::default());
    let before = engine.graph().unwrap().paint_generation();
    engine.pointer_move(10.0, 10.0);
    engine.pointer_move(20.0, 10.0);
    assert_eq!(engine.graph().unwrap().paint_generation(), before + 2);
    assert_eq!(engine.graph().unwrap().node_count(), 0);
}

#[test]
fn leaving_add_node_mode_drops_delegate() {
    let mut engine = engine();
    engine.start_add_node(NodeTemplate::default());
    engine.pointer_move(10.0, 10.0);
    engine.set_mode(GraphMode::Default);

    assert!(engine.overlays().is_empty());
    let behavior = engine
        .registry()
        .downcast_ref::<DragAddNode>(DragAddNode::NAME)
        .unwrap();
    assert!(!behavior.is_armed());
}

#[test]
fn start_add_node_needs_the_behavior() {
    let config = EditorConfig {
        behaviors: vec!["hover-anchor".into()],
        ..Default::default()
    };
    let mut engine = EditorEngine::new(FlowGraph::new(), &config).unwrap();
    assert!(!engine.start_add_node(NodeTemplate::default()));
    assert_eq!(engine.mode(), GraphMode::Default);
}
