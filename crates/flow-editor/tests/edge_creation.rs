//! Integration tests: edge creation through the editor engine (flow-editor).
//!
//! Drives raw pointer positions through hit testing, hover tracking and the
//! behavior registry, then checks the committed diagram and its item state.
//!
//! Layout: node A at (100, 100) and node B at (300, 100), both 60×60 with
//! the default anchors (0 = left, 1 = right, 2 = top, 3 = bottom).

use flow_core::id::{EdgeId, NodeId};
use flow_core::model::*;
use flow_core::state::{EdgeState, NodeState};
use flow_editor::{DragAddEdge, DragAddEdgeConfig, EditorConfig, EditorEngine, GraphMode};
use pretty_assertions::assert_eq;

const EMPTY: (f32, f32) = (50.0, 50.0);

fn a() -> NodeId {
    NodeId::intern("A")
}

fn b() -> NodeId {
    NodeId::intern("B")
}

/// Canvas position of a default anchor of a 60×60 node at (x, y).
fn anchor_at(node: NodeId, index: usize) -> (f32, f32) {
    let x = if node == a() { 100.0 } else { 300.0 };
    let p = Node::new(node, x, 100.0)
        .anchor_position(index)
        .unwrap();
    (p.x, p.y)
}

fn diagram() -> FlowGraph {
    let mut graph = FlowGraph::new();
    graph.add_node(Node::new(a(), 100.0, 100.0)).unwrap();
    graph.add_node(Node::new(b(), 300.0, 100.0)).unwrap();
    graph
}

fn engine_with(graph: FlowGraph, allow_multi_edge: bool) -> EditorEngine {
    let config = EditorConfig {
        drag_add_edge: DragAddEdgeConfig {
            allow_multi_edge,
            ..Default::default()
        },
        ..Default::default()
    };
    EditorEngine::new(graph, &config).unwrap()
}

fn drag(engine: &mut EditorEngine, path: &[(f32, f32)]) {
    let (first, rest) = path.split_first().unwrap();
    engine.pointer_move(first.0, first.1);
    engine.pointer_down(first.0, first.1);
    for (x, y) in rest {
        engine.pointer_move(*x, *y);
    }
    let last = rest.last().unwrap_or(first);
    engine.pointer_up(last.0, last.1);
}

fn no_drag_marks(graph: &FlowGraph) -> bool {
    graph
        .nodes()
        .all(|n| !n.flags.adding_edge && !n.flags.adding_source)
}

// ─── Scenarios ──────────────────────────────────────────────────────────

#[test]
fn release_on_canvas_discards_edge() {
    let mut engine = engine_with(diagram(), true);
    drag(&mut engine, &[anchor_at(a(), 0), EMPTY]);

    let graph = engine.graph().unwrap();
    assert_eq!(graph.edge_count(), 0);
    assert!(no_drag_marks(graph));
}

#[test]
fn release_on_anchor_commits_edge() {
    let mut engine = engine_with(diagram(), true);
    drag(&mut engine, &[anchor_at(a(), 1), anchor_at(b(), 2)]);

    let graph = engine.graph().unwrap();
    assert_eq!(graph.edge_count(), 1);
    let edge = &graph.edges()[0];
    assert_eq!(edge.source, Some(Endpoint::new(a(), 1)));
    assert_eq!(edge.target, EdgeTarget::Node(Endpoint::new(b(), 2)));
    assert!(!edge.flags.drag);
    assert_eq!(graph.edges_connecting(a(), b()), vec![edge.id]);
    assert!(no_drag_marks(graph));
}

#[test]
fn duplicate_is_rejected_when_multi_edge_disallowed() {
    let mut graph = diagram();
    let existing = EdgeId::intern("ab");
    graph
        .add_edge(Edge::new(existing, Endpoint::new(a(), 1), Endpoint::new(b(), 2)))
        .unwrap();
    let mut engine = engine_with(graph, false);

    drag(&mut engine, &[anchor_at(a(), 1), anchor_at(b(), 2)]);

    let graph = engine.graph().unwrap();
    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.edges_connecting(a(), b()), vec![existing]);
    assert!(no_drag_marks(graph));
}

#[test]
fn duplicate_is_allowed_by_default() {
    let mut graph = diagram();
    graph
        .add_edge(Edge::new(
            EdgeId::intern("ab"),
            Endpoint::new(a(), 1),
            Endpoint::new(b(), 2),
        ))
        .unwrap();
    let mut engine = engine_with(graph, true);

    drag(&mut engine, &[anchor_at(a(), 1), anchor_at(b(), 2)]);
    assert_eq!(engine.graph().unwrap().edges_connecting(a(), b()).len(), 2);
}

#[test]
fn self_loop_is_rejected() {
    let mut engine = engine_with(diagram(), true);
    drag(&mut engine, &[anchor_at(a(), 0), anchor_at(a(), 2)]);

    let graph = engine.graph().unwrap();
    assert_eq!(graph.edge_count(), 0);
    assert!(no_drag_marks(graph));
}

#[test]
fn hovering_committed_edge_lights_both_ends() {
    let mut graph = diagram();
    let id = EdgeId::intern("ab_hover");
    graph
        .add_edge(Edge::new(id, Endpoint::new(a(), 1), Endpoint::new(b(), 0)))
        .unwrap();
    let mut engine = engine_with(graph, true);

    engine.pointer_move(230.0, 131.0);
    let graph = engine.graph().unwrap();
    assert!(graph.edge_state(id, EdgeState::Active));
    assert!(graph.node_state(a(), NodeState::Active));
    assert!(graph.node_state(b(), NodeState::Active));

    engine.pointer_move(230.0, 200.0);
    let graph = engine.graph().unwrap();
    assert!(!graph.edge_state(id, EdgeState::Active));
    assert!(!graph.node_state(a(), NodeState::Active));
    assert!(!graph.node_state(b(), NodeState::Active));
}

// ─── Drag details ───────────────────────────────────────────────────────

#[test]
fn drop_targets_marked_while_dragging() {
    let mut engine = engine_with(diagram(), true);
    let (x, y) = anchor_at(a(), 1);
    engine.pointer_move(x, y);
    engine.pointer_down(x, y);

    let graph = engine.graph().unwrap();
    assert!(graph.node_state(a(), NodeState::AddingSource));
    assert!(graph.node_state(b(), NodeState::AddingEdge));
    assert!(!graph.node_state(a(), NodeState::AddingEdge));

    engine.pointer_move(250.0, 250.0);
    let graph = engine.graph().unwrap();
    let edge = &graph.edges()[0];
    assert_eq!(edge.target, EdgeTarget::Point(Point::new(250.0, 250.0)));
    assert!(graph.edge_state(edge.id, EdgeState::Drag));
    assert!(graph.edges_connecting(a(), b()).is_empty());
}

#[test]
fn preview_snaps_to_anchor_under_pointer() {
    let mut engine = engine_with(diagram(), true);
    let (x, y) = anchor_at(a(), 1);
    engine.pointer_down(x, y);

    let (bx, by) = anchor_at(b(), 3);
    engine.pointer_move(bx, by);
    let graph = engine.graph().unwrap();
    assert_eq!(
        graph.edges()[0].target,
        EdgeTarget::Node(Endpoint::new(b(), 3))
    );
    // The hovered target anchor is highlighted as well.
    assert!(graph.node_state(b(), NodeState::ActiveAnchor(3)));
}

#[test]
fn release_on_node_body_cancels() {
    let mut engine = engine_with(diagram(), true);
    drag(&mut engine, &[anchor_at(a(), 1), (330.0, 130.0)]);
    let graph = engine.graph().unwrap();
    assert_eq!(graph.edge_count(), 0);
    assert!(no_drag_marks(graph));
}

#[test]
fn press_on_node_body_does_not_start_drag() {
    let mut engine = engine_with(diagram(), true);
    drag(&mut engine, &[(130.0, 130.0), anchor_at(b(), 0)]);
    assert_eq!(engine.graph().unwrap().edge_count(), 0);
    let behavior = engine
        .registry()
        .downcast_ref::<DragAddEdge>(DragAddEdge::NAME)
        .unwrap();
    assert!(!behavior.is_dragging());
}

#[test]
fn switching_mode_cancels_drag() {
    let mut engine = engine_with(diagram(), true);
    let (x, y) = anchor_at(a(), 1);
    engine.pointer_down(x, y);
    assert_eq!(engine.graph().unwrap().edge_count(), 1);

    engine.set_mode(GraphMode::AddNode);
    let graph = engine.graph().unwrap();
    assert_eq!(graph.edge_count(), 0);
    assert!(no_drag_marks(graph));

    // Releases in add-node mode never reach the edge behavior.
    engine.pointer_up(x, y);
    assert_eq!(engine.graph().unwrap().edge_count(), 0);
}

#[test]
fn edges_chain_across_nodes() {
    let mut graph = diagram();
    graph
        .add_node(Node::new(NodeId::intern("C"), 500.0, 100.0))
        .unwrap();
    let mut engine = engine_with(graph, false);

    drag(&mut engine, &[anchor_at(a(), 1), anchor_at(b(), 0)]);
    drag(&mut engine, &[(360.0, 130.0), (500.0, 130.0)]);

    let graph = engine.graph().unwrap();
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(graph.edges_connecting(b(), NodeId::intern("C")).len(), 1);
    assert!(graph.edges().iter().all(Edge::is_resolved));
}
