//! Scripted pointer session against a small diagram.
//!
//! Run with `RUST_LOG=debug` to watch the behaviors' state transitions.

use flow_core::id::NodeId;
use flow_core::model::{FlowGraph, Node};
use flow_editor::{EditorConfig, EditorEngine, NodeTemplate};
use flow_render::anchor_visuals;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut graph = FlowGraph::new();
    graph.add_node(Node::new(NodeId::intern("start"), 100.0, 100.0).with_label("Start"))?;
    graph.add_node(Node::new(NodeId::intern("end"), 300.0, 100.0).with_label("End"))?;

    let config = EditorConfig::from_json(r#"{ "dragAddEdge": { "allowMultiEdge": false } }"#)?;
    let mut engine = EditorEngine::new(graph, &config)?;

    // start#1 → end#0
    engine.pointer_move(160.0, 130.0);
    engine.pointer_down(160.0, 130.0);
    engine.pointer_move(240.0, 140.0);
    engine.pointer_move(300.0, 130.0);
    if let Some(end) = engine.graph().and_then(|g| g.node(NodeId::intern("end"))) {
        for visual in anchor_visuals(end) {
            println!(
                "end anchor {} visible={} highlighted={}",
                visual.index, visual.visible, visual.highlighted
            );
        }
    }
    engine.pointer_up(300.0, 130.0);

    // Same pair again: rejected.
    engine.pointer_move(160.0, 130.0);
    engine.pointer_down(160.0, 130.0);
    engine.pointer_up(300.0, 130.0);

    // Drop a third node below.
    engine.start_add_node(NodeTemplate::default());
    engine.pointer_move(230.0, 260.0);
    engine.pointer_up(230.0, 260.0);

    if let Some(graph) = engine.graph() {
        println!("{} nodes, {} edges", graph.node_count(), graph.edge_count());
        for edge in graph.edges() {
            if let (Some(source), Some(target)) = (edge.source, edge.target.endpoint()) {
                println!("  {} : {source} -> {target}", edge.id);
            }
        }
    }
    Ok(())
}
