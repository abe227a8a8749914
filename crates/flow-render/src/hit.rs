//! Hit testing: point → visual element lookup.
//!
//! Nodes are painted above edges, so they are tested first, front-to-back
//! (last painted = topmost). Within a node the anchor hit-regions win over
//! the node body: anchors straddle the node border and must stay pressable.

use flow_core::model::*;
use kurbo::{Line, ParamCurveNearest};
use serde::{Deserialize, Serialize};

/// Hit-region tolerances in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HitConfig {
    /// Radius of an anchor's circular hit-region.
    pub anchor_radius: f32,
    /// Max distance from an edge's path that still counts as over the edge.
    pub edge_tolerance: f32,
}

impl Default for HitConfig {
    fn default() -> Self {
        Self {
            anchor_radius: 6.0,
            edge_tolerance: 4.0,
        }
    }
}

/// Find the topmost element at position (px, py).
/// Returns [`HitTarget::Canvas`] if nothing is hit.
pub fn hit_test(graph: &FlowGraph, config: &HitConfig, px: f32, py: f32) -> HitTarget {
    for node in graph.nodes().rev() {
        if let Some(index) = hit_anchor(node, config.anchor_radius, px, py) {
            return HitTarget::Anchor {
                node: node.id,
                index,
            };
        }
        if node.bounds().contains(px, py) {
            return HitTarget::Node(node.id);
        }
    }

    let p = kurbo::Point::new(f64::from(px), f64::from(py));
    let tolerance_sq = f64::from(config.edge_tolerance).powi(2);
    for edge in graph.edges().iter().rev() {
        // The edge being dragged follows the pointer; it must not shadow
        // whatever lies underneath.
        if edge.flags.drag {
            continue;
        }
        if let Some(line) = edge_segment(graph, edge)
            && line.nearest(p, 1e-6).distance_sq <= tolerance_sq
        {
            return HitTarget::Edge(edge.id);
        }
    }

    HitTarget::Canvas
}

/// Index of the anchor of `node` whose hit-region contains the point.
pub fn hit_anchor(node: &Node, radius: f32, px: f32, py: f32) -> Option<usize> {
    let r_sq = radius * radius;
    (0..node.anchor_count()).find(|&i| {
        node.anchor_position(i).is_some_and(|a| {
            let dx = a.x - px;
            let dy = a.y - py;
            dx * dx + dy * dy <= r_sq
        })
    })
}

/// The straight segment between an edge's two ends.
///
/// Curved edge types are approximated by their chord; the hit tolerance
/// covers the gap for the short edges typical of flow diagrams.
pub fn edge_segment(graph: &FlowGraph, edge: &Edge) -> Option<Line> {
    let start = endpoint_position(graph, edge.source?)?;
    let end = match edge.target {
        EdgeTarget::Node(ep) => endpoint_position(graph, ep)?,
        EdgeTarget::Point(p) => p,
    };
    Some(Line::new(
        (f64::from(start.x), f64::from(start.y)),
        (f64::from(end.x), f64::from(end.y)),
    ))
}

fn endpoint_position(graph: &FlowGraph, ep: Endpoint) -> Option<Point> {
    graph.node(ep.node)?.anchor_position(ep.anchor)
}
