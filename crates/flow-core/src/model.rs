//! Core data model for flow diagrams.
//!
//! A diagram is a directed graph of [`Node`]s connected by [`Edge`]s.
//! Edges attach to nodes at *anchors*: fixed connection points addressed by
//! their index into the node's anchor-point list.
//!
//! While an edge is being dragged out it is *speculative*: its source is
//! resolved but its target may still be a floating canvas point, and its
//! `drag` flag is set. Only edges with both ends resolved and `drag` cleared
//! are mirrored into the underlying `petgraph` structure, so connectivity
//! queries never see an edge that is still being dragged, even one snapped
//! to a target anchor.

use crate::error::GraphError;
use crate::id::{EdgeId, NodeId};
use crate::state::{EdgeFlags, EdgeState, NodeFlags, NodeState};
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::stable_graph::StableDiGraph;
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;

// ─── Geometry ────────────────────────────────────────────────────────────

/// A canvas-space point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box of a node.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

// ─── Nodes ───────────────────────────────────────────────────────────────

/// Default node size (square key shape).
pub const DEFAULT_NODE_SIZE: f32 = 60.0;

/// Default anchors: left, right, top and bottom midpoints.
pub const DEFAULT_ANCHOR_POINTS: [(f32, f32); 4] = [(0.0, 0.5), (1.0, 0.5), (0.5, 0.0), (0.5, 1.0)];

/// A diagram node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// Top-left corner.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub label: Option<String>,
    /// Anchor points relative to the node box, each in `[0, 1]²`.
    anchor_points: SmallVec<[(f32, f32); 4]>,
    pub flags: NodeFlags,
}

impl Node {
    pub fn new(id: NodeId, x: f32, y: f32) -> Self {
        Self {
            id,
            x,
            y,
            width: DEFAULT_NODE_SIZE,
            height: DEFAULT_NODE_SIZE,
            label: None,
            anchor_points: SmallVec::from_slice(&DEFAULT_ANCHOR_POINTS),
            flags: NodeFlags::with_anchor_count(DEFAULT_ANCHOR_POINTS.len()),
        }
    }

    #[must_use]
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_anchor_points(mut self, points: &[(f32, f32)]) -> Self {
        self.set_anchor_points(points);
        self
    }

    /// Replace the anchor configuration. Anchor indices from the previous
    /// configuration are invalidated, so every anchor flag is reset.
    pub fn set_anchor_points(&mut self, points: &[(f32, f32)]) {
        self.anchor_points = SmallVec::from_slice(points);
        self.flags.reset_anchors(points.len());
    }

    pub fn anchor_points(&self) -> &[(f32, f32)] {
        &self.anchor_points
    }

    pub fn anchor_count(&self) -> usize {
        self.anchor_points.len()
    }

    /// Absolute canvas position of an anchor.
    pub fn anchor_position(&self, index: usize) -> Option<Point> {
        self.anchor_points
            .get(index)
            .map(|(rx, ry)| Point::new(self.x + rx * self.width, self.y + ry * self.height))
    }

    pub fn bounds(&self) -> Bounds {
        Bounds {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }

    fn check_anchor(&self, index: usize) -> Result<(), GraphError> {
        if index < self.anchor_count() {
            Ok(())
        } else {
            Err(GraphError::AnchorOutOfRange {
                node: self.id,
                index,
                count: self.anchor_count(),
            })
        }
    }
}

// ─── Edges ───────────────────────────────────────────────────────────────

/// One resolved end of an edge: a node and one of its anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    pub node: NodeId,
    pub anchor: usize,
}

impl Endpoint {
    pub const fn new(node: NodeId, anchor: usize) -> Self {
        Self { node, anchor }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.node, self.anchor)
    }
}

/// Where an edge ends: on a node anchor, or (mid-drag) at a free point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EdgeTarget {
    Node(Endpoint),
    Point(Point),
}

impl EdgeTarget {
    pub fn endpoint(&self) -> Option<Endpoint> {
        match self {
            Self::Node(ep) => Some(*ep),
            Self::Point(_) => None,
        }
    }

    pub fn is_floating(&self) -> bool {
        matches!(self, Self::Point(_))
    }
}

/// How an edge path is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeType {
    #[default]
    Line,
    Polyline,
    Cubic,
    Quadratic,
}

/// A connection between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub edge_type: EdgeType,
    pub label: Option<String>,
    pub source: Option<Endpoint>,
    pub target: EdgeTarget,
    pub flags: EdgeFlags,
}

impl Edge {
    /// A fully resolved edge between two anchors.
    pub fn new(id: EdgeId, source: Endpoint, target: Endpoint) -> Self {
        Self {
            id,
            edge_type: EdgeType::default(),
            label: None,
            source: Some(source),
            target: EdgeTarget::Node(target),
            flags: EdgeFlags::default(),
        }
    }

    /// An edge being dragged out of `source`, its target following the pointer.
    pub fn speculative(id: EdgeId, edge_type: EdgeType, source: Endpoint, at: Point) -> Self {
        Self {
            id,
            edge_type,
            label: None,
            source: Some(source),
            target: EdgeTarget::Point(at),
            flags: EdgeFlags {
                drag: true,
                ..Default::default()
            },
        }
    }

    #[must_use]
    pub fn with_type(mut self, edge_type: EdgeType) -> Self {
        self.edge_type = edge_type;
        self
    }

    pub fn source_node(&self) -> Option<NodeId> {
        self.source.map(|ep| ep.node)
    }

    pub fn target_node(&self) -> Option<NodeId> {
        self.target.endpoint().map(|ep| ep.node)
    }

    /// Both ends attached to node anchors.
    pub fn is_resolved(&self) -> bool {
        self.source.is_some() && !self.target.is_floating()
    }

    pub fn touches(&self, node: NodeId) -> bool {
        self.source_node() == Some(node) || self.target_node() == Some(node)
    }
}

// ─── Hit targets ─────────────────────────────────────────────────────────

/// The kind of item a pointer event is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Canvas,
    Node,
    Edge,
}

/// The visual element under the pointer.
///
/// Anchors are their own hit-region class: pressing on an anchor is not
/// the same as pressing on the node body, even though both belong to the
/// same node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HitTarget {
    #[default]
    Canvas,
    Node(NodeId),
    Anchor { node: NodeId, index: usize },
    Edge(EdgeId),
}

impl HitTarget {
    pub fn item_kind(&self) -> ItemKind {
        match self {
            Self::Canvas => ItemKind::Canvas,
            Self::Node(_) | Self::Anchor { .. } => ItemKind::Node,
            Self::Edge(_) => ItemKind::Edge,
        }
    }

    /// The anchor hit-region under the pointer, if any.
    pub fn anchor(&self) -> Option<Endpoint> {
        match self {
            Self::Anchor { node, index } => Some(Endpoint::new(*node, *index)),
            _ => None,
        }
    }

    pub fn is_anchor(&self) -> bool {
        matches!(self, Self::Anchor { .. })
    }

    /// The node this target belongs to (anchors included).
    pub fn node(&self) -> Option<NodeId> {
        match self {
            Self::Node(id) | Self::Anchor { node: id, .. } => Some(*id),
            _ => None,
        }
    }

    pub fn edge(&self) -> Option<EdgeId> {
        match self {
            Self::Edge(id) => Some(*id),
            _ => None,
        }
    }
}

// ─── Flow graph ──────────────────────────────────────────────────────────

/// The diagram model: nodes, edges, and their item state flags.
#[derive(Debug, Clone, Default)]
pub struct FlowGraph {
    /// Connectivity of resolved edges. Edge weights are the edge IDs.
    graph: StableDiGraph<Node, EdgeId>,

    /// Index from NodeId → NodeIndex for fast lookup.
    id_index: HashMap<NodeId, NodeIndex>,

    /// Every edge, speculative ones included, in insertion order.
    edges: Vec<Edge>,

    /// Resolved edges → their petgraph edge.
    links: HashMap<EdgeId, EdgeIndex>,

    /// Set by every mutation, cleared by `repaint`.
    dirty: bool,

    /// Number of repaints performed.
    paint_generation: u64,
}

impl FlowGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ── Nodes ──

    pub fn add_node(&mut self, node: Node) -> Result<NodeIndex, GraphError> {
        if self.id_index.contains_key(&node.id) {
            return Err(GraphError::DuplicateNode(node.id));
        }
        let id = node.id;
        let idx = self.graph.add_node(node);
        self.id_index.insert(id, idx);
        self.dirty = true;
        Ok(idx)
    }

    /// Remove a node together with every edge touching it.
    pub fn remove_node(&mut self, id: NodeId) -> Option<Node> {
        let idx = self.id_index.remove(&id)?;
        self.edges.retain(|e| !e.touches(id));
        let removed = self.graph.remove_node(idx);
        self.links.retain(|_, link| self.graph.edge_weight(*link).is_some());
        self.dirty = true;
        removed
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.id_index.get(&id).map(|idx| &self.graph[*idx])
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let idx = self.id_index.get(&id).copied()?;
        self.dirty = true;
        Some(&mut self.graph[idx])
    }

    /// Nodes in insertion (paint) order.
    pub fn nodes(&self) -> impl DoubleEndedIterator<Item = &Node> + '_ {
        self.graph.node_indices().map(|idx| &self.graph[idx])
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    // ── Edges ──

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    fn edge_mut(&mut self, id: EdgeId) -> Result<&mut Edge, GraphError> {
        self.edges
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(GraphError::UnknownEdge(id))
    }

    /// All edges in insertion order, speculative ones included.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Add an edge. Its source and (if resolved) target must reference
    /// existing nodes and valid anchors.
    pub fn add_edge(&mut self, edge: Edge) -> Result<(), GraphError> {
        if self.edge(edge.id).is_some() {
            return Err(GraphError::DuplicateEdge(edge.id));
        }
        if let Some(source) = edge.source {
            self.check_endpoint(source)?;
        }
        if let Some(target) = edge.target.endpoint() {
            self.check_endpoint(target)?;
        }
        self.link(&edge);
        self.edges.push(edge);
        self.dirty = true;
        Ok(())
    }

    /// Point an edge at a new target (snapped anchor or floating point).
    pub fn set_edge_target(&mut self, id: EdgeId, target: EdgeTarget) -> Result<(), GraphError> {
        if let Some(ep) = target.endpoint() {
            self.check_endpoint(ep)?;
        }
        self.unlink(id);
        let edge = self.edge_mut(id)?;
        edge.target = target;
        let edge = edge.clone();
        self.link(&edge);
        self.dirty = true;
        Ok(())
    }

    pub fn remove_edge(&mut self, id: EdgeId) -> Result<Edge, GraphError> {
        let pos = self
            .edges
            .iter()
            .position(|e| e.id == id)
            .ok_or(GraphError::UnknownEdge(id))?;
        self.unlink(id);
        self.dirty = true;
        Ok(self.edges.remove(pos))
    }

    /// Every edge touching `node`, speculative edges dragged out of it included.
    pub fn edges_of(&self, node: NodeId) -> Vec<&Edge> {
        self.edges.iter().filter(|e| e.touches(node)).collect()
    }

    /// Resolved edges going from `source` to `target`, in that direction.
    pub fn edges_connecting(&self, source: NodeId, target: NodeId) -> Vec<EdgeId> {
        let (Some(a), Some(b)) = (self.id_index.get(&source), self.id_index.get(&target)) else {
            return Vec::new();
        };
        self.graph
            .edges_connecting(*a, *b)
            .map(|e| *e.weight())
            .collect()
    }

    fn check_endpoint(&self, ep: Endpoint) -> Result<(), GraphError> {
        self.node(ep.node)
            .ok_or(GraphError::UnknownNode(ep.node))?
            .check_anchor(ep.anchor)
    }

    fn link(&mut self, edge: &Edge) {
        if edge.flags.drag {
            return;
        }
        if let (Some(s), Some(t)) = (edge.source_node(), edge.target_node())
            && let (Some(a), Some(b)) = (self.id_index.get(&s), self.id_index.get(&t))
        {
            let link = self.graph.add_edge(*a, *b, edge.id);
            self.links.insert(edge.id, link);
        }
    }

    fn unlink(&mut self, id: EdgeId) {
        if let Some(link) = self.links.remove(&id) {
            self.graph.remove_edge(link);
        }
    }

    // ── Item state ──

    pub fn node_state(&self, id: NodeId, state: NodeState) -> bool {
        self.node(id).is_some_and(|n| n.flags.get(state))
    }

    /// Set a node flag. Returns whether the value changed.
    pub fn set_node_state(
        &mut self,
        id: NodeId,
        state: NodeState,
        value: bool,
    ) -> Result<bool, GraphError> {
        let idx = *self.id_index.get(&id).ok_or(GraphError::UnknownNode(id))?;
        let node = &mut self.graph[idx];
        let previous = node
            .flags
            .set(state, value)
            .ok_or(GraphError::AnchorOutOfRange {
                node: id,
                index: match state {
                    NodeState::ActiveAnchor(i) => i,
                    _ => 0,
                },
                count: node.anchor_count(),
            })?;
        let changed = previous != value;
        if changed {
            log::trace!("node {id} {state} = {value}");
            self.dirty = true;
        }
        Ok(changed)
    }

    pub fn edge_state(&self, id: EdgeId, state: EdgeState) -> bool {
        self.edge(id).is_some_and(|e| e.flags.get(state))
    }

    /// Set an edge flag. Returns whether the value changed.
    pub fn set_edge_state(
        &mut self,
        id: EdgeId,
        state: EdgeState,
        value: bool,
    ) -> Result<bool, GraphError> {
        let edge = self.edge_mut(id)?;
        let changed = edge.flags.set(state, value) != value;
        if changed {
            log::trace!("edge {id} {state} = {value}");
            let edge = (state == EdgeState::Drag).then(|| edge.clone());
            self.dirty = true;
            if let Some(edge) = edge {
                self.unlink(id);
                self.link(&edge);
            }
        }
        Ok(changed)
    }

    // ── Painting ──

    /// Whether anything changed since the last repaint.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Force the next repaint, for changes the model cannot see
    /// (overlays drawn on top of the diagram).
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Flush pending visual changes. A no-op when nothing changed, so
    /// batches of mutations coalesce into one repaint.
    pub fn repaint(&mut self) {
        if self.dirty {
            self.dirty = false;
            self.paint_generation += 1;
            log::trace!("repaint #{}", self.paint_generation);
        }
    }

    pub fn paint_generation(&self) -> u64 {
        self.paint_generation
    }
}
