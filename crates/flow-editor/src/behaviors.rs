//! Behavior system for pointer interactions.
//!
//! A behavior translates [`PointerEvent`]s into [`GraphMutation`]s. It holds
//! its own interaction state, reads the diagram through the
//! [`GraphModel`] façade, and never mutates it directly: the engine applies
//! the returned mutations as one batch.
//!
//! | Behavior        | Mode      | Events                                  |
//! |-----------------|-----------|-----------------------------------------|
//! | `hover-anchor`  | default   | `mouseenter`, `mousemove`, `mouseleave` |
//! | `active-edge`   | default   | `edge:mouseenter`, `edge:mouseleave`    |
//! | `drag-add-edge` | default   | `node:mousedown`, `mousemove`, `mouseup`|
//! | `drag-add-node` | add-node  | `canvas:mouseenter`, `mousemove`, `mouseup` |

use crate::engine::GraphMutation;
use crate::input::{EventFilter, EventKind, PointerEvent};
use flow_core::facade::GraphModel;
use flow_core::id::{EdgeId, NodeId};
use flow_core::model::Bounds;
use flow_core::state::{EdgeState, NodeState};
use smallvec::SmallVec;
use std::any::Any;

/// Which set of behaviors receives events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum GraphMode {
    #[default]
    Default,
    /// Placing a new node from a template.
    AddNode,
}

/// Transient shapes a behavior wants drawn above the diagram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Overlay {
    /// Ghost rectangle following the pointer while a node is being placed.
    Delegate(Bounds),
}

/// Trait for behaviors that handle pointer events and produce mutations.
pub trait Behavior: Any + Send {
    /// Registration name (`"drag-add-edge"`).
    fn name(&self) -> &'static str;

    fn mode(&self) -> GraphMode {
        GraphMode::Default
    }

    /// Events this behavior subscribes to.
    fn events(&self) -> &'static [EventFilter];

    /// Handle a subscribed event. A `None` graph means no diagram is bound;
    /// handlers then do nothing.
    fn handle(&mut self, event: &PointerEvent, graph: Option<&dyn GraphModel>)
    -> Vec<GraphMutation>;

    /// Abandon any interaction in progress, returning the mutations that
    /// undo its transient effects.
    fn reset(&mut self, _graph: Option<&dyn GraphModel>) -> Vec<GraphMutation> {
        Vec::new()
    }

    fn overlay(&self) -> Option<Overlay> {
        None
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

// ─── Hover Anchor ────────────────────────────────────────────────────────

/// Highlights the anchor under the pointer by toggling the node's
/// `ActiveAnchor(i)` flag.
#[derive(Debug, Default)]
pub struct HoverAnchor;

impl HoverAnchor {
    pub const NAME: &'static str = "hover-anchor";

    const EVENTS: &'static [EventFilter] = &[
        EventFilter::any(EventKind::Enter),
        EventFilter::any(EventKind::Move),
        EventFilter::any(EventKind::Leave),
    ];

    pub fn new() -> Self {
        Self
    }

    /// Only anchor hit-regions are of interest; node bodies, edges and the
    /// canvas are not.
    pub fn should_activate(event: &PointerEvent) -> bool {
        event.target.is_anchor()
    }
}

impl Behavior for HoverAnchor {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn events(&self) -> &'static [EventFilter] {
        Self::EVENTS
    }

    fn handle(
        &mut self,
        event: &PointerEvent,
        graph: Option<&dyn GraphModel>,
    ) -> Vec<GraphMutation> {
        let Some(graph) = graph else {
            return Vec::new();
        };
        if !Self::should_activate(event) {
            return Vec::new();
        }
        let Some(ep) = event.target.anchor() else {
            return Vec::new();
        };
        if !graph
            .node(ep.node)
            .is_some_and(|n| ep.anchor < n.anchor_count())
        {
            return Vec::new();
        }

        let state = NodeState::ActiveAnchor(ep.anchor);
        let value = match event.kind {
            EventKind::Enter => true,
            // Enter can be missed when an anchor appears under a resting
            // pointer; the first move over it catches up.
            EventKind::Move if !graph.node_state(ep.node, state) => true,
            EventKind::Leave => false,
            _ => return Vec::new(),
        };
        vec![GraphMutation::SetNodeState {
            id: ep.node,
            state,
            value,
        }]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ─── Active Edge ─────────────────────────────────────────────────────────

/// Highlights a hovered edge together with its two end nodes.
#[derive(Debug, Default)]
pub struct ActiveEdge {
    /// What the last enter switched on, so leave switches off exactly that.
    lit: Option<Lit>,
}

#[derive(Debug, Clone)]
struct Lit {
    edge: EdgeId,
    edge_was_off: bool,
    nodes: SmallVec<[NodeId; 2]>,
}

impl ActiveEdge {
    pub const NAME: &'static str = "active-edge";

    const EVENTS: &'static [EventFilter] = &[
        EventFilter::edge(EventKind::Enter),
        EventFilter::edge(EventKind::Leave),
    ];

    pub fn new() -> Self {
        Self::default()
    }

    /// Edges still being dragged out (floating target) are never highlighted.
    pub fn should_activate(event: &PointerEvent, graph: &dyn GraphModel) -> bool {
        event
            .target
            .edge()
            .and_then(|id| graph.edge(id))
            .is_some_and(|e| e.source.is_some() && !e.target.is_floating())
    }

    /// The edge currently highlighted, if any.
    pub fn highlighted(&self) -> Option<EdgeId> {
        self.lit.as_ref().map(|l| l.edge)
    }

    fn switch_off(lit: Lit) -> Vec<GraphMutation> {
        let mut mutations = Vec::with_capacity(3);
        if lit.edge_was_off {
            mutations.push(GraphMutation::SetEdgeState {
                id: lit.edge,
                state: EdgeState::Active,
                value: false,
            });
        }
        mutations.extend(lit.nodes.into_iter().map(|id| GraphMutation::SetNodeState {
            id,
            state: NodeState::Active,
            value: false,
        }));
        mutations
    }
}

impl Behavior for ActiveEdge {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn events(&self) -> &'static [EventFilter] {
        Self::EVENTS
    }

    fn handle(
        &mut self,
        event: &PointerEvent,
        graph: Option<&dyn GraphModel>,
    ) -> Vec<GraphMutation> {
        let Some(graph) = graph else {
            return Vec::new();
        };
        let Some(edge_id) = event.target.edge() else {
            return Vec::new();
        };

        match event.kind {
            EventKind::Enter => {
                if !Self::should_activate(event, graph) {
                    return Vec::new();
                }
                let Some(edge) = graph.edge(edge_id) else {
                    return Vec::new();
                };
                // A leave can go missing if the edge was removed under the
                // pointer; never keep two highlights.
                let mut mutations = self.lit.take().map(Self::switch_off).unwrap_or_default();

                let edge_was_off = !graph.edge_state(edge_id, EdgeState::Active);
                if edge_was_off {
                    mutations.push(GraphMutation::SetEdgeState {
                        id: edge_id,
                        state: EdgeState::Active,
                        value: true,
                    });
                }
                let mut nodes = SmallVec::new();
                for id in [edge.source_node(), edge.target_node()].into_iter().flatten() {
                    if nodes.contains(&id) || graph.node_state(id, NodeState::Active) {
                        continue;
                    }
                    nodes.push(id);
                    mutations.push(GraphMutation::SetNodeState {
                        id,
                        state: NodeState::Active,
                        value: true,
                    });
                }
                self.lit = Some(Lit {
                    edge: edge_id,
                    edge_was_off,
                    nodes,
                });
                mutations
            }
            EventKind::Leave => match self.lit.take() {
                Some(lit) if lit.edge == edge_id => Self::switch_off(lit),
                other => {
                    self.lit = other;
                    Vec::new()
                }
            },
            _ => Vec::new(),
        }
    }

    fn reset(&mut self, _graph: Option<&dyn GraphModel>) -> Vec<GraphMutation> {
        self.lit.take().map(Self::switch_off).unwrap_or_default()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::apply_mutation;
    use flow_core::model::*;
    use pretty_assertions::assert_eq;

    fn graph() -> FlowGraph {
        let mut g = FlowGraph::new();
        g.add_node(Node::new(NodeId::intern("bh_a"), 100.0, 100.0))
            .unwrap();
        g.add_node(Node::new(NodeId::intern("bh_b"), 300.0, 100.0))
            .unwrap();
        g
    }

    fn run(behavior: &mut dyn Behavior, graph: &mut FlowGraph, event: PointerEvent) -> usize {
        let mutations = behavior.handle(&event, Some(&*graph));
        let n = mutations.len();
        for m in mutations {
            apply_mutation(graph, m).unwrap();
        }
        n
    }

    #[test]
    fn hover_anchor_toggles_indexed_flag() {
        let mut g = graph();
        let a = NodeId::intern("bh_a");
        let target = HitTarget::Anchor { node: a, index: 2 };
        let mut hover = HoverAnchor::new();

        run(&mut hover, &mut g, PointerEvent::enter(130.0, 100.0, target));
        assert!(g.node_state(a, NodeState::ActiveAnchor(2)));
        assert!(!g.node_state(a, NodeState::ActiveAnchor(1)));

        run(&mut hover, &mut g, PointerEvent::leave(130.0, 90.0, target));
        assert!(!g.node_state(a, NodeState::ActiveAnchor(2)));
    }

    #[test]
    fn hover_anchor_ignores_node_body() {
        let mut g = graph();
        let a = NodeId::intern("bh_a");
        let mut hover = HoverAnchor::new();
        let n = run(
            &mut hover,
            &mut g,
            PointerEvent::enter(130.0, 130.0, HitTarget::Node(a)),
        );
        assert_eq!(n, 0);
    }

    #[test]
    fn hover_anchor_move_only_sets_once() {
        let mut g = graph();
        let a = NodeId::intern("bh_a");
        let target = HitTarget::Anchor { node: a, index: 0 };
        let mut hover = HoverAnchor::new();
        assert_eq!(run(&mut hover, &mut g, PointerEvent::moved(100.0, 130.0, target)), 1);
        assert_eq!(run(&mut hover, &mut g, PointerEvent::moved(101.0, 130.0, target)), 0);
    }

    #[test]
    fn hover_anchor_out_of_range_is_ignored() {
        let g = graph();
        let a = NodeId::intern("bh_a");
        let mut hover = HoverAnchor::new();
        let event = PointerEvent::enter(0.0, 0.0, HitTarget::Anchor { node: a, index: 9 });
        assert!(hover.handle(&event, Some(&g)).is_empty());
    }

    #[test]
    fn behaviors_without_graph_do_nothing() {
        let a = NodeId::intern("bh_a");
        let anchor = PointerEvent::enter(0.0, 0.0, HitTarget::Anchor { node: a, index: 0 });
        let edge = PointerEvent::enter(0.0, 0.0, HitTarget::Edge(EdgeId::intern("bh_e")));
        assert!(HoverAnchor::new().handle(&anchor, None).is_empty());
        assert!(ActiveEdge::new().handle(&edge, None).is_empty());
    }

    #[test]
    fn active_edge_lights_edge_and_ends() {
        let mut g = graph();
        let a = NodeId::intern("bh_a");
        let b = NodeId::intern("bh_b");
        let id = EdgeId::generate();
        g.add_edge(Edge::new(id, Endpoint::new(a, 1), Endpoint::new(b, 0)))
            .unwrap();
        let mut active = ActiveEdge::new();

        run(&mut active, &mut g, PointerEvent::enter(230.0, 130.0, HitTarget::Edge(id)));
        assert!(g.edge_state(id, EdgeState::Active));
        assert!(g.node_state(a, NodeState::Active));
        assert!(g.node_state(b, NodeState::Active));
        assert_eq!(active.highlighted(), Some(id));

        run(&mut active, &mut g, PointerEvent::leave(230.0, 140.0, HitTarget::Edge(id)));
        assert!(!g.edge_state(id, EdgeState::Active));
        assert!(!g.node_state(a, NodeState::Active));
        assert!(!g.node_state(b, NodeState::Active));
        assert_eq!(active.highlighted(), None);
    }

    #[test]
    fn active_edge_skips_floating_edges() {
        let mut g = graph();
        let a = NodeId::intern("bh_a");
        let id = EdgeId::generate();
        g.add_edge(Edge::speculative(
            id,
            EdgeType::Line,
            Endpoint::new(a, 1),
            Point::new(250.0, 130.0),
        ))
        .unwrap();
        let mut active = ActiveEdge::new();
        let n = run(&mut active, &mut g, PointerEvent::enter(200.0, 130.0, HitTarget::Edge(id)));
        assert_eq!(n, 0);
        assert!(!g.node_state(a, NodeState::Active));
    }

    #[test]
    fn active_edge_leaves_prior_highlights_alone() {
        let mut g = graph();
        let a = NodeId::intern("bh_a");
        let b = NodeId::intern("bh_b");
        let id = EdgeId::generate();
        g.add_edge(Edge::new(id, Endpoint::new(a, 1), Endpoint::new(b, 0)))
            .unwrap();
        g.set_node_state(a, NodeState::Active, true).unwrap();
        let mut active = ActiveEdge::new();

        run(&mut active, &mut g, PointerEvent::enter(230.0, 130.0, HitTarget::Edge(id)));
        run(&mut active, &mut g, PointerEvent::leave(230.0, 140.0, HitTarget::Edge(id)));
        assert!(g.node_state(a, NodeState::Active));
        assert!(!g.node_state(b, NodeState::Active));
    }

    #[test]
    fn active_edge_reset_switches_off() {
        let mut g = graph();
        let a = NodeId::intern("bh_a");
        let b = NodeId::intern("bh_b");
        let id = EdgeId::generate();
        g.add_edge(Edge::new(id, Endpoint::new(a, 1), Endpoint::new(b, 0)))
            .unwrap();
        let mut active = ActiveEdge::new();
        run(&mut active, &mut g, PointerEvent::enter(230.0, 130.0, HitTarget::Edge(id)));
        for m in active.reset(Some(&g)) {
            apply_mutation(&mut g, m).unwrap();
        }
        assert!(!g.edge_state(id, EdgeState::Active));
        assert!(!g.node_state(a, NodeState::Active));
    }
}
