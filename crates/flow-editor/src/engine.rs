//! Editor engine: the host side of the behavior system.
//!
//! The engine owns the diagram model and the behavior registry. Raw pointer
//! positions come in, get hit-tested against the model, and are turned into
//! [`PointerEvent`]s. Whenever the element under the pointer changes, the
//! engine synthesizes a `Leave` for the old element and an `Enter` for the
//! new one before delivering the event itself.
//!
//! Each event is routed to the behaviors of the current [`GraphMode`] whose
//! filters match. Their mutations are applied as one batch, followed by a
//! single repaint.

use crate::behaviors::{GraphMode, Overlay};
use crate::config::{ConfigError, EditorConfig, NodeTemplate};
use crate::drag_node::DragAddNode;
use crate::input::{EventKind, PointerEvent};
use crate::registry::BehaviorRegistry;
use flow_core::error::GraphError;
use flow_core::facade::GraphModel;
use flow_core::id::{EdgeId, NodeId};
use flow_core::model::*;
use flow_core::state::{EdgeState, NodeState};
use flow_render::{HitConfig, hit_test};
use smallvec::SmallVec;

/// A change to the diagram requested by a behavior.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphMutation {
    SetNodeState {
        id: NodeId,
        state: NodeState,
        value: bool,
    },
    SetEdgeState {
        id: EdgeId,
        state: EdgeState,
        value: bool,
    },
    /// Set the given flags to `false` on every node.
    ClearNodeStates {
        states: SmallVec<[NodeState; 2]>,
    },
    AddNode {
        node: Box<Node>,
    },
    AddEdge {
        edge: Box<Edge>,
    },
    UpdateEdgeTarget {
        id: EdgeId,
        target: EdgeTarget,
    },
    RemoveEdge {
        id: EdgeId,
    },
    /// Repaint even though the model did not change (transient overlays).
    Repaint,
}

/// Apply one mutation through the graph model façade.
pub fn apply_mutation(graph: &mut dyn GraphModel, mutation: GraphMutation) -> Result<(), GraphError> {
    match mutation {
        GraphMutation::SetNodeState { id, state, value } => {
            graph.set_node_state(id, state, value).map(|_| ())
        }
        GraphMutation::SetEdgeState { id, state, value } => {
            graph.set_edge_state(id, state, value).map(|_| ())
        }
        GraphMutation::ClearNodeStates { states } => {
            for id in graph.node_ids() {
                for state in &states {
                    graph.set_node_state(id, *state, false)?;
                }
            }
            Ok(())
        }
        GraphMutation::AddNode { node } => graph.add_node(*node),
        GraphMutation::AddEdge { edge } => graph.add_edge(*edge),
        GraphMutation::UpdateEdgeTarget { id, target } => graph.update_edge_target(id, target),
        GraphMutation::RemoveEdge { id } => graph.remove_edge(id).map(|_| ()),
        GraphMutation::Repaint => {
            graph.repaint();
            Ok(())
        }
    }
}

/// Owns the diagram and the behaviors that edit it.
pub struct EditorEngine {
    /// `None` while no diagram is bound; every handler is then a no-op.
    graph: Option<FlowGraph>,
    registry: BehaviorRegistry,
    mode: GraphMode,
    hit: HitConfig,
    /// Element under the pointer as of the last pointer event.
    hovered: HitTarget,
}

impl EditorEngine {
    /// Create an engine editing `graph` with the behaviors named in `config`.
    pub fn new(graph: FlowGraph, config: &EditorConfig) -> Result<Self, ConfigError> {
        let mut engine = Self::detached(config)?;
        engine.graph = Some(graph);
        Ok(engine)
    }

    /// Create an engine with no diagram bound.
    pub fn detached(config: &EditorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            graph: None,
            registry: BehaviorRegistry::from_config(config)?,
            mode: GraphMode::Default,
            hit: config.hit,
            hovered: HitTarget::Canvas,
        })
    }

    pub fn graph(&self) -> Option<&FlowGraph> {
        self.graph.as_ref()
    }

    pub fn graph_mut(&mut self) -> Option<&mut FlowGraph> {
        self.graph.as_mut()
    }

    /// Bind a diagram, returning the previously bound one.
    pub fn attach(&mut self, graph: FlowGraph) -> Option<FlowGraph> {
        let previous = self.detach();
        self.graph = Some(graph);
        previous
    }

    /// Unbind the diagram. In-flight interactions are unwound first so the
    /// returned diagram carries no transient state.
    pub fn detach(&mut self) -> Option<FlowGraph> {
        let graph = self.graph.as_ref().map(|g| g as &dyn GraphModel);
        let unwind = self.registry.reset(self.mode, graph);
        self.apply(unwind);
        self.hovered = HitTarget::Canvas;
        self.graph.take()
    }

    pub fn registry(&self) -> &BehaviorRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut BehaviorRegistry {
        &mut self.registry
    }

    pub fn mode(&self) -> GraphMode {
        self.mode
    }

    /// Switch graph mode. Behaviors of the mode being left abandon any
    /// interaction in progress.
    pub fn set_mode(&mut self, mode: GraphMode) {
        if mode == self.mode {
            return;
        }
        log::debug!("graph mode {:?} -> {:?}", self.mode, mode);
        let graph = self.graph.as_ref().map(|g| g as &dyn GraphModel);
        let unwind = self.registry.reset(self.mode, graph);
        self.mode = mode;
        self.apply(unwind);
    }

    /// Arm the drag-add-node behavior with `template` and enter add-node mode.
    /// Returns `false` if that behavior is not registered.
    pub fn start_add_node(&mut self, template: NodeTemplate) -> bool {
        let Some(behavior) = self
            .registry
            .downcast_mut::<DragAddNode>(DragAddNode::NAME)
        else {
            return false;
        };
        behavior.arm(template);
        self.set_mode(GraphMode::AddNode);
        true
    }

    /// Transient shapes that behaviors want drawn over the diagram.
    pub fn overlays(&self) -> Vec<Overlay> {
        self.registry.overlays(self.mode)
    }

    /// The element under the pointer as of the last pointer event.
    pub fn hovered(&self) -> HitTarget {
        self.hovered
    }

    // ─── Raw pointer input ───────────────────────────────────────────────

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.pointer(EventKind::Down, x, y);
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.pointer(EventKind::Move, x, y);
    }

    pub fn pointer_up(&mut self, x: f32, y: f32) {
        self.pointer(EventKind::Up, x, y);
    }

    /// The pointer entered the canvas element.
    pub fn pointer_enter_canvas(&mut self, x: f32, y: f32) {
        self.hovered = HitTarget::Canvas;
        self.dispatch(PointerEvent::enter(x, y, HitTarget::Canvas));
        let target = self.hit_test(x, y);
        self.track_hover(target, x, y);
    }

    /// The pointer left the canvas element.
    pub fn pointer_leave_canvas(&mut self, x: f32, y: f32) {
        self.track_hover(HitTarget::Canvas, x, y);
        self.dispatch(PointerEvent::leave(x, y, HitTarget::Canvas));
    }

    fn pointer(&mut self, kind: EventKind, x: f32, y: f32) {
        let target = self.hit_test(x, y);
        self.track_hover(target, x, y);
        self.dispatch(PointerEvent::new(kind, x, y, target));
    }

    fn hit_test(&self, x: f32, y: f32) -> HitTarget {
        self.graph
            .as_ref()
            .map_or(HitTarget::Canvas, |g| hit_test(g, &self.hit, x, y))
    }

    fn track_hover(&mut self, target: HitTarget, x: f32, y: f32) {
        if target == self.hovered {
            return;
        }
        let previous = std::mem::replace(&mut self.hovered, target);
        self.dispatch(PointerEvent::leave(x, y, previous));
        self.dispatch(PointerEvent::enter(x, y, target));
    }

    // ─── Dispatch ────────────────────────────────────────────────────────

    /// Deliver one event to the behaviors of the current mode and apply
    /// the resulting mutations. Returns the number of mutations applied.
    pub fn dispatch(&mut self, event: PointerEvent) -> usize {
        let graph = self.graph.as_ref().map(|g| g as &dyn GraphModel);
        let mutations = self.registry.handle(self.mode, &event, graph);
        self.apply(mutations)
    }

    fn apply(&mut self, mutations: Vec<GraphMutation>) -> usize {
        if mutations.is_empty() {
            return 0;
        }
        let Some(graph) = self.graph.as_mut() else {
            return 0;
        };

        let mut applied = 0;
        let mut force_repaint = false;
        let mut added_node = false;
        for mutation in mutations {
            match mutation {
                GraphMutation::Repaint => force_repaint = true,
                mutation => {
                    let is_add_node = matches!(mutation, GraphMutation::AddNode { .. });
                    match apply_mutation(graph, mutation) {
                        Ok(()) => {
                            applied += 1;
                            added_node |= is_add_node;
                        }
                        Err(err) => log::warn!("dropping mutation: {err}"),
                    }
                }
            }
        }
        if force_repaint {
            graph.mark_dirty();
        }
        graph.repaint();

        if added_node && self.mode == GraphMode::AddNode {
            self.set_mode(GraphMode::Default);
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn engine() -> EditorEngine {
        let mut graph = FlowGraph::new();
        graph
            .add_node(Node::new(NodeId::intern("eng_a"), 100.0, 100.0))
            .unwrap();
        graph
            .add_node(Node::new(NodeId::intern("eng_b"), 300.0, 100.0))
            .unwrap();
        EditorEngine::new(graph, &EditorConfig::default()).unwrap()
    }

    #[test]
    fn clear_node_states_reaches_every_node() {
        let mut graph = FlowGraph::new();
        let a = NodeId::intern("clr_a");
        let b = NodeId::intern("clr_b");
        graph.add_node(Node::new(a, 0.0, 0.0)).unwrap();
        graph.add_node(Node::new(b, 100.0, 0.0)).unwrap();
        graph.set_node_state(a, NodeState::AddingSource, true).unwrap();
        graph.set_node_state(b, NodeState::AddingEdge, true).unwrap();
        graph.set_node_state(b, NodeState::Selected, true).unwrap();

        apply_mutation(
            &mut graph,
            GraphMutation::ClearNodeStates {
                states: SmallVec::from_slice(&[NodeState::AddingEdge, NodeState::AddingSource]),
            },
        )
        .unwrap();

        assert!(!graph.node_state(a, NodeState::AddingSource));
        assert!(!graph.node_state(b, NodeState::AddingEdge));
        assert!(graph.node_state(b, NodeState::Selected));
    }

    #[test]
    fn hover_changes_synthesize_enter_and_leave() {
        let mut engine = engine();
        let a = NodeId::intern("eng_a");

        engine.pointer_move(160.0, 130.0);
        assert_eq!(engine.hovered(), HitTarget::Anchor { node: a, index: 1 });
        let graph = engine.graph().unwrap();
        assert!(graph.node_state(a, NodeState::ActiveAnchor(1)));

        engine.pointer_move(50.0, 50.0);
        assert_eq!(engine.hovered(), HitTarget::Canvas);
        let graph = engine.graph().unwrap();
        assert!(!graph.node_state(a, NodeState::ActiveAnchor(1)));
    }

    #[test]
    fn one_repaint_per_event() {
        let mut engine = engine();
        let before = engine.graph().unwrap().paint_generation();
        // Press on A's right anchor: hover enter, then the drag starts.
        // Each dispatched event repaints at most once.
        engine.pointer_down(160.0, 130.0);
        let after = engine.graph().unwrap().paint_generation();
        assert!(after - before <= 3, "repaints: {}", after - before);
        assert!(after > before);
    }

    #[test]
    fn detached_engine_ignores_input() {
        let mut engine = EditorEngine::detached(&EditorConfig::default()).unwrap();
        engine.pointer_down(160.0, 130.0);
        engine.pointer_move(300.0, 130.0);
        engine.pointer_up(300.0, 130.0);
        assert!(engine.graph().is_none());
        assert_eq!(engine.dispatch(PointerEvent::up(0.0, 0.0, HitTarget::Canvas)), 0);
    }

    #[test]
    fn detach_unwinds_in_flight_drag() {
        let mut engine = engine();
        engine.pointer_down(160.0, 130.0);
        assert_eq!(engine.graph().unwrap().edge_count(), 1);

        let graph = engine.detach().unwrap();
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.nodes().all(|n| !n.flags.adding_edge && !n.flags.adding_source));
    }

    #[test]
    fn bad_mutations_are_dropped_not_fatal() {
        let mut engine = engine();
        let ghost = NodeId::intern("eng_ghost");
        let applied = engine.apply(vec![
            GraphMutation::SetNodeState {
                id: ghost,
                state: NodeState::Active,
                value: true,
            },
            GraphMutation::SetNodeState {
                id: NodeId::intern("eng_a"),
                state: NodeState::Active,
                value: true,
            },
        ]);
        assert_eq!(applied, 1);
    }
}
