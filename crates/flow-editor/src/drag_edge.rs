//! Edge creation by dragging out of an anchor.
//!
//! ```text
//!   Idle ──press on anchor──▶ Dragging ──release on valid anchor──▶ Idle (committed)
//!                               │  ▲
//!                               │  └── move: snap to anchor / float at pointer
//!                               └──────release elsewhere, self-loop, duplicate──▶ Idle (cancelled)
//! ```
//!
//! The press adds a *speculative* edge whose target follows the pointer and
//! marks every other node as an eligible drop target. Whatever way the
//! session ends, those marks are cleared; a cancelled session also removes
//! the speculative edge, leaving the diagram exactly as it was.

use crate::behaviors::Behavior;
use crate::config::DragAddEdgeConfig;
use crate::engine::GraphMutation;
use crate::input::{EventFilter, EventKind, PointerEvent};
use flow_core::facade::GraphModel;
use flow_core::id::{EdgeId, NodeId};
use flow_core::model::{Edge, EdgeTarget, Endpoint};
use flow_core::state::{EdgeState, NodeState};
use smallvec::smallvec;
use std::any::Any;

/// The edge being dragged out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSession {
    /// The speculative edge.
    pub edge: EdgeId,
    pub source: NodeId,
    pub anchor: usize,
}

#[derive(Debug, Default)]
pub struct DragAddEdge {
    config: DragAddEdgeConfig,
    session: Option<DragSession>,
}

impl DragAddEdge {
    pub const NAME: &'static str = "drag-add-edge";

    const EVENTS: &'static [EventFilter] = &[
        EventFilter::node(EventKind::Down),
        EventFilter::any(EventKind::Move),
        EventFilter::any(EventKind::Up),
    ];

    pub fn new(config: DragAddEdgeConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    pub fn config(&self) -> &DragAddEdgeConfig {
        &self.config
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Abort the session in progress, if any. Returns the mutations that
    /// remove the speculative edge and clear the drop-target marks.
    pub fn cancel(&mut self, graph: &dyn GraphModel) -> Vec<GraphMutation> {
        match self.session.take() {
            Some(session) => Self::unwind(session, graph, "aborted"),
            None => Vec::new(),
        }
    }

    fn on_down(&mut self, event: &PointerEvent, graph: &dyn GraphModel) -> Vec<GraphMutation> {
        if let Some(session) = &self.session {
            log::debug!("press ignored: already dragging {}", session.edge);
            return Vec::new();
        }
        let Some(source) = event.target.anchor() else {
            return Vec::new();
        };
        if !is_anchor_of(graph, source) {
            return Vec::new();
        }

        let edge = fresh_edge_id(graph);
        let mut mutations: Vec<GraphMutation> = graph
            .node_ids()
            .into_iter()
            .map(|id| GraphMutation::SetNodeState {
                id,
                state: if id == source.node {
                    NodeState::AddingSource
                } else {
                    NodeState::AddingEdge
                },
                value: true,
            })
            .collect();
        mutations.push(GraphMutation::AddEdge {
            edge: Box::new(Edge::speculative(
                edge,
                self.config.edge_type,
                source,
                event.position(),
            )),
        });

        log::debug!("drag start: {edge} from {source}");
        self.session = Some(DragSession {
            edge,
            source: source.node,
            anchor: source.anchor,
        });
        mutations
    }

    fn on_move(&mut self, event: &PointerEvent, graph: &dyn GraphModel) -> Vec<GraphMutation> {
        let Some(session) = self.session else {
            return Vec::new();
        };
        let Some(edge) = graph.edge(session.edge).filter(|e| e.flags.drag) else {
            // Removed or committed behind our back; nothing left to drag.
            log::warn!("speculative edge {} vanished mid-drag", session.edge);
            self.session = None;
            return vec![clear_marks()];
        };

        let target = match event.target.anchor() {
            Some(ep) if ep.node != session.source && is_anchor_of(graph, ep) => {
                EdgeTarget::Node(ep)
            }
            _ => EdgeTarget::Point(event.position()),
        };
        if edge.target == target {
            return Vec::new();
        }
        if let EdgeTarget::Node(ep) = target {
            log::trace!("{} snapped to {ep}", session.edge);
        }
        vec![GraphMutation::UpdateEdgeTarget {
            id: session.edge,
            target,
        }]
    }

    fn on_up(&mut self, event: &PointerEvent, graph: &dyn GraphModel) -> Vec<GraphMutation> {
        let Some(session) = self.session.take() else {
            return Vec::new();
        };
        if !still_dragging(graph, session) {
            log::warn!("speculative edge {} vanished before release", session.edge);
            return vec![clear_marks()];
        }
        let Some(target) = event.target.anchor().filter(|ep| is_anchor_of(graph, *ep)) else {
            return Self::unwind(session, graph, "released off an anchor");
        };
        if target.node == session.source {
            return Self::unwind(session, graph, "self-loop");
        }
        if !self.config.allow_multi_edge && connects(graph, session, target.node) {
            return Self::unwind(session, graph, "duplicate edge");
        }

        log::debug!(
            "drag commit: {} {}#{} -> {target}",
            session.edge,
            session.source,
            session.anchor
        );
        vec![
            GraphMutation::UpdateEdgeTarget {
                id: session.edge,
                target: EdgeTarget::Node(target),
            },
            GraphMutation::SetEdgeState {
                id: session.edge,
                state: EdgeState::Drag,
                value: false,
            },
            clear_marks(),
        ]
    }

    /// Only an edge still flagged `drag` is ours to remove.
    fn unwind(session: DragSession, graph: &dyn GraphModel, reason: &str) -> Vec<GraphMutation> {
        log::debug!("drag cancel: {} ({reason})", session.edge);
        let mut mutations = Vec::with_capacity(2);
        if still_dragging(graph, session) {
            mutations.push(GraphMutation::RemoveEdge { id: session.edge });
        } else {
            log::warn!("not removing {}: no longer a speculative edge", session.edge);
        }
        mutations.push(clear_marks());
        mutations
    }
}

impl Behavior for DragAddEdge {
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
        match event.kind {
            EventKind::Down => self.on_down(event, graph),
            EventKind::Move => self.on_move(event, graph),
            EventKind::Up => self.on_up(event, graph),
            EventKind::Enter | EventKind::Leave => Vec::new(),
        }
    }

    fn reset(&mut self, graph: Option<&dyn GraphModel>) -> Vec<GraphMutation> {
        match graph {
            Some(graph) => self.cancel(graph),
            None => {
                self.session = None;
                Vec::new()
            }
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn clear_marks() -> GraphMutation {
    GraphMutation::ClearNodeStates {
        states: smallvec![NodeState::AddingEdge, NodeState::AddingSource],
    }
}

/// Generated ids can collide with ids the host interned itself.
fn fresh_edge_id(graph: &dyn GraphModel) -> EdgeId {
    loop {
        let id = EdgeId::generate();
        if graph.edge(id).is_none() {
            return id;
        }
    }
}

fn still_dragging(graph: &dyn GraphModel, session: DragSession) -> bool {
    graph.edge(session.edge).is_some_and(|e| e.flags.drag)
}

fn is_anchor_of(graph: &dyn GraphModel, ep: Endpoint) -> bool {
    graph
        .node(ep.node)
        .is_some_and(|n| ep.anchor < n.anchor_count())
}

/// Whether another edge already goes from the session's source to `target`.
/// Direction matters and anchors do not.
fn connects(graph: &dyn GraphModel, session: DragSession, target: NodeId) -> bool {
    graph.edges_of(session.source).iter().any(|e| {
        e.id != session.edge
            && e.source_node() == Some(session.source)
            && e.target_node() == Some(target)
    })
}
