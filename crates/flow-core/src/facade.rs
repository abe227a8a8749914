//! The graph model façade consumed by pointer behaviors.
//!
//! Behaviors only need a narrow view of the diagram: enumerate nodes, read
//! and write item state flags, add / retarget / remove edges, and request a
//! repaint. [`GraphModel`] is that view; [`FlowGraph`] is the in-process
//! implementation, and a host canvas can provide its own.

use crate::error::GraphError;
use crate::id::{EdgeId, NodeId};
use crate::model::{Edge, EdgeTarget, FlowGraph, Node};
use crate::state::{EdgeState, NodeState};

pub trait GraphModel {
    /// All node IDs in paint order.
    fn node_ids(&self) -> Vec<NodeId>;

    fn node(&self, id: NodeId) -> Option<&Node>;

    fn edge(&self, id: EdgeId) -> Option<&Edge>;

    /// Edges touching `node`, in either direction.
    fn edges_of(&self, node: NodeId) -> Vec<&Edge>;

    fn node_state(&self, id: NodeId, state: NodeState) -> bool;

    fn edge_state(&self, id: EdgeId, state: EdgeState) -> bool;

    /// Returns whether the flag changed.
    fn set_node_state(&mut self, id: NodeId, state: NodeState, value: bool)
    -> Result<bool, GraphError>;

    /// Returns whether the flag changed.
    fn set_edge_state(&mut self, id: EdgeId, state: EdgeState, value: bool)
    -> Result<bool, GraphError>;

    fn add_node(&mut self, node: Node) -> Result<(), GraphError>;

    fn add_edge(&mut self, edge: Edge) -> Result<(), GraphError>;

    fn update_edge_target(&mut self, id: EdgeId, target: EdgeTarget) -> Result<(), GraphError>;

    fn remove_edge(&mut self, id: EdgeId) -> Result<Edge, GraphError>;

    fn repaint(&mut self);
}

impl GraphModel for FlowGraph {
    fn node_ids(&self) -> Vec<NodeId> {
        self.nodes().map(|n| n.id).collect()
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        FlowGraph::node(self, id)
    }

    fn edge(&self, id: EdgeId) -> Option<&Edge> {
        FlowGraph::edge(self, id)
    }

    fn edges_of(&self, node: NodeId) -> Vec<&Edge> {
        FlowGraph::edges_of(self, node)
    }

    fn node_state(&self, id: NodeId, state: NodeState) -> bool {
        FlowGraph::node_state(self, id, state)
    }

    fn edge_state(&self, id: EdgeId, state: EdgeState) -> bool {
        FlowGraph::edge_state(self, id, state)
    }

    fn set_node_state(
        &mut self,
        id: NodeId,
        state: NodeState,
        value: bool,
    ) -> Result<bool, GraphError> {
        FlowGraph::set_node_state(self, id, state, value)
    }

    fn set_edge_state(
        &mut self,
        id: EdgeId,
        state: EdgeState,
        value: bool,
    ) -> Result<bool, GraphError> {
        FlowGraph::set_edge_state(self, id, state, value)
    }

    fn add_node(&mut self, node: Node) -> Result<(), GraphError> {
        FlowGraph::add_node(self, node).map(|_| ())
    }

    fn add_edge(&mut self, edge: Edge) -> Result<(), GraphError> {
        FlowGraph::add_edge(self, edge)
    }

    fn update_edge_target(&mut self, id: EdgeId, target: EdgeTarget) -> Result<(), GraphError> {
        self.set_edge_target(id, target)
    }

    fn remove_edge(&mut self, id: EdgeId) -> Result<Edge, GraphError> {
        FlowGraph::remove_edge(self, id)
    }

    fn repaint(&mut self) {
        FlowGraph::repaint(self)
    }
}
