//! Item state flags.
//!
//! Every node and edge carries a small set of named booleans that drive its
//! visual presentation (hover highlight, drop-target markers, …). They are
//! independent of the committed graph structure. The flag set is closed:
//! [`NodeState`] and [`EdgeState`] name every flag that exists, and the
//! per-anchor hover flags are a boolean array sized to the node's anchors.
//!
//! The string forms (`"addingEdge"`, `"activeAnchor2"`) match the names a
//! host canvas uses for its item states.

use crate::error::GraphError;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

// ─── State names ─────────────────────────────────────────────────────────

/// A named boolean flag on a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeState {
    Selected,
    /// Hover highlight (e.g. an endpoint of a hovered edge).
    Active,
    /// Eligible drop target while an edge is being dragged.
    AddingEdge,
    /// Origin node of the edge being dragged.
    AddingSource,
    /// Pointer is over the anchor with this index.
    ActiveAnchor(usize),
}

/// A named boolean flag on an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeState {
    Selected,
    Active,
    /// Edge is still being dragged out and not yet committed.
    Drag,
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Selected => f.write_str("selected"),
            Self::Active => f.write_str("active"),
            Self::AddingEdge => f.write_str("addingEdge"),
            Self::AddingSource => f.write_str("addingSource"),
            Self::ActiveAnchor(i) => write!(f, "activeAnchor{i}"),
        }
    }
}

impl FromStr for NodeState {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "selected" => Ok(Self::Selected),
            "active" => Ok(Self::Active),
            "addingEdge" => Ok(Self::AddingEdge),
            "addingSource" => Ok(Self::AddingSource),
            _ => s
                .strip_prefix("activeAnchor")
                .and_then(|n| n.parse::<usize>().ok())
                .map(Self::ActiveAnchor)
                .ok_or_else(|| GraphError::UnknownState(s.to_string())),
        }
    }
}

impl fmt::Display for EdgeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Selected => "selected",
            Self::Active => "active",
            Self::Drag => "drag",
        })
    }
}

impl FromStr for EdgeState {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "selected" => Ok(Self::Selected),
            "active" => Ok(Self::Active),
            "drag" => Ok(Self::Drag),
            _ => Err(GraphError::UnknownState(s.to_string())),
        }
    }
}

// ─── Flag storage ────────────────────────────────────────────────────────

/// Flag storage for one node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeFlags {
    pub selected: bool,
    pub active: bool,
    pub adding_edge: bool,
    pub adding_source: bool,
    /// One entry per anchor point, in anchor order.
    pub active_anchors: SmallVec<[bool; 4]>,
}

impl NodeFlags {
    pub fn with_anchor_count(count: usize) -> Self {
        Self {
            active_anchors: SmallVec::from_elem(false, count),
            ..Default::default()
        }
    }

    /// Read a flag. Anchor indices past the end read as `false`.
    pub fn get(&self, state: NodeState) -> bool {
        match state {
            NodeState::Selected => self.selected,
            NodeState::Active => self.active,
            NodeState::AddingEdge => self.adding_edge,
            NodeState::AddingSource => self.adding_source,
            NodeState::ActiveAnchor(i) => self.active_anchors.get(i).copied().unwrap_or(false),
        }
    }

    /// Write a flag, returning its previous value.
    /// Returns `None` when the flag does not exist on this node
    /// (anchor index out of range).
    pub fn set(&mut self, state: NodeState, value: bool) -> Option<bool> {
        let slot = match state {
            NodeState::Selected => &mut self.selected,
            NodeState::Active => &mut self.active,
            NodeState::AddingEdge => &mut self.adding_edge,
            NodeState::AddingSource => &mut self.adding_source,
            NodeState::ActiveAnchor(i) => self.active_anchors.get_mut(i)?,
        };
        Some(std::mem::replace(slot, value))
    }

    /// Resize the anchor flag array for a new anchor configuration.
    /// All anchor flags reset to `false`.
    pub fn reset_anchors(&mut self, count: usize) {
        self.active_anchors = SmallVec::from_elem(false, count);
    }

    /// Whether any anchor is currently hovered.
    pub fn any_anchor_active(&self) -> bool {
        self.active_anchors.iter().any(|a| *a)
    }
}

/// Flag storage for one edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeFlags {
    pub selected: bool,
    pub active: bool,
    pub drag: bool,
}

impl EdgeFlags {
    pub fn get(&self, state: EdgeState) -> bool {
        match state {
            EdgeState::Selected => self.selected,
            EdgeState::Active => self.active,
            EdgeState::Drag => self.drag,
        }
    }

    /// Write a flag, returning its previous value.
    pub fn set(&mut self, state: EdgeState, value: bool) -> bool {
        let slot = match state {
            EdgeState::Selected => &mut self.selected,
            EdgeState::Active => &mut self.active,
            EdgeState::Drag => &mut self.drag,
        };
        std::mem::replace(slot, value)
    }
}
