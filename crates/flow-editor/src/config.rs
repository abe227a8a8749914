//! Editor configuration.
//!
//! All sections default sensibly, so a host only spells out what it
//! overrides. The JSON form uses the host's camelCase keys:
//!
//! ```json
//! { "dragAddEdge": { "edgeType": "polyline", "allowMultiEdge": false } }
//! ```

use crate::registry::BUILTIN_BEHAVIORS;
use flow_core::id::NodeId;
use flow_core::model::{EdgeType, Node};
use flow_render::HitConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid editor config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown behavior: {0:?}")]
    UnknownBehavior(String),
}

/// Options of the drag-add-edge behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DragAddEdgeConfig {
    /// Shape of edges created by dragging.
    pub edge_type: EdgeType,
    /// Allow more than one edge from the same source node to the same
    /// target node (same direction).
    pub allow_multi_edge: bool,
}

impl Default for DragAddEdgeConfig {
    fn default() -> Self {
        Self {
            edge_type: EdgeType::Line,
            allow_multi_edge: true,
        }
    }
}

/// Where a dropped node lands relative to the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodePlacement {
    /// Node centred on the pointer.
    #[default]
    Center,
    /// Node's top-left corner at the pointer.
    TopLeft,
}

/// The node a drag-add-node gesture will create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeTemplate {
    pub width: f32,
    pub height: f32,
    pub label: Option<String>,
    /// Custom anchor points; the default four midpoints when absent.
    pub anchor_points: Option<Vec<(f32, f32)>>,
    pub placement: NodePlacement,
}

impl Default for NodeTemplate {
    fn default() -> Self {
        Self {
            width: flow_core::model::DEFAULT_NODE_SIZE,
            height: flow_core::model::DEFAULT_NODE_SIZE,
            label: None,
            anchor_points: None,
            placement: NodePlacement::Center,
        }
    }
}

impl NodeTemplate {
    /// Top-left corner of a node dropped at (px, py).
    pub fn origin_at(&self, px: f32, py: f32) -> (f32, f32) {
        match self.placement {
            NodePlacement::Center => (px - self.width / 2.0, py - self.height / 2.0),
            NodePlacement::TopLeft => (px, py),
        }
    }

    /// Build a node from this template dropped at (px, py).
    pub fn instantiate(&self, id: NodeId, px: f32, py: f32) -> Node {
        let (x, y) = self.origin_at(px, py);
        let mut node = Node::new(id, x, y).with_size(self.width, self.height);
        node.label = self.label.clone();
        if let Some(points) = &self.anchor_points {
            node.set_anchor_points(points);
        }
        node
    }
}

/// Top-level editor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Behaviors to register, by name.
    pub behaviors: Vec<String>,
    pub drag_add_edge: DragAddEdgeConfig,
    pub hit: HitConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            behaviors: BUILTIN_BEHAVIORS.iter().map(|s| s.to_string()).collect(),
            drag_add_edge: DragAddEdgeConfig::default(),
            hit: HitConfig::default(),
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self
            .behaviors
            .iter()
            .find(|name| !BUILTIN_BEHAVIORS.contains(&name.as_str()))
        {
            Some(unknown) => Err(ConfigError::UnknownBehavior(unknown.clone())),
            None => Ok(()),
        }
    }
}
