//! Behavior registration table.
//!
//! The registry maps behavior names to constructed instances and routes
//! events to the behaviors of one graph mode, in registration order.

use crate::behaviors::{ActiveEdge, Behavior, GraphMode, HoverAnchor, Overlay};
use crate::config::{ConfigError, EditorConfig};
use crate::drag_edge::DragAddEdge;
use crate::drag_node::DragAddNode;
use crate::engine::GraphMutation;
use crate::input::PointerEvent;
use flow_core::facade::GraphModel;
use std::collections::BTreeMap;

/// Names of every behavior this crate provides.
pub const BUILTIN_BEHAVIORS: &[&str] = &[
    HoverAnchor::NAME,
    ActiveEdge::NAME,
    DragAddEdge::NAME,
    DragAddNode::NAME,
];

/// Construct a built-in behavior by name, configured from `config`.
pub fn create_behavior(name: &str, config: &EditorConfig) -> Result<Box<dyn Behavior>, ConfigError> {
    let behavior: Box<dyn Behavior> = match name {
        HoverAnchor::NAME => Box::new(HoverAnchor::new()),
        ActiveEdge::NAME => Box::new(ActiveEdge::new()),
        DragAddEdge::NAME => Box::new(DragAddEdge::new(config.drag_add_edge.clone())),
        DragAddNode::NAME => Box::new(DragAddNode::new()),
        other => return Err(ConfigError::UnknownBehavior(other.to_string())),
    };
    Ok(behavior)
}

#[derive(Default)]
pub struct BehaviorRegistry {
    behaviors: Vec<Box<dyn Behavior>>,
}

impl BehaviorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every built-in behavior with default configuration.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(HoverAnchor::new()));
        registry.register(Box::new(ActiveEdge::new()));
        registry.register(Box::new(DragAddEdge::default()));
        registry.register(Box::new(DragAddNode::new()));
        registry
    }

    /// The behaviors named in `config`, in the order listed.
    pub fn from_config(config: &EditorConfig) -> Result<Self, ConfigError> {
        let mut registry = Self::new();
        for name in &config.behaviors {
            registry.register(create_behavior(name, config)?);
        }
        Ok(registry)
    }

    /// Add a behavior. One registered under the same name is replaced and
    /// returned.
    pub fn register(&mut self, behavior: Box<dyn Behavior>) -> Option<Box<dyn Behavior>> {
        match self.position(behavior.name()) {
            Some(i) => Some(std::mem::replace(&mut self.behaviors[i], behavior)),
            None => {
                log::debug!("registered behavior {}", behavior.name());
                self.behaviors.push(behavior);
                None
            }
        }
    }

    pub fn unregister(&mut self, name: &str) -> Option<Box<dyn Behavior>> {
        let i = self.position(name)?;
        Some(self.behaviors.remove(i))
    }

    pub fn get(&self, name: &str) -> Option<&dyn Behavior> {
        self.behaviors
            .iter()
            .find(|b| b.name() == name)
            .map(|b| &**b)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut (dyn Behavior + 'static)> {
        self.behaviors
            .iter_mut()
            .find(|b| b.name() == name)
            .map(|b| &mut **b)
    }

    pub fn downcast_ref<T: Behavior>(&self, name: &str) -> Option<&T> {
        self.get(name)?.as_any().downcast_ref()
    }

    pub fn downcast_mut<T: Behavior>(&mut self, name: &str) -> Option<&mut T> {
        self.get_mut(name)?.as_any_mut().downcast_mut()
    }

    /// Registered names in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.behaviors.iter().map(|b| b.name()).collect()
    }

    /// Registered names grouped by graph mode.
    pub fn by_mode(&self) -> BTreeMap<GraphMode, Vec<&'static str>> {
        let mut modes: BTreeMap<GraphMode, Vec<&'static str>> = BTreeMap::new();
        for b in &self.behaviors {
            modes.entry(b.mode()).or_default().push(b.name());
        }
        modes
    }

    pub fn len(&self) -> usize {
        self.behaviors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.behaviors.is_empty()
    }

    /// Deliver an event to every behavior of `mode` subscribed to it.
    pub fn handle(
        &mut self,
        mode: GraphMode,
        event: &PointerEvent,
        graph: Option<&dyn GraphModel>,
    ) -> Vec<GraphMutation> {
        let mut mutations = Vec::new();
        for b in self.behaviors.iter_mut().filter(|b| b.mode() == mode) {
            if b.events().iter().any(|f| f.matches(event)) {
                mutations.extend(b.handle(event, graph));
            }
        }
        mutations
    }

    /// Reset every behavior of `mode`.
    pub fn reset(&mut self, mode: GraphMode, graph: Option<&dyn GraphModel>) -> Vec<GraphMutation> {
        self.behaviors
            .iter_mut()
            .filter(|b| b.mode() == mode)
            .flat_map(|b| b.reset(graph))
            .collect()
    }

    /// Overlays of the behaviors of `mode`.
    pub fn overlays(&self, mode: GraphMode) -> Vec<Overlay> {
        self.behaviors
            .iter()
            .filter(|b| b.mode() == mode)
            .filter_map(|b| b.overlay())
            .collect()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.behaviors.iter().position(|b| b.name() == name)
    }
}
