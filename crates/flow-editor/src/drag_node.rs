//! Node placement by dragging a template onto the canvas.
//!
//! Runs in [`GraphMode::AddNode`]. Once armed with a [`NodeTemplate`], a ghost
//! rectangle (the *delegate*) follows the pointer over the canvas; releasing
//! drops a node built from the template at the pointer. The delegate is
//! behavior state drawn as an overlay, never part of the diagram.

use crate::behaviors::{Behavior, GraphMode, Overlay};
use crate::config::NodeTemplate;
use crate::engine::GraphMutation;
use crate::input::{EventFilter, EventKind, PointerEvent};
use flow_core::facade::GraphModel;
use flow_core::id::NodeId;
use flow_core::model::Bounds;
use std::any::Any;

#[derive(Debug, Default)]
pub struct DragAddNode {
    template: Option<NodeTemplate>,
    delegate: Option<Bounds>,
}

impl DragAddNode {
    pub const NAME: &'static str = "drag-add-node";

    const EVENTS: &'static [EventFilter] = &[
        EventFilter::canvas(EventKind::Enter),
        EventFilter::any(EventKind::Move),
        EventFilter::any(EventKind::Up),
    ];

    pub fn new() -> Self {
        Self::default()
    }

    /// Prepare to place one node built from `template`.
    pub fn arm(&mut self, template: NodeTemplate) {
        self.template = Some(template);
        self.delegate = None;
    }

    pub fn is_armed(&self) -> bool {
        self.template.is_some()
    }

    pub fn delegate(&self) -> Option<Bounds> {
        self.delegate
    }

    /// Drawn where the node would land if released here.
    fn delegate_at(template: &NodeTemplate, x: f32, y: f32) -> Bounds {
        let (x, y) = template.origin_at(x, y);
        Bounds {
            x,
            y,
            width: template.width,
            height: template.height,
        }
    }
}

impl Behavior for DragAddNode {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn mode(&self) -> GraphMode {
        GraphMode::AddNode
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
        let Some(template) = &self.template else {
            return Vec::new();
        };

        match event.kind {
            // A pointer already resting on the canvas never sends an enter,
            // so the first move shows the delegate too.
            EventKind::Enter | EventKind::Move => {
                self.delegate = Some(Self::delegate_at(template, event.x, event.y));
                vec![GraphMutation::Repaint]
            }
            EventKind::Up => {
                if self.delegate.take().is_none() {
                    return Vec::new();
                }
                let node = template.instantiate(fresh_node_id(graph), event.x, event.y);
                log::debug!("placing {} at ({}, {})", node.id, node.x, node.y);
                self.template = None;
                vec![
                    GraphMutation::AddNode {
                        node: Box::new(node),
                    },
                    GraphMutation::Repaint,
                ]
            }
            EventKind::Down | EventKind::Leave => Vec::new(),
        }
    }

    fn reset(&mut self, _graph: Option<&dyn GraphModel>) -> Vec<GraphMutation> {
        self.template = None;
        match self.delegate.take() {
            Some(_) => vec![GraphMutation::Repaint],
            None => Vec::new(),
        }
    }

    fn overlay(&self) -> Option<Overlay> {
        self.delegate.map(Overlay::Delegate)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn fresh_node_id(graph: &dyn GraphModel) -> NodeId {
    loop {
        let id = NodeId::generate();
        if graph.node(id).is_none() {
            return id;
        }
    }
}
