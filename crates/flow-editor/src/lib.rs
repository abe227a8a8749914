pub mod behaviors;
pub mod config;
pub mod drag_edge;
pub mod drag_node;
pub mod engine;
pub mod input;
pub mod registry;

pub use behaviors::{ActiveEdge, Behavior, GraphMode, HoverAnchor, Overlay};
pub use config::{ConfigError, DragAddEdgeConfig, EditorConfig, NodePlacement, NodeTemplate};
pub use drag_edge::{DragAddEdge, DragSession};
pub use drag_node::DragAddNode;
pub use engine::{EditorEngine, GraphMutation, apply_mutation};
pub use input::{EventFilter, EventKind, PointerEvent};
pub use registry::{BUILTIN_BEHAVIORS, BehaviorRegistry, create_behavior};
