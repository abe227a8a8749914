pub mod error;
pub mod facade;
pub mod id;
pub mod model;
pub mod state;

pub use error::GraphError;
pub use facade::GraphModel;
pub use id::{EdgeId, NodeId};
pub use model::*;
pub use state::{EdgeFlags, EdgeState, NodeFlags, NodeState};

// Re-export petgraph types so downstream crates don't need a direct dependency
pub use petgraph::graph::NodeIndex;
