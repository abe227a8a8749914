pub mod anchor;
pub mod hit;

pub use anchor::{AnchorVisual, anchor_visuals};
pub use hit::{HitConfig, hit_test};
