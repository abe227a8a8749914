//! Anchor presentation derived from node state flags.
//!
//! Anchors are hidden on an idle node. They appear when the node is hovered,
//! selected, or taking part in an edge drag (as source or eligible target),
//! and the anchor under the pointer is drawn enlarged.

use flow_core::model::{Node, Point};
use smallvec::SmallVec;

/// Radius of an anchor dot at rest.
pub const ANCHOR_RADIUS: f32 = 4.0;

/// Radius of the anchor dot under the pointer.
pub const ANCHOR_RADIUS_ACTIVE: f32 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorVisual {
    pub index: usize,
    pub position: Point,
    pub visible: bool,
    pub highlighted: bool,
    pub radius: f32,
}

/// Resolve how each anchor of `node` should be drawn.
pub fn anchor_visuals(node: &Node) -> SmallVec<[AnchorVisual; 4]> {
    let flags = &node.flags;
    let shown = flags.adding_edge
        || flags.adding_source
        || flags.active
        || flags.selected
        || flags.any_anchor_active();

    (0..node.anchor_count())
        .filter_map(|index| {
            let position = node.anchor_position(index)?;
            let highlighted = flags.active_anchors.get(index).copied().unwrap_or(false);
            Some(AnchorVisual {
                index,
                position,
                visible: shown,
                highlighted,
                radius: if highlighted {
                    ANCHOR_RADIUS_ACTIVE
                } else {
                    ANCHOR_RADIUS
                },
            })
        })
        .collect()
}
