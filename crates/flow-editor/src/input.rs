//! Pointer event abstraction.
//!
//! A [`PointerEvent`] is a raw pointer action already resolved against the
//! canvas: it carries the canvas coordinates and the [`HitTarget`] under
//! the pointer. Behaviors subscribe to events through [`EventFilter`]s,
//! written the way a host canvas names them (`node:mousedown`, `mousemove`).

use flow_core::model::{HitTarget, ItemKind, Point};
use std::fmt;

/// What the pointer did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Down,
    Move,
    Up,
    /// Pointer entered a hit-region.
    Enter,
    /// Pointer left a hit-region.
    Leave,
}

impl EventKind {
    /// Host-facing event name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Down => "mousedown",
            Self::Move => "mousemove",
            Self::Up => "mouseup",
            Self::Enter => "mouseenter",
            Self::Leave => "mouseleave",
        }
    }
}

/// A pointer event delivered to behaviors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: EventKind,
    pub x: f32,
    pub y: f32,
    /// The element under the pointer. For `Leave`, the element being left.
    pub target: HitTarget,
}

impl PointerEvent {
    pub fn new(kind: EventKind, x: f32, y: f32, target: HitTarget) -> Self {
        Self { kind, x, y, target }
    }

    pub fn down(x: f32, y: f32, target: HitTarget) -> Self {
        Self::new(EventKind::Down, x, y, target)
    }

    pub fn moved(x: f32, y: f32, target: HitTarget) -> Self {
        Self::new(EventKind::Move, x, y, target)
    }

    pub fn up(x: f32, y: f32, target: HitTarget) -> Self {
        Self::new(EventKind::Up, x, y, target)
    }

    pub fn enter(x: f32, y: f32, target: HitTarget) -> Self {
        Self::new(EventKind::Enter, x, y, target)
    }

    pub fn leave(x: f32, y: f32, target: HitTarget) -> Self {
        Self::new(EventKind::Leave, x, y, target)
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Subscription to one kind of pointer event, optionally scoped to the
/// kind of item under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventFilter {
    pub scope: Option<ItemKind>,
    pub kind: EventKind,
}

impl EventFilter {
    /// Any target (`mousemove`).
    pub const fn any(kind: EventKind) -> Self {
        Self { scope: None, kind }
    }

    /// Only node targets, anchors included (`node:mousedown`).
    pub const fn node(kind: EventKind) -> Self {
        Self {
            scope: Some(ItemKind::Node),
            kind,
        }
    }

    /// Only edge targets (`edge:mouseenter`).
    pub const fn edge(kind: EventKind) -> Self {
        Self {
            scope: Some(ItemKind::Edge),
            kind,
        }
    }

    /// Only empty canvas (`canvas:mouseenter`).
    pub const fn canvas(kind: EventKind) -> Self {
        Self {
            scope: Some(ItemKind::Canvas),
            kind,
        }
    }

    pub fn matches(&self, event: &PointerEvent) -> bool {
        self.kind == event.kind && self.scope.is_none_or(|s| s == event.target.item_kind())
    }
}

impl fmt::Display for EventFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scope {
            None => f.write_str(self.kind.as_str()),
            Some(ItemKind::Canvas) => write!(f, "canvas:{}", self.kind.as_str()),
            Some(ItemKind::Node) => write!(f, "node:{}", self.kind.as_str()),
            Some(ItemKind::Edge) => write!(f, "edge:{}", self.kind.as_str()),
        }
    }
}
