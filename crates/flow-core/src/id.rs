use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global string interner for node and edge IDs.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Shared counter so generated node and edge IDs never collide.
static COUNTER: AtomicU64 = AtomicU64::new(0);

macro_rules! interned_id {
    ($(#[$meta:meta])* $name:ident, $sigil:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(Spur);

        impl $name {
            /// Intern a string as an ID, or return the existing one.
            pub fn intern(s: &str) -> Self {
                Self(INTERNER.get_or_intern(s))
            }

            /// Resolve back to a string slice.
            pub fn as_str(&self) -> &str {
                INTERNER.resolve(&self.0)
            }

            /// Generate a unique ID with a prefix (e.g. `edge_3`).
            pub fn with_prefix(prefix: &str) -> Self {
                let n = COUNTER.fetch_add(1, Ordering::Relaxed);
                Self::intern(&format!("{prefix}_{n}"))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $sigil, self.as_str())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $sigil, self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Ok(Self::intern(&s))
            }
        }
    };
}

interned_id!(
    /// Interned identifier of a diagram node. 4 bytes, Copy, O(1) Eq/Hash.
    NodeId,
    "@"
);

interned_id!(
    /// Interned identifier of an edge.
    EdgeId,
    "~"
);

impl NodeId {
    /// Fresh ID for a node dropped onto the canvas.
    pub fn generate() -> Self {
        Self::with_prefix("node")
    }
}

impl EdgeId {
    /// Fresh ID for an edge created by dragging.
    pub fn generate() -> Self {
        Self::with_prefix("edge")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_roundtrip() {
        let a = NodeId::intern("start");
        let b = NodeId::intern("start");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "start");
        assert_eq!(a.to_string(), "@start");
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = EdgeId::generate();
        let b = EdgeId::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("edge_"));
    }

    #[test]
    fn node_and_edge_counters_do_not_collide() {
        let n = NodeId::with_prefix("item");
        let e = EdgeId::with_prefix("item");
        assert_ne!(n.as_str(), e.as_str());
    }
}
