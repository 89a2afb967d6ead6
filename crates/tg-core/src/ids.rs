//! Strongly typed, zero-cost identifier wrappers.
//!
//! Builders hand these out sequentially and later stages consume them
//! directly, so no stage ever has to parse an engine-facing string id to
//! find the entity it refers to.  The inner integer is `pub` for direct
//! indexing into the topology's `Vec`s, but callers should prefer the
//! `.index()` helpers for clarity.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of a node (interior or boundary) in a topology.
    pub struct NodeId(u32);
}

typed_id! {
    /// Index of a directed edge in a topology.
    pub struct EdgeId(u32);
}

typed_id! {
    /// Control-phase group of a connection.  Group numbering starts at 1,
    /// matching the engine's connection format.
    pub struct SignalGroup(u8);
}

impl SignalGroup {
    /// The single group every movement shares under shared signalling.
    pub const SHARED: SignalGroup = SignalGroup(1);
}
