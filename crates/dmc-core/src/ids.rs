//! Typed identifiers.
//!
//! Plain integer newtypes so an agent id can never be passed where a
//! selection id is expected.  `Display` prints the type name
//! (`AgentId(7)`), which is what log lines and error messages show.

use std::fmt;

macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Placeholder for "not assigned yet".
            pub const INVALID: $name = $name(<$inner>::MAX);

            #[inline]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl From<$inner> for $name {
            fn from(raw: $inner) -> Self {
                $name(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

typed_id! {
    /// Identity of a traveller.
    pub struct AgentId(u32);
}

typed_id! {
    /// Sequence number of one audited selection (one trip, or one whole
    /// tour when it is substituted).  Allocated by the choice engine.
    pub struct SelectionId(u64);
}
