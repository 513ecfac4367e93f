//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Agents and populations are identified by strongly-typed IDs to prevent
//! accidental mixing at compile time. Both are minted by the environment
//! collaborator at episode reset; they are stable across steps within an
//! episode but carry no meaning across episodes. All IDs use UUID v7
//! (time-ordered) so per-episode maps iterate in creation order.
//!
//! The `new()` constructors here exist for cases where app-side generation
//! is needed (e.g. tests, synthetic episodes).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for an agent within one episode.
    ///
    /// Not guaranteed stable across episodes; never reuse one after the
    /// episode it was minted for has ended.
    AgentId
}

define_id! {
    /// Unique identifier for a population (team) of agents within one episode.
    ///
    /// Derived each step from environment-supplied info; never persisted
    /// across episodes.
    PopulationId
}
