//! Type-safe identifier wrappers around [`String`].
//!
//! Entities and territories share one node namespace in the working graph,
//! so both are addressed by [`NodeId`]. The [`EntityId`] and [`TerritoryId`]
//! aliases exist to make signatures say which kind of node is expected.
//! Scenario data uses short human-readable ids (`C001`, `T001`), which is why
//! these wrap strings rather than UUIDs.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Generates a newtype wrapper around [`String`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub String);

        impl $name {
            /// Create an identifier from anything string-like.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Return the inner [`String`] value.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Identifier for any node in the simulation graph (entity or territory).
    NodeId
}

define_id! {
    /// Identifier for a sovereign state carrying a finance record.
    SovereignId
}

/// Identifier of a social-class node.
pub type EntityId = NodeId;

/// Identifier of a territory node.
pub type TerritoryId = NodeId;
