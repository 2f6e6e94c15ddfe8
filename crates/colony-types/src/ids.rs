//! Type-safe identifier wrappers around host-assigned strings.
//!
//! The host names every object it exposes. Agents are keyed by their
//! display name (`harvester_1042`), world objects by an opaque id, and
//! locales by their region name. Wrapping each in its own newtype keeps a
//! structure id from ever being passed where an agent name is expected.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Generates a newtype wrapper around [`String`] with standard derives.
macro_rules! define_name {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[serde(transparent)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub String);

        impl $name {
            /// Create an identifier from anything string-like.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Borrow the inner string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

define_name! {
    /// Unique name of a live agent; also the key of its persisted record.
    AgentName
}

define_name! {
    /// Opaque identifier of a world object (source, structure, site, hostile).
    ObjectId
}

define_name! {
    /// Name of a locale (the 50x50 region an object lives in).
    LocaleName
}
