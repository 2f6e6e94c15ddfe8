//! Shared type definitions for the colony decision core.
//!
//! This crate is the single source of truth for the data model shared by
//! the world surface, the role state machines, and the spawn scheduler.
//! Host-facing types (intents, roles, states, outcomes) flow to
//! `TypeScript` via `ts-rs` so the host runtime can consume intents
//! without hand-written bindings.
//!
//! # Modules
//!
//! - [`ids`] -- String newtypes for agent names, object ids, locale names
//! - [`enums`] -- Roles, states, structure kinds, body parts, terrain, outcomes
//! - [`objects`] -- World objects and their capability traits
//! - [`intents`] -- Mutation requests and spawn requests
//! - [`record`] -- The open-schema persisted agent record

pub mod enums;
pub mod ids;
pub mod intents;
pub mod objects;
pub mod record;

// Re-export all public types at crate root for convenience.
pub use enums::{ActionOutcome, AgentState, BodyPart, Role, StructureKind, Terrain};
pub use ids::{AgentName, LocaleName, ObjectId};
pub use intents::{Intent, SpawnRequest};
pub use objects::{
    Agent, ConstructionSite, Damageable, EnergySource, HostileAgent, LOCALE_SIZE, Marker,
    Position, Positioned, ResourceContainer, Store, Structure,
};
pub use record::{AgentRecord, UnknownTag};
