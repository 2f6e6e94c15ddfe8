//! Per-agent decision logic for the colony.
//!
//! This crate holds everything that decides what a single agent does in a
//! tick, plus the persisted-state plumbing it needs. It reads the world
//! through `colony-world`'s [`WorldView`](colony_world::WorldView) and
//! submits intents through [`IntentSink`](colony_world::IntentSink); it
//! never performs I/O of its own beyond the optional JSON file helpers on
//! [`InMemoryStore`].
//!
//! # Modules
//!
//! - [`error`] -- Evaluation and store errors ([`AgentError`], [`StoreError`])
//! - [`memory`] -- Persisted record store ([`MemoryStore`], [`InMemoryStore`])
//! - [`reconcile`] -- Removal of records left by dead agents ([`reconcile()`])
//! - [`roles`] -- Role state machines ([`evaluate`], [`AgentDecision`])
//! - [`targeting`] -- Shared target selectors and existence predicates

pub mod error;
pub mod memory;
pub mod reconcile;
pub mod roles;
pub mod targeting;

// Re-export primary types at crate root for convenience.
pub use error::{AgentError, StoreError};
pub use memory::{InMemoryStore, MemoryStore};
pub use reconcile::reconcile;
pub use roles::{
    ActionKind, AgentDecision, Attempt, BehaviorConfig, DEFAULT_GUARD_RADIUS, evaluate,
};
pub use targeting::DEFAULT_ATTACK_MARKER;
