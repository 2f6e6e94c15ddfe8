//! World read surface, intent mutation surface, and in-memory snapshot.
//!
//! The decision core never talks to the host directly. It reads through
//! [`WorldView`] and writes through [`IntentSink`]; this crate defines both
//! traits and ships the in-memory implementations used by the tick binary
//! and by tests.
//!
//! # Modules
//!
//! - [`error`] -- Error types for snapshot loading ([`WorldError`]).
//! - [`snapshot`] -- [`Snapshot`], a JSON-deserializable [`WorldView`].
//! - [`sink`] -- [`IntentSink`] and the recording [`IntentLog`].
//! - [`view`] -- [`WorldView`] plus colony-wide aggregates
//!   ([`spawn_pool`], [`extension_count`]).

pub mod error;
pub mod sink;
pub mod snapshot;
pub mod view;

// Re-export primary types at crate root.
pub use error::WorldError;
pub use sink::{ADJACENT_RANGE, IntentLog, IntentSink, LoggedIntent, WORK_RANGE};
pub use snapshot::{LocaleSnapshot, Snapshot, TerrainGrid};
pub use view::{WorldView, extension_count, spawn_pool};
