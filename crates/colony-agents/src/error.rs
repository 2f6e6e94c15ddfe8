//! Error types for the colony-agents crate.
//!
//! Per-agent evaluation returns [`AgentError`] for anything that leaves the
//! agent idle for the tick. Transient host rejections are not errors; they
//! arrive as [`colony_types::ActionOutcome`] values.

use colony_types::{AgentName, AgentState, Role, UnknownTag};

/// Errors that can occur while evaluating one agent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AgentError {
    /// The persisted record carries a role or state tag that does not parse.
    #[error("agent {agent}: {source}")]
    UnknownTag {
        /// The agent whose record is malformed.
        agent: AgentName,
        /// The offending tag.
        #[source]
        source: UnknownTag,
    },

    /// The persisted state is not legal for the persisted role.
    #[error("agent {agent}: state {state} is not valid for role {role}")]
    InvalidStateForRole {
        /// The agent whose record is inconsistent.
        agent: AgentName,
        /// The persisted role.
        role: Role,
        /// The persisted state.
        state: AgentState,
    },

    /// The agent stands in a locale the snapshot does not cover.
    #[error("agent {agent}: locale {locale} is not in the snapshot")]
    MissingLocale {
        /// The agent.
        agent: AgentName,
        /// The uncovered locale.
        locale: String,
    },
}

/// Errors raised by a persisted-state store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Failed to read or write the memory file.
    #[error("memory file I/O failed: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Memory JSON did not match the record layout.
    #[error("memory JSON is malformed: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}
