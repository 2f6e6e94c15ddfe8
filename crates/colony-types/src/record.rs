//! The persisted per-agent record.
//!
//! The record is open-schema: `role` and `state` are the only fields the
//! core reads, and both are stored as plain lowercase strings. Any other
//! field a host or an earlier version wrote is carried through untouched
//! in [`AgentRecord::scratch`].

use serde::{Deserialize, Serialize};

use crate::enums::{AgentState, Role};

/// A role or state tag that does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnknownTag {
    /// Unrecognized role tag.
    #[error("unknown role tag: {0:?}")]
    Role(String),

    /// Unrecognized state tag.
    #[error("unknown state tag: {0:?}")]
    State(String),
}

/// Persisted state of one agent, keyed by agent name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentRecord {
    /// Role tag, absent until the agent is first evaluated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// State tag, absent until the agent is first evaluated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    /// Role-specific scratch fields; preserved, never validated.
    #[serde(flatten)]
    pub scratch: serde_json::Map<String, serde_json::Value>,
}

impl AgentRecord {
    /// A record holding exactly a role and a state.
    pub fn new(role: Role, state: AgentState) -> Self {
        Self {
            role: Some(role.as_str().to_owned()),
            state: Some(state.as_str().to_owned()),
            scratch: serde_json::Map::new(),
        }
    }

    /// Parse the role tag. `Ok(None)` when absent.
    pub fn role(&self) -> Result<Option<Role>, UnknownTag> {
        self.role.as_deref().map(str::parse).transpose()
    }

    /// Parse the state tag. `Ok(None)` when absent.
    pub fn state(&self) -> Result<Option<AgentState>, UnknownTag> {
        self.state.as_deref().map(str::parse).transpose()
    }

    /// Overwrite the role tag.
    pub fn set_role(&mut self, role: Role) {
        self.role = Some(role.as_str().to_owned());
    }

    /// Overwrite the state tag.
    pub fn set_state(&mut self, state: AgentState) {
        self.state = Some(state.as_str().to_owned());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_record_has_no_tags() {
        let record: AgentRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(record.role(), Ok(None));
        assert_eq!(record.state(), Ok(None));
    }

    #[test]
    fn scratch_fields_survive_a_round_trip() {
        let json = r#"{"role":"builder","state":"building","sourceId":"abc","trips":3}"#;
        let record: AgentRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.role(), Ok(Some(Role::Builder)));
        assert_eq!(record.state(), Ok(Some(AgentState::Building)));
        assert_eq!(record.scratch.len(), 2);

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["sourceId"], "abc");
        assert_eq!(back["trips"], 3);
    }

    #[test]
    fn unknown_tags_are_reported() {
        let record: AgentRecord =
            serde_json::from_str(r#"{"role":"claimer","state":"fleeing"}"#).unwrap();
        assert_eq!(record.role(), Err(UnknownTag::Role("claimer".to_owned())));
        assert_eq!(record.state(), Err(UnknownTag::State("fleeing".to_owned())));
    }
}
