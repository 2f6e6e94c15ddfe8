//! Mutation requests submitted to the host.
//!
//! The core never mutates the world. Every decision becomes an [`Intent`]
//! that the host resolves after the tick returns.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{AgentState, BodyPart, Role};
use crate::ids::{AgentName, ObjectId};
use crate::objects::Position;
use crate::record::AgentRecord;

/// A request to produce a new agent at a facility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SpawnRequest {
    /// The producing facility.
    pub facility: ObjectId,
    /// Name of the new agent, `"{role}_{tick}"`.
    pub name: AgentName,
    /// Ordered body parts.
    pub body: Vec<BodyPart>,
    /// Role written into the new agent's record.
    pub role: Role,
    /// State written into the new agent's record.
    pub initial_state: AgentState,
}

impl SpawnRequest {
    /// The record the new agent starts with.
    pub fn initial_record(&self) -> AgentRecord {
        AgentRecord::new(self.role, self.initial_state)
    }
}

/// A single mutation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Intent {
    /// Harvest energy from a source.
    Harvest {
        /// Acting agent.
        agent: AgentName,
        /// Source id.
        target: ObjectId,
    },
    /// Transfer carried energy into a structure.
    Transfer {
        /// Acting agent.
        agent: AgentName,
        /// Structure id.
        target: ObjectId,
    },
    /// Spend energy on a construction site.
    Build {
        /// Acting agent.
        agent: AgentName,
        /// Construction site id.
        target: ObjectId,
    },
    /// Spend energy repairing a structure.
    Repair {
        /// Acting agent.
        agent: AgentName,
        /// Structure id.
        target: ObjectId,
    },
    /// Spend energy upgrading the controller.
    Upgrade {
        /// Acting agent.
        agent: AgentName,
        /// Controller id.
        target: ObjectId,
    },
    /// Melee attack on a hostile agent or structure.
    Attack {
        /// Acting agent.
        agent: AgentName,
        /// Target id.
        target: ObjectId,
    },
    /// Move toward a position.
    MoveTo {
        /// Acting agent.
        agent: AgentName,
        /// Destination cell.
        destination: Position,
    },
    /// Produce a new agent.
    Spawn(SpawnRequest),
}

impl Intent {
    /// Name of the acting agent, `None` for spawn requests.
    pub const fn actor(&self) -> Option<&AgentName> {
        match self {
            Self::Harvest { agent, .. }
            | Self::Transfer { agent, .. }
            | Self::Build { agent, .. }
            | Self::Repair { agent, .. }
            | Self::Upgrade { agent, .. }
            | Self::Attack { agent, .. }
            | Self::MoveTo { agent, .. } => Some(agent),
            Self::Spawn(_) => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn intents_are_tagged_by_kind() {
        let intent = Intent::Harvest {
            agent: AgentName::from("harvester_1"),
            target: ObjectId::from("src1"),
        };
        let json = serde_json::to_value(&intent).unwrap();
        assert_eq!(json["kind"], "harvest");
        assert_eq!(json["agent"], "harvester_1");
    }

    #[test]
    fn spawn_request_carries_initial_record() {
        let request = SpawnRequest {
            facility: ObjectId::from("spawn1"),
            name: AgentName::from("attacker_9"),
            body: vec![BodyPart::Attack, BodyPart::Move],
            role: Role::Attacker,
            initial_state: AgentState::Attacking,
        };
        let record = request.initial_record();
        assert_eq!(record.role(), Ok(Some(Role::Attacker)));
        assert_eq!(record.state(), Ok(Some(AgentState::Attacking)));
        assert_eq!(Intent::Spawn(request).actor(), None);
    }
}
