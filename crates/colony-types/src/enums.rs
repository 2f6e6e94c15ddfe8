//! Enumeration types for the colony decision core.
//!
//! Roles and states are closed sets. The persisted record stores them as
//! lowercase strings so the host can read them; [`core::str::FromStr`]
//! is the only way a string becomes a [`Role`] or [`AgentState`].

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Roles and states
// ---------------------------------------------------------------------------

/// The behavioral role of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum Role {
    /// Gathers energy and delivers it to spawns, extensions, and towers.
    Harvester,
    /// Gathers energy and spends it upgrading the locale controller.
    Upgrader,
    /// Gathers energy and spends it on construction sites.
    Builder,
    /// Gathers energy and spends it repairing damaged structures.
    Maintainer,
    /// Engages hostiles and marked structures; carries no energy.
    Attacker,
}

impl Role {
    /// Every role in spawn-priority order.
    pub const PRIORITY: [Self; 5] = [
        Self::Harvester,
        Self::Upgrader,
        Self::Builder,
        Self::Maintainer,
        Self::Attacker,
    ];

    /// The lowercase tag stored in the persisted record.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Harvester => "harvester",
            Self::Upgrader => "upgrader",
            Self::Builder => "builder",
            Self::Maintainer => "maintainer",
            Self::Attacker => "attacker",
        }
    }

    /// The states this role may legally occupy.
    pub const fn valid_states(self) -> &'static [AgentState] {
        match self {
            Self::Harvester => &[
                AgentState::Harvesting,
                AgentState::Delivering,
                AgentState::Upgrading,
            ],
            Self::Upgrader => &[AgentState::Harvesting, AgentState::Upgrading],
            Self::Builder => &[
                AgentState::Harvesting,
                AgentState::Building,
                AgentState::Upgrading,
            ],
            Self::Maintainer => &[
                AgentState::Harvesting,
                AgentState::Repairing,
                AgentState::Upgrading,
            ],
            Self::Attacker => &[AgentState::Attacking, AgentState::Waiting],
        }
    }

    /// Whether `state` is legal for this role.
    pub fn accepts(self, state: AgentState) -> bool {
        self.valid_states().contains(&state)
    }

    /// The state an agent of this role starts in.
    pub const fn initial_state(self) -> AgentState {
        match self {
            Self::Attacker => AgentState::Attacking,
            Self::Harvester | Self::Upgrader | Self::Builder | Self::Maintainer => {
                AgentState::Harvesting
            }
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for Role {
    type Err = crate::record::UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "harvester" => Ok(Self::Harvester),
            "upgrader" => Ok(Self::Upgrader),
            "builder" => Ok(Self::Builder),
            "maintainer" => Ok(Self::Maintainer),
            "attacker" => Ok(Self::Attacker),
            other => Err(crate::record::UnknownTag::Role(other.to_owned())),
        }
    }
}

/// A state in an agent's role state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum AgentState {
    /// Filling the store at an energy source.
    Harvesting,
    /// Transferring energy into spawns, extensions, or towers.
    Delivering,
    /// Spending energy on the locale controller (universal fallback).
    Upgrading,
    /// Spending energy on construction sites.
    Building,
    /// Spending energy on damaged structures.
    Repairing,
    /// Pursuing hostiles or the attack marker.
    Attacking,
    /// Idling near the home facility until a target appears.
    Waiting,
}

impl AgentState {
    /// The lowercase tag stored in the persisted record.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Harvesting => "harvesting",
            Self::Delivering => "delivering",
            Self::Upgrading => "upgrading",
            Self::Building => "building",
            Self::Repairing => "repairing",
            Self::Attacking => "attacking",
            Self::Waiting => "waiting",
        }
    }
}

impl core::fmt::Display for AgentState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for AgentState {
    type Err = crate::record::UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "harvesting" => Ok(Self::Harvesting),
            "delivering" => Ok(Self::Delivering),
            "upgrading" => Ok(Self::Upgrading),
            "building" => Ok(Self::Building),
            "repairing" => Ok(Self::Repairing),
            "attacking" => Ok(Self::Attacking),
            "waiting" => Ok(Self::Waiting),
            other => Err(crate::record::UnknownTag::State(other.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// World object kinds
// ---------------------------------------------------------------------------

/// The type of a completed structure or of a pending construction site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureKind {
    /// Production facility; creates new agents.
    Spawn,
    /// Energy reservoir feeding the spawn pool; drives the infrastructure tier.
    Extension,
    /// Defense tower holding energy.
    Tower,
    /// Road; only repaired once badly worn.
    Road,
    /// Constructed wall.
    Wall,
    /// Rampart.
    Rampart,
    /// Container.
    Container,
    /// Storage.
    Storage,
    /// Locale controller; the upgrade target.
    Controller,
    /// Any structure type the core has no special handling for.
    #[serde(other)]
    Other,
}

/// Body part tokens composing an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum BodyPart {
    /// Harvests, builds, repairs, and upgrades.
    Work,
    /// Adds store capacity.
    Carry,
    /// Reduces fatigue.
    Move,
    /// Melee damage.
    Attack,
    /// Ranged damage.
    RangedAttack,
    /// Heals agents.
    Heal,
    /// Extra hit points.
    Tough,
    /// Claims controllers.
    Claim,
}

impl BodyPart {
    /// Energy cost of one part. Parts without a listed price cost 50.
    pub const fn cost(self) -> u32 {
        match self {
            Self::Work => 100,
            Self::Attack => 80,
            Self::Carry | Self::Move => 50,
            Self::RangedAttack | Self::Heal | Self::Tough | Self::Claim => UNLISTED_PART_COST,
        }
    }
}

/// Price charged for any part missing from the cost table.
pub const UNLISTED_PART_COST: u32 = 50;

impl core::fmt::Display for BodyPart {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let tag = match self {
            Self::Work => "work",
            Self::Carry => "carry",
            Self::Move => "move",
            Self::Attack => "attack",
            Self::RangedAttack => "ranged_attack",
            Self::Heal => "heal",
            Self::Tough => "tough",
            Self::Claim => "claim",
        };
        f.write_str(tag)
    }
}

/// Terrain at a single cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Terrain {
    /// Walkable ground.
    #[default]
    Plain,
    /// Walkable, slow.
    Swamp,
    /// Impassable.
    Wall,
}

// ---------------------------------------------------------------------------
// Action outcomes
// ---------------------------------------------------------------------------

/// Result reported by the host for a submitted intent.
///
/// Numeric codes match the host's wire values; unrecognized codes are
/// kept as [`ActionOutcome::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ActionOutcome {
    /// Accepted.
    Ok,
    /// The actor does not own the object.
    NotOwner,
    /// No path to the target.
    NoPath,
    /// A spawn request reused an existing name.
    NameExists,
    /// The actor is busy (spawning, or still being spawned).
    Busy,
    /// The target does not exist.
    NotFound,
    /// Not enough energy or resources.
    NotEnoughResources,
    /// The target cannot be acted on this way.
    InvalidTarget,
    /// The target store is full.
    Full,
    /// The target is out of action range.
    NotInRange,
    /// Malformed arguments.
    InvalidArgs,
    /// The actor is fatigued.
    Tired,
    /// The actor lacks the required body part.
    NoBodypart,
    /// Any other host code.
    Other(i32),
}

impl ActionOutcome {
    /// Decode a host result code.
    pub const fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Ok,
            -1 => Self::NotOwner,
            -2 => Self::NoPath,
            -3 => Self::NameExists,
            -4 => Self::Busy,
            -5 => Self::NotFound,
            -6 => Self::NotEnoughResources,
            -7 => Self::InvalidTarget,
            -8 => Self::Full,
            -9 => Self::NotInRange,
            -10 => Self::InvalidArgs,
            -11 => Self::Tired,
            -12 => Self::NoBodypart,
            other => Self::Other(other),
        }
    }

    /// Encode as a host result code.
    pub const fn code(self) -> i32 {
        match self {
            Self::Ok => 0,
            Self::NotOwner => -1,
            Self::NoPath => -2,
            Self::NameExists => -3,
            Self::Busy => -4,
            Self::NotFound => -5,
            Self::NotEnoughResources => -6,
            Self::InvalidTarget => -7,
            Self::Full => -8,
            Self::NotInRange => -9,
            Self::InvalidArgs => -10,
            Self::Tired => -11,
            Self::NoBodypart => -12,
            Self::Other(code) => code,
        }
    }

    /// Whether the host accepted the intent.
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_states_are_valid_for_their_role() {
        for role in Role::PRIORITY {
            assert!(role.accepts(role.initial_state()), "{role}");
        }
    }

    #[test]
    fn attacker_never_harvests() {
        assert!(!Role::Attacker.accepts(AgentState::Harvesting));
        assert!(!Role::Harvester.accepts(AgentState::Waiting));
        assert!(!Role::Upgrader.accepts(AgentState::Delivering));
    }

    #[test]
    fn role_tags_parse_back() {
        for role in Role::PRIORITY {
            assert_eq!(role.as_str().parse::<Role>().ok(), Some(role));
        }
        assert!("miner".parse::<Role>().is_err());
        assert!("Harvester".parse::<Role>().is_err());
    }

    #[test]
    fn unknown_structure_kinds_deserialize_as_other() {
        let kind: Result<StructureKind, _> = serde_json::from_str("\"observer\"");
        assert_eq!(kind.ok(), Some(StructureKind::Other));
        let kind: Result<StructureKind, _> = serde_json::from_str("\"extension\"");
        assert_eq!(kind.ok(), Some(StructureKind::Extension));
    }

    #[test]
    fn part_costs_follow_the_table() {
        assert_eq!(BodyPart::Work.cost(), 100);
        assert_eq!(BodyPart::Carry.cost(), 50);
        assert_eq!(BodyPart::Move.cost(), 50);
        assert_eq!(BodyPart::Attack.cost(), 80);
        assert_eq!(BodyPart::Heal.cost(), UNLISTED_PART_COST);
    }

    #[test]
    fn outcome_codes_match_host_values() {
        assert_eq!(ActionOutcome::from_code(-9), ActionOutcome::NotInRange);
        assert_eq!(ActionOutcome::from_code(-6), ActionOutcome::NotEnoughResources);
        assert_eq!(ActionOutcome::from_code(-99), ActionOutcome::Other(-99));
        assert_eq!(ActionOutcome::Busy.code(), -4);
    }
}
