//! Per-agent role state machines.
//!
//! Each tick an agent gets exactly one transition check and at most one
//! action attempt (plus the approach move issued when that action is out
//! of range). The role and state live in the agent's persisted
//! [`AgentRecord`]; [`evaluate`] reads it, runs the role's step, and
//! writes the record back.
//!
//! Records are defaulted before evaluation: no role means a fresh
//! harvester, and a role without a state starts in the role's initial
//! state. Tags that do not parse, or a state the role does not allow, leave
//! the agent idle for the tick and surface as an [`AgentError`].

mod attacker;
mod worker;

use colony_types::{ActionOutcome, Agent, AgentName, AgentRecord, AgentState, Position, Role};
use colony_world::{IntentSink, WorldView};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::AgentError;
use crate::memory::MemoryStore;
use crate::targeting::DEFAULT_ATTACK_MARKER;

/// Default range from the home facility within which a waiting attacker holds.
pub const DEFAULT_GUARD_RADIUS: u32 = 3;

/// Tunables consulted by role behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BehaviorConfig {
    /// Name of the marker that designates an attack target.
    pub attack_marker: String,
    /// How far a waiting attacker may stray from its home facility.
    pub guard_radius: u32,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            attack_marker: DEFAULT_ATTACK_MARKER.to_owned(),
            guard_radius: DEFAULT_GUARD_RADIUS,
        }
    }
}

/// What an agent tried to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Harvest a source.
    Harvest,
    /// Deliver energy to a structure.
    Transfer,
    /// Work a construction site.
    Build,
    /// Repair a structure.
    Repair,
    /// Upgrade a controller.
    Upgrade,
    /// Attack a hostile agent or structure.
    Attack,
    /// Move toward a cell.
    MoveTo,
}

/// One submitted intent and what the host made of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attempt {
    /// The kind of intent.
    pub kind: ActionKind,
    /// The target object id, or the destination cell for moves.
    pub target: String,
    /// Host outcome.
    pub outcome: ActionOutcome,
}

impl Attempt {
    /// An attempt against a target named by `target`.
    pub fn new(kind: ActionKind, target: &impl core::fmt::Display, outcome: ActionOutcome) -> Self {
        Self {
            kind,
            target: target.to_string(),
            outcome,
        }
    }
}

/// The result of one agent's evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentDecision {
    /// The evaluated agent.
    pub agent: AgentName,
    /// Its role after defaulting.
    pub role: Role,
    /// State at the start of the tick, after defaulting.
    pub before: AgentState,
    /// State persisted for the next tick.
    pub after: AgentState,
    /// The action attempted this tick.
    pub action: Option<Attempt>,
    /// The approach move issued because the action was out of range.
    pub movement: Option<Attempt>,
}

impl AgentDecision {
    /// Whether the agent changed state this tick.
    pub fn transitioned(&self) -> bool {
        self.before != self.after
    }
}

/// Output of a single role step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Step {
    next: AgentState,
    action: Option<Attempt>,
    movement: Option<Attempt>,
}

impl Step {
    /// Switch state without acting.
    pub(crate) const fn transition(next: AgentState) -> Self {
        Self {
            next,
            action: None,
            movement: None,
        }
    }

    /// Stay put without acting.
    pub(crate) const fn hold(state: AgentState) -> Self {
        Self::transition(state)
    }

    /// Stay in `state` having made `action`.
    pub(crate) const fn acted(state: AgentState, action: Attempt) -> Self {
        Self {
            next: state,
            action: Some(action),
            movement: None,
        }
    }
}

/// Record an attempt and, if the target was out of range, approach it.
pub(crate) fn pursue(
    intents: &mut dyn IntentSink,
    agent: &Agent,
    state: AgentState,
    action: Attempt,
    target: &Position,
) -> Step {
    let movement = if action.outcome == ActionOutcome::NotInRange {
        let outcome = intents.move_to(agent, target);
        Some(Attempt::new(ActionKind::MoveTo, target, outcome))
    } else {
        None
    };
    Step {
        next: state,
        action: Some(action),
        movement,
    }
}

/// Resolve the role and state an agent should be evaluated in.
///
/// Writes the defaulted record back when a tag was missing or the state
/// had to be reset, so the next tick starts from a valid record. A state
/// that does not parse, or that the role does not allow, is reset to the
/// role's initial state; the agent still sits out the current tick.
fn resolve(
    memory: &mut dyn MemoryStore,
    agent: &Agent,
) -> Result<(Role, AgentState, AgentRecord), AgentError> {
    let mut record = memory.get(&agent.name).cloned().unwrap_or_default();

    let role = record
        .role()
        .map_err(|source| AgentError::UnknownTag {
            agent: agent.name.clone(),
            source,
        })?
        .unwrap_or(Role::Harvester);
    let parsed = match record.state() {
        Ok(parsed) => parsed,
        Err(source) => {
            reset(memory, agent, record, role);
            return Err(AgentError::UnknownTag {
                agent: agent.name.clone(),
                source,
            });
        }
    };
    let state = match parsed {
        None => role.initial_state(),
        Some(state) if role.accepts(state) => state,
        Some(state) => {
            reset(memory, agent, record, role);
            return Err(AgentError::InvalidStateForRole {
                agent: agent.name.clone(),
                role,
                state,
            });
        }
    };
    record.set_role(role);
    record.set_state(state);
    Ok((role, state, record))
}

/// Persist `role` in its initial state, keeping any scratch fields.
fn reset(memory: &mut dyn MemoryStore, agent: &Agent, mut record: AgentRecord, role: Role) {
    record.set_role(role);
    record.set_state(role.initial_state());
    memory.set(&agent.name, record);
}

/// Evaluate one live agent for this tick.
///
/// Submits at most one action (plus an approach move) through `intents`
/// and persists the agent's next state in `memory`.
pub fn evaluate(
    world: &dyn WorldView,
    intents: &mut dyn IntentSink,
    memory: &mut dyn MemoryStore,
    agent: &Agent,
    config: &BehaviorConfig,
) -> Result<AgentDecision, AgentError> {
    if !world.locales().contains(&&agent.pos.locale) {
        return Err(AgentError::MissingLocale {
            agent: agent.name.clone(),
            locale: agent.pos.locale.to_string(),
        });
    }

    let (role, state, mut record) = resolve(memory, agent)?;
    debug!(
        tick = world.tick(),
        agent = %agent.name,
        %role,
        %state,
        used = agent.store.used,
        capacity = agent.store.capacity,
        "evaluating agent"
    );

    let step = match role {
        Role::Attacker => attacker::step(world, intents, agent, state, config),
        Role::Harvester | Role::Upgrader | Role::Builder | Role::Maintainer => {
            worker::step(world, intents, agent, role, state)
        }
    };

    if step.next != state {
        info!(
            tick = world.tick(),
            agent = %agent.name,
            %role,
            from = %state,
            to = %step.next,
            "agent switching state"
        );
    }
    record.set_state(step.next);
    memory.set(&agent.name, record);

    Ok(AgentDecision {
        agent: agent.name.clone(),
        role,
        before: state,
        after: step.next,
        action: step.action,
        movement: step.movement,
    })
}
