//! The mutation surface: how the core submits intents.
//!
//! Each call validates the request against the tick's snapshot and returns
//! an [`ActionOutcome`] immediately, but nothing is applied until the host
//! commits the tick. [`IntentLog`] is the in-memory implementation: it
//! applies the host's range and resource checks and records what was
//! submitted.

use std::collections::{BTreeMap, BTreeSet};

use colony_types::{
    ActionOutcome, Agent, AgentName, ConstructionSite, Damageable, EnergySource, HostileAgent,
    Intent, LocaleName, Position, SpawnRequest, Structure, StructureKind,
};
use tracing::debug;

use crate::view::{WorldView, spawn_pool};

/// Range within which harvest, transfer, and melee attack succeed.
pub const ADJACENT_RANGE: u32 = 1;

/// Range within which build, repair, and upgrade succeed.
pub const WORK_RANGE: u32 = 3;

/// Submits intents to the host.
pub trait IntentSink {
    /// Harvest energy from a source.
    fn harvest(&mut self, agent: &Agent, source: &EnergySource) -> ActionOutcome;

    /// Transfer carried energy into a structure.
    fn transfer(&mut self, agent: &Agent, target: &Structure) -> ActionOutcome;

    /// Spend carried energy on a construction site.
    fn build(&mut self, agent: &Agent, site: &ConstructionSite) -> ActionOutcome;

    /// Spend carried energy repairing a structure.
    fn repair(&mut self, agent: &Agent, target: &Structure) -> ActionOutcome;

    /// Spend carried energy upgrading a controller.
    fn upgrade(&mut self, agent: &Agent, controller: &Structure) -> ActionOutcome;

    /// Melee-attack a hostile agent.
    fn attack_hostile(&mut self, agent: &Agent, target: &HostileAgent) -> ActionOutcome;

    /// Melee-attack a structure.
    fn attack_structure(&mut self, agent: &Agent, target: &Structure) -> ActionOutcome;

    /// Move toward a cell.
    fn move_to(&mut self, agent: &Agent, destination: &Position) -> ActionOutcome;

    /// Produce a new agent at a facility.
    fn spawn(&mut self, facility: &Structure, request: &SpawnRequest) -> ActionOutcome;
}

/// One submitted intent and the outcome reported for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedIntent {
    /// The request.
    pub intent: Intent,
    /// What the host reported.
    pub outcome: ActionOutcome,
}

/// Records intents against a snapshot, validating them the way the host does.
pub struct IntentLog<'w> {
    world: &'w dyn WorldView,
    entries: Vec<LoggedIntent>,
    spawned_names: BTreeSet<AgentName>,
    spawn_spent: BTreeMap<LocaleName, u32>,
}

impl<'w> IntentLog<'w> {
    /// An empty log validating against `world`.
    pub const fn new(world: &'w dyn WorldView) -> Self {
        Self {
            world,
            entries: Vec::new(),
            spawned_names: BTreeSet::new(),
            spawn_spent: BTreeMap::new(),
        }
    }

    /// Every submitted intent, accepted or not, in submission order.
    pub fn entries(&self) -> &[LoggedIntent] {
        &self.entries
    }

    /// The intents the host accepted.
    pub fn accepted(&self) -> Vec<&Intent> {
        self.entries
            .iter()
            .filter(|e| e.outcome.is_ok())
            .map(|e| &e.intent)
            .collect()
    }

    /// Accepted intents submitted by one agent.
    pub fn accepted_for(&self, agent: &AgentName) -> Vec<&Intent> {
        self.accepted()
            .into_iter()
            .filter(|i| i.actor() == Some(agent))
            .collect()
    }

    /// Consume the log, keeping only accepted intents.
    pub fn into_accepted(self) -> Vec<Intent> {
        self.entries
            .into_iter()
            .filter(|e| e.outcome.is_ok())
            .map(|e| e.intent)
            .collect()
    }

    fn record(&mut self, intent: Intent, outcome: ActionOutcome) -> ActionOutcome {
        debug!(?intent, ?outcome, "intent submitted");
        self.entries.push(LoggedIntent { intent, outcome });
        outcome
    }

    fn in_range(&self, from: &Position, to: &Position, range: u32) -> bool {
        self.world.range(from, to).is_some_and(|r| r <= range)
    }
}

impl core::fmt::Debug for IntentLog<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IntentLog")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl IntentSink for IntentLog<'_> {
    fn harvest(&mut self, agent: &Agent, source: &EnergySource) -> ActionOutcome {
        let outcome = if !self.in_range(&agent.pos, &source.pos, ADJACENT_RANGE) {
            ActionOutcome::NotInRange
        } else if source.energy == 0 {
            ActionOutcome::NotEnoughResources
        } else {
            ActionOutcome::Ok
        };
        let intent = Intent::Harvest {
            agent: agent.name.clone(),
            target: source.id.clone(),
        };
        self.record(intent, outcome)
    }

    fn transfer(&mut self, agent: &Agent, target: &Structure) -> ActionOutcome {
        let outcome = if !self.in_range(&agent.pos, &target.pos, ADJACENT_RANGE) {
            ActionOutcome::NotInRange
        } else if agent.store.is_empty() {
            ActionOutcome::NotEnoughResources
        } else if target.store.is_none_or(|s| s.is_full()) {
            ActionOutcome::Full
        } else {
            ActionOutcome::Ok
        };
        let intent = Intent::Transfer {
            agent: agent.name.clone(),
            target: target.id.clone(),
        };
        self.record(intent, outcome)
    }

    fn build(&mut self, agent: &Agent, site: &ConstructionSite) -> ActionOutcome {
        let outcome = if !self.in_range(&agent.pos, &site.pos, WORK_RANGE) {
            ActionOutcome::NotInRange
        } else if agent.store.is_empty() {
            ActionOutcome::NotEnoughResources
        } else {
            ActionOutcome::Ok
        };
        let intent = Intent::Build {
            agent: agent.name.clone(),
            target: site.id.clone(),
        };
        self.record(intent, outcome)
    }

    fn repair(&mut self, agent: &Agent, target: &Structure) -> ActionOutcome {
        let outcome = if !self.in_range(&agent.pos, &target.pos, WORK_RANGE) {
            ActionOutcome::NotInRange
        } else if agent.store.is_empty() {
            ActionOutcome::NotEnoughResources
        } else if !target.is_damaged() {
            ActionOutcome::InvalidTarget
        } else {
            ActionOutcome::Ok
        };
        let intent = Intent::Repair {
            agent: agent.name.clone(),
            target: target.id.clone(),
        };
        self.record(intent, outcome)
    }

    fn upgrade(&mut self, agent: &Agent, controller: &Structure) -> ActionOutcome {
        let outcome = if controller.kind != StructureKind::Controller {
            ActionOutcome::InvalidTarget
        } else if !self.in_range(&agent.pos, &controller.pos, WORK_RANGE) {
            ActionOutcome::NotInRange
        } else if agent.store.is_empty() {
            ActionOutcome::NotEnoughResources
        } else {
            ActionOutcome::Ok
        };
        let intent = Intent::Upgrade {
            agent: agent.name.clone(),
            target: controller.id.clone(),
        };
        self.record(intent, outcome)
    }

    fn attack_hostile(&mut self, agent: &Agent, target: &HostileAgent) -> ActionOutcome {
        let outcome = if self.in_range(&agent.pos, &target.pos, ADJACENT_RANGE) {
            ActionOutcome::Ok
        } else {
            ActionOutcome::NotInRange
        };
        let intent = Intent::Attack {
            agent: agent.name.clone(),
            target: target.id.clone(),
        };
        self.record(intent, outcome)
    }

    fn attack_structure(&mut self, agent: &Agent, target: &Structure) -> ActionOutcome {
        let outcome = if self.in_range(&agent.pos, &target.pos, ADJACENT_RANGE) {
            ActionOutcome::Ok
        } else {
            ActionOutcome::NotInRange
        };
        let intent = Intent::Attack {
            agent: agent.name.clone(),
            target: target.id.clone(),
        };
        self.record(intent, outcome)
    }

    fn move_to(&mut self, agent: &Agent, destination: &Position) -> ActionOutcome {
        let outcome = if agent.pos.locale == destination.locale {
            ActionOutcome::Ok
        } else {
            ActionOutcome::NoPath
        };
        let intent = Intent::MoveTo {
            agent: agent.name.clone(),
            destination: destination.clone(),
        };
        self.record(intent, outcome)
    }

    fn spawn(&mut self, facility: &Structure, request: &SpawnRequest) -> ActionOutcome {
        let cost: u32 = request
            .body
            .iter()
            .fold(0_u32, |acc, part| acc.saturating_add(part.cost()));
        let pool = spawn_pool(self.world, &facility.pos.locale);
        let spent = self
            .spawn_spent
            .get(&facility.pos.locale)
            .copied()
            .unwrap_or(0);
        let remaining = pool.used.saturating_sub(spent);

        let name_taken = self.world.agent(&request.name).is_some();
        let name_reused = self.spawned_names.contains(&request.name);

        let outcome = if !facility.is_production_facility() {
            ActionOutcome::NotOwner
        } else if facility.busy {
            ActionOutcome::Busy
        } else if request.body.is_empty() || name_reused {
            ActionOutcome::InvalidArgs
        } else if name_taken {
            ActionOutcome::NameExists
        } else if cost > remaining {
            ActionOutcome::NotEnoughResources
        } else {
            ActionOutcome::Ok
        };

        if outcome.is_ok() {
            self.spawned_names.insert(request.name.clone());
            self.spawn_spent
                .insert(facility.pos.locale.clone(), spent.saturating_add(cost));
        }
        self.record(Intent::Spawn(request.clone()), outcome)
    }
}
