//! Facility scheduling: what each idle production facility builds next.
//!
//! Once per tick, every owned, idle spawn walks the role priority list
//! against the configured quotas, picks the first role that is short,
//! sizes a body for its locale's development tier, and submits a spawn
//! request if the locale can pay for it. A request that cannot be paid for
//! is skipped, not downgraded; the facility tries again next tick with
//! fresh numbers.

use std::collections::BTreeMap;

use colony_agents::MemoryStore;
use colony_types::{
    ActionOutcome, AgentName, BodyPart, LocaleName, ObjectId, Role, SpawnRequest, Structure,
};
use colony_world::{IntentSink, WorldView, extension_count, spawn_pool};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::body::{Tier, body_cost, body_for};
use crate::config::ColonyConfig;

/// Why a facility did not submit a request this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The facility is already producing an agent.
    FacilityBusy,
    /// Every role is at or above its quota.
    QuotasMet,
    /// The chosen body costs more than the locale holds.
    NotEnoughEnergy,
}

/// What happened at one facility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SpawnResult {
    /// No request was submitted.
    Skipped {
        /// Why.
        reason: SkipReason,
    },
    /// A request was submitted and the host answered.
    Submitted {
        /// Name given to the new agent.
        name: AgentName,
        /// Host outcome.
        outcome: ActionOutcome,
    },
}

/// Per-facility record of one scheduling pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpawnReport {
    /// The facility.
    pub facility: ObjectId,
    /// Its locale.
    pub locale: LocaleName,
    /// The role chosen, if any.
    pub role: Option<Role>,
    /// The body chosen, empty when no role was chosen.
    pub body: Vec<BodyPart>,
    /// Cost of `body`.
    pub cost: u32,
    /// Energy available in the locale's spawn pool.
    pub energy: u32,
    /// Capacity of the locale's spawn pool.
    pub capacity: u32,
    /// Outcome.
    pub result: SpawnResult,
}

impl SpawnReport {
    /// Whether the host accepted a spawn request from this facility.
    pub fn spawned(&self) -> bool {
        matches!(
            self.result,
            SpawnResult::Submitted {
                outcome: ActionOutcome::Ok,
                ..
            }
        )
    }
}

/// Human-readable reason for a rejected spawn request.
pub const fn failure_reason(outcome: ActionOutcome) -> &'static str {
    match outcome {
        ActionOutcome::NotEnoughResources => "not enough energy",
        ActionOutcome::Busy => "facility is busy",
        ActionOutcome::InvalidArgs => "invalid arguments",
        _ => "unknown error",
    }
}

/// Total storage capacity of the spawn pool in `locale`.
pub fn total_energy_capacity(world: &dyn WorldView, locale: &LocaleName) -> u32 {
    spawn_pool(world, locale).capacity
}

/// Live population per role.
///
/// Counts live agents whose persisted record names a known role. Agents
/// without a record, or with an unparseable role, are not counted.
pub fn population(world: &dyn WorldView, memory: &dyn MemoryStore) -> BTreeMap<Role, u32> {
    let mut counts = BTreeMap::new();
    for agent in world.agents() {
        let role = memory
            .get(&agent.name)
            .and_then(|record| record.role().ok().flatten());
        if let Some(role) = role {
            let count: &mut u32 = counts.entry(role).or_default();
            *count = count.saturating_add(1);
        }
    }
    counts
}

/// The first role in priority order that is below its quota.
///
/// Attackers are only eligible once the locale has enough extensions.
pub fn choose_role(
    config: &ColonyConfig,
    counts: &BTreeMap<Role, u32>,
    extensions: usize,
) -> Option<Role> {
    Role::PRIORITY.into_iter().find(|&role| {
        if role == Role::Attacker && extensions < config.spawning.attacker_extension_threshold {
            return false;
        }
        let live = counts.get(&role).copied().unwrap_or(0);
        live < config.quotas.quota(role)
    })
}

/// Runs one scheduling pass over every production facility.
#[derive(Debug, Clone, Copy)]
pub struct SpawnCoordinator<'c> {
    config: &'c ColonyConfig,
}

impl<'c> SpawnCoordinator<'c> {
    /// A coordinator using `config`'s quotas and thresholds.
    pub const fn new(config: &'c ColonyConfig) -> Self {
        Self { config }
    }

    /// Schedule every owned production facility for this tick.
    ///
    /// Population is counted once, before any request is submitted. Energy
    /// committed by an accepted request is not available to later
    /// facilities in the same locale.
    pub fn run(
        &self,
        world: &dyn WorldView,
        intents: &mut dyn IntentSink,
        memory: &dyn MemoryStore,
    ) -> Vec<SpawnReport> {
        let counts = population(world, memory);
        debug!(tick = world.tick(), ?counts, "population by role");
        let mut committed = BTreeMap::new();
        world
            .facilities()
            .into_iter()
            .map(|facility| self.schedule(world, intents, &counts, &mut committed, facility))
            .collect()
    }

    fn schedule(
        &self,
        world: &dyn WorldView,
        intents: &mut dyn IntentSink,
        counts: &BTreeMap<Role, u32>,
        committed: &mut BTreeMap<LocaleName, u32>,
        facility: &Structure,
    ) -> SpawnReport {
        let locale = &facility.pos.locale;
        let mut pool = spawn_pool(world, locale);
        let spent = committed.get(locale).copied().unwrap_or(0);
        pool.used = pool.used.saturating_sub(spent);
        let mut report = SpawnReport {
            facility: facility.id.clone(),
            locale: locale.clone(),
            role: None,
            body: Vec::new(),
            cost: 0,
            energy: pool.used,
            capacity: pool.capacity,
            result: SpawnResult::Skipped {
                reason: SkipReason::FacilityBusy,
            },
        };
        if facility.busy {
            debug!(facility = %facility.id, "facility busy");
            return report;
        }

        let extensions = extension_count(world, locale);
        let Some(role) = choose_role(self.config, counts, extensions) else {
            report.result = SpawnResult::Skipped {
                reason: SkipReason::QuotasMet,
            };
            return report;
        };

        let body = body_for(role, Tier::from_extensions(extensions), pool.used);
        let cost = body_cost(&body);
        report.role = Some(role);
        report.cost = cost;
        info!(
            tick = world.tick(),
            facility = %facility.id,
            %role,
            extensions,
            energy = pool.used,
            capacity = total_energy_capacity(world, locale),
            cost,
            "planning spawn"
        );

        if cost > pool.used {
            info!(
                facility = %facility.id,
                %role,
                need = cost,
                have = pool.used,
                "not enough energy to spawn"
            );
            report.body = body;
            report.result = SpawnResult::Skipped {
                reason: SkipReason::NotEnoughEnergy,
            };
            return report;
        }

        let request = SpawnRequest {
            facility: facility.id.clone(),
            name: AgentName::new(format!("{role}_{}", world.tick())),
            body,
            role,
            initial_state: role.initial_state(),
        };
        let outcome = intents.spawn(facility, &request);
        if outcome.is_ok() {
            committed.insert(locale.clone(), spent.saturating_add(cost));
            info!(
                tick = world.tick(),
                facility = %facility.id,
                agent = %request.name,
                %role,
                state = %request.initial_state,
                cost,
                "spawning new agent"
            );
        } else {
            warn!(
                facility = %facility.id,
                agent = %request.name,
                %role,
                code = outcome.code(),
                reason = failure_reason(outcome),
                "failed to spawn"
            );
        }
        report.body = request.body;
        report.result = SpawnResult::Submitted {
            name: request.name,
            outcome,
        };
        report
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use colony_agents::InMemoryStore;
    use colony_types::{Agent, AgentRecord, Position, Store, Structure, StructureKind};
    use colony_world::{IntentLog, Snapshot};

    use super::*;

    const LOCALE: &str = "W1N1";

    fn spawn_with(energy: u32) -> Structure {
        Structure {
            id: ObjectId::from("spawn1"),
            pos: Position::new(LOCALE, 25, 25),
            kind: StructureKind::Spawn,
            owned: true,
            hits: 5000,
            hits_max: 5000,
            store: Some(Store::new(energy, 300)),
            busy: false,
        }
    }

    fn extension(id: &str, energy: u32) -> Structure {
        Structure {
            id: ObjectId::from(id),
            pos: Position::new(LOCALE, 20, 20),
            kind: StructureKind::Extension,
            owned: true,
            hits: 1000,
            hits_max: 1000,
            store: Some(Store::new(energy, 50)),
            busy: false,
        }
    }

    fn live(world: &mut Snapshot, memory: &mut InMemoryStore, name: &str, role: Role) {
        let name = AgentName::from(name);
        world.agents.push(Agent {
            name: name.clone(),
            pos: Position::new(LOCALE, 1, 1),
            store: Store::new(0, 50),
            hits: 100,
            hits_max: 100,
            body: Vec::new(),
        });
        memory.set(&name, AgentRecord::new(role, role.initial_state()));
    }

    #[test]
    fn empty_colony_spawns_basic_harvester() {
        let mut world = Snapshot::new(1042);
        world.locale_mut(LOCALE).structures.push(spawn_with(300));
        let memory = InMemoryStore::new();
        let config = ColonyConfig::default();
        let mut intents = IntentLog::new(&world);

        let reports = SpawnCoordinator::new(&config).run(&world, &mut intents, &memory);

        assert_eq!(reports.len(), 1);
        let report = reports.first().unwrap();
        assert_eq!(report.role, Some(Role::Harvester));
        assert_eq!(report.body, vec![BodyPart::Work, BodyPart::Carry, BodyPart::Move]);
        assert_eq!(report.cost, 200);
        assert!(report.spawned());
        assert!(matches!(
            &report.result,
            SpawnResult::Submitted { name, .. } if name.as_str() == "harvester_1042"
        ));
    }

    #[test]
    fn priority_moves_on_once_quota_is_met() {
        let mut world = Snapshot::new(5);
        world.locale_mut(LOCALE).structures.push(spawn_with(300));
        let mut memory = InMemoryStore::new();
        for i in 0..3 {
            live(&mut world, &mut memory, &format!("h{i}"), Role::Harvester);
        }
        let config = ColonyConfig::default();
        let counts = population(&world, &memory);
        assert_eq!(choose_role(&config, &counts, 0), Some(Role::Upgrader));
    }

    #[test]
    fn attackers_wait_for_extensions() {
        let config = ColonyConfig::default();
        let mut counts = BTreeMap::new();
        counts.insert(Role::Harvester, 3);
        counts.insert(Role::Upgrader, 2);
        counts.insert(Role::Builder, 4);
        counts.insert(Role::Maintainer, 2);
        assert_eq!(choose_role(&config, &counts, 3), None);
        assert_eq!(choose_role(&config, &counts, 4), Some(Role::Attacker));
    }

    #[test]
    fn unaffordable_body_is_skipped() {
        let mut world = Snapshot::new(9);
        let mut memory = InMemoryStore::new();
        for i in 0..3 {
            live(&mut world, &mut memory, &format!("h{i}"), Role::Harvester);
        }
        let locale = world.locale_mut(LOCALE);
        locale.structures.push(spawn_with(150));
        locale.structures.push(extension("e1", 50));
        let config = ColonyConfig::default();
        let mut intents = IntentLog::new(&world);

        let reports = SpawnCoordinator::new(&config).run(&world, &mut intents, &memory);

        let report = reports.first().unwrap();
        assert_eq!(report.role, Some(Role::Upgrader));
        assert_eq!(report.cost, 300);
        assert_eq!(report.energy, 200);
        assert_eq!(
            report.result,
            SpawnResult::Skipped {
                reason: SkipReason::NotEnoughEnergy
            }
        );
        assert!(intents.entries().is_empty());
    }

    #[test]
    fn busy_facility_is_left_alone() {
        let mut world = Snapshot::new(2);
        let mut facility = spawn_with(300);
        facility.busy = true;
        world.locale_mut(LOCALE).structures.push(facility);
        let config = ColonyConfig::default();
        let mut intents = IntentLog::new(&world);
        let reports =
            SpawnCoordinator::new(&config).run(&world, &mut intents, &InMemoryStore::new());
        assert_eq!(
            reports.first().unwrap().result,
            SpawnResult::Skipped {
                reason: SkipReason::FacilityBusy
            }
        );
        assert!(intents.entries().is_empty());
    }

    #[test]
    fn unparseable_roles_are_not_counted() {
        let mut world = Snapshot::new(2);
        let mut memory = InMemoryStore::new();
        live(&mut world, &mut memory, "h0", Role::Harvester);
        let mut bogus = AgentRecord::default();
        bogus.role = Some("claimer".to_owned());
        live(&mut world, &mut memory, "x0", Role::Harvester);
        memory.set(&AgentName::from("x0"), bogus);
        let counts = population(&world, &memory);
        assert_eq!(counts.get(&Role::Harvester), Some(&1));
    }

    #[test]
    fn capacity_counts_spawns_and_extensions() {
        let mut world = Snapshot::new(2);
        let locale = world.locale_mut(LOCALE);
        locale.structures.push(spawn_with(0));
        locale.structures.push(extension("e1", 0));
        locale.structures.push(extension("e2", 0));
        assert_eq!(total_energy_capacity(&world, &LocaleName::from(LOCALE)), 400);
    }

    #[test]
    fn second_facility_sees_committed_energy() {
        let mut world = Snapshot::new(77);
        let mut second = spawn_with(150);
        second.id = ObjectId::from("spawn2");
        let locale = world.locale_mut(LOCALE);
        locale.structures.push(spawn_with(150));
        locale.structures.push(second);
        let config = ColonyConfig::default();
        let mut intents = IntentLog::new(&world);

        let reports =
            SpawnCoordinator::new(&config).run(&world, &mut intents, &InMemoryStore::new());

        assert_eq!(reports.len(), 2);
        assert!(reports.first().unwrap().spawned());
        let second = reports.get(1).unwrap();
        assert_eq!(second.energy, 100);
        assert_eq!(
            second.result,
            SpawnResult::Skipped {
                reason: SkipReason::NotEnoughEnergy
            }
        );
    }

    #[test]
    fn failure_reasons_are_classified() {
        assert_eq!(failure_reason(ActionOutcome::NotEnoughResources), "not enough energy");
        assert_eq!(failure_reason(ActionOutcome::Busy), "facility is busy");
        assert_eq!(failure_reason(ActionOutcome::InvalidArgs), "invalid arguments");
        assert_eq!(failure_reason(ActionOutcome::NameExists), "unknown error");
    }
}
