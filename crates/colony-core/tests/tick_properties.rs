//! Whole-tick tests for the colony decision core.
//!
//! Each test builds a [`Snapshot`] by hand, runs ticks through an
//! [`IntentLog`] and an [`InMemoryStore`], and checks properties that must
//! hold for every tick regardless of world layout.

// Integration tests use expect/unwrap extensively for clarity -- panicking
// on failure is the correct behavior in test code.
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::items_after_statements,
    clippy::missing_panics_doc,
    clippy::too_many_lines,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]

use colony_agents::{ActionKind, InMemoryStore, MemoryStore};
use colony_core::body::body_cost;
use colony_core::config::ColonyConfig;
use colony_core::spawn::{SpawnCoordinator, SpawnResult};
use colony_core::tick::run_tick;
use colony_types::{
    ActionOutcome, Agent, AgentName, AgentRecord, AgentState, BodyPart, ConstructionSite,
    EnergySource, HostileAgent, Intent, LocaleName, Marker, ObjectId, Position, Role, Store,
    Structure, StructureKind,
};
use colony_world::{IntentLog, Snapshot, spawn_pool};

const LOCALE: &str = "W1N1";

// =============================================================================
// Fixtures
// =============================================================================

fn structure(id: &str, kind: StructureKind, x: u32, y: u32) -> Structure {
    Structure {
        id: ObjectId::from(id),
        pos: Position::new(LOCALE, x, y),
        kind,
        owned: true,
        hits: 1000,
        hits_max: 1000,
        store: None,
        busy: false,
    }
}

fn spawn(energy: u32) -> Structure {
    let mut s = structure("spawn1", StructureKind::Spawn, 25, 25);
    s.hits = 5000;
    s.hits_max = 5000;
    s.store = Some(Store::new(energy, 300));
    s
}

fn extension(i: u32, energy: u32) -> Structure {
    let mut s = structure(&format!("ext{i}"), StructureKind::Extension, 20 + i, 30);
    s.store = Some(Store::new(energy, 50));
    s
}

fn agent(name: &str, x: u32, y: u32, used: u32) -> Agent {
    Agent {
        name: AgentName::from(name),
        pos: Position::new(LOCALE, x, y),
        store: Store::new(used, 50),
        hits: 300,
        hits_max: 300,
        body: vec![BodyPart::Work, BodyPart::Carry, BodyPart::Move],
    }
}

/// A developed locale with something for every role to do.
fn busy_world(tick: u64) -> Snapshot {
    let mut world = Snapshot::new(tick);
    let locale = world.locale_mut(LOCALE);
    locale.sources.push(EnergySource {
        id: ObjectId::from("src1"),
        pos: Position::new(LOCALE, 5, 5),
        energy: 3000,
        energy_capacity: 3000,
    });
    locale.sources.push(EnergySource {
        id: ObjectId::from("src2"),
        pos: Position::new(LOCALE, 44, 8),
        energy: 1500,
        energy_capacity: 3000,
    });
    locale.structures.push(spawn(120));
    locale.structures.push(extension(0, 0));
    locale.structures.push(extension(1, 50));
    locale
        .structures
        .push(structure("ctrl", StructureKind::Controller, 40, 40));
    let mut tower = structure("tower1", StructureKind::Tower, 30, 20);
    tower.hits = 400;
    tower.store = Some(Store::new(200, 1000));
    locale.structures.push(tower);
    let mut road = structure("road1", StructureKind::Road, 12, 12);
    road.owned = false;
    road.hits = 900;
    road.hits_max = 5000;
    locale.structures.push(road);
    locale.construction_sites.push(ConstructionSite {
        id: ObjectId::from("site1"),
        pos: Position::new(LOCALE, 18, 14),
        kind: StructureKind::Road,
        progress: 0,
        progress_total: 300,
    });
    locale.hostiles.push(HostileAgent {
        id: ObjectId::from("enemy1"),
        pos: Position::new(LOCALE, 2, 45),
        hits: 500,
        hits_max: 500,
    });
    locale.markers.push(Marker {
        name: "attack".to_owned(),
        pos: Position::new(LOCALE, 30, 20),
    });

    let roster = [
        ("harvester_1", 6, 6, 0),
        ("harvester_2", 15, 15, 50),
        ("upgrader_1", 38, 38, 25),
        ("builder_1", 17, 14, 50),
        ("maintainer_1", 29, 21, 10),
        ("attacker_1", 10, 40, 0),
    ];
    for (name, x, y, used) in roster {
        world.agents.push(agent(name, x, y, used));
    }
    world
}

fn seeded_memory() -> InMemoryStore {
    let mut memory = InMemoryStore::new();
    let records = [
        ("harvester_1", Role::Harvester, AgentState::Harvesting),
        ("harvester_2", Role::Harvester, AgentState::Harvesting),
        ("upgrader_1", Role::Upgrader, AgentState::Upgrading),
        ("builder_1", Role::Builder, AgentState::Building),
        ("maintainer_1", Role::Maintainer, AgentState::Repairing),
        ("attacker_1", Role::Attacker, AgentState::Waiting),
    ];
    for (name, role, state) in records {
        memory.set(&AgentName::from(name), AgentRecord::new(role, state));
    }
    memory
}

fn assert_records_valid(memory: &InMemoryStore) {
    for name in memory.names() {
        let record = memory.get(&name).unwrap();
        let role = record.role().unwrap().unwrap();
        let state = record.state().unwrap().unwrap();
        assert!(
            role.accepts(state),
            "{name}: state {state} is not valid for {role}"
        );
    }
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn first_harvester_for_an_empty_colony() {
    let mut world = Snapshot::new(1042);
    world.locale_mut(LOCALE).structures.push(spawn(300));
    let mut memory = InMemoryStore::new();
    let mut intents = IntentLog::new(&world);

    let summary = run_tick(&world, &mut intents, &mut memory, &ColonyConfig::default());

    assert_eq!(summary.spawned(), 1);
    let accepted = intents.into_accepted();
    assert_eq!(accepted.len(), 1);
    let request = accepted
        .iter()
        .find_map(|intent| match intent {
            Intent::Spawn(request) => Some(request),
            _ => None,
        })
        .expect("spawn request accepted");
    assert_eq!(request.name.as_str(), "harvester_1042");
    assert_eq!(request.role, Role::Harvester);
    assert_eq!(request.initial_state, AgentState::Harvesting);
    assert_eq!(
        request.body,
        vec![BodyPart::Work, BodyPart::Carry, BodyPart::Move]
    );
    assert_eq!(body_cost(&request.body), 200);
    assert_eq!(request.initial_record().role(), Ok(Some(Role::Harvester)));
}

#[test]
fn states_stay_valid_across_ticks() {
    let mut memory = seeded_memory();
    let config = ColonyConfig::default();
    for (round, tick) in (100..130_u64).enumerate() {
        let mut world = busy_world(tick);
        // Vary carried energy so every transition path is exercised.
        for (i, agent) in world.agents.iter_mut().enumerate() {
            agent.store.used = [0, 25, 50][(round + i) % 3];
        }
        let mut intents = IntentLog::new(&world);
        let summary = run_tick(&world, &mut intents, &mut memory, &config);
        assert!(summary.failures.is_empty(), "{:?}", summary.failures);
        for decision in &summary.decisions {
            assert!(decision.role.accepts(decision.after));
        }
        assert_records_valid(&memory);
    }
}

#[test]
fn ticks_are_deterministic() {
    let world = busy_world(500);
    let config = ColonyConfig::default();

    let mut first_memory = seeded_memory();
    let mut first_intents = IntentLog::new(&world);
    let first = run_tick(&world, &mut first_intents, &mut first_memory, &config);

    let mut second_memory = seeded_memory();
    let mut second_intents = IntentLog::new(&world);
    let second = run_tick(&world, &mut second_intents, &mut second_memory, &config);

    assert_eq!(first, second);
    assert_eq!(first_intents.entries(), second_intents.entries());
    assert_eq!(first_memory, second_memory);
}

#[test]
fn harvester_with_room_always_harvests_or_moves() {
    let config = ColonyConfig::default();
    for x in (0..50).step_by(7) {
        for y in (0..50).step_by(9) {
            for used in [0, 1, 49] {
                let mut world = busy_world(7);
                world.agents = vec![agent("harvester_1", x, y, used)];
                let mut memory = InMemoryStore::new();
                memory.set(
                    &AgentName::from("harvester_1"),
                    AgentRecord::new(Role::Harvester, AgentState::Harvesting),
                );
                let mut intents = IntentLog::new(&world);

                let summary = run_tick(&world, &mut intents, &mut memory, &config);

                let decision = summary.decisions.first().unwrap();
                let action = decision.action.as_ref().unwrap();
                assert_eq!(action.kind, ActionKind::Harvest);
                let acted = action.outcome == ActionOutcome::Ok;
                let moved = decision
                    .movement
                    .as_ref()
                    .is_some_and(|m| m.outcome == ActionOutcome::Ok);
                assert!(acted || moved, "harvester at ({x},{y}) neither harvested nor moved");
            }
        }
    }
}

#[test]
fn spawn_requests_never_exceed_available_energy() {
    for extensions in 0..6_u32 {
        for spawn_energy in (0..=300).step_by(25) {
            for extension_energy in [0, 25, 50] {
                let mut world = Snapshot::new(900);
                let locale = world.locale_mut(LOCALE);
                locale.structures.push(spawn(spawn_energy));
                for i in 0..extensions {
                    locale.structures.push(extension(i, extension_energy));
                }
                let pool = spawn_pool(&world, &LocaleName::from(LOCALE));
                let config = ColonyConfig::default();
                let mut intents = IntentLog::new(&world);

                let reports =
                    SpawnCoordinator::new(&config).run(&world, &mut intents, &InMemoryStore::new());

                for report in &reports {
                    if matches!(report.result, SpawnResult::Submitted { .. }) {
                        assert!(report.cost <= pool.used);
                    }
                }
                for intent in intents.accepted() {
                    if let Intent::Spawn(request) = intent {
                        assert!(body_cost(&request.body) <= pool.used);
                    }
                }
            }
        }
    }
}

#[test]
fn reconciler_clears_every_dead_record() {
    let world = busy_world(60);
    let mut memory = seeded_memory();
    for i in 0..20 {
        memory.set(
            &AgentName::new(format!("builder_{i}")),
            AgentRecord::new(Role::Builder, AgentState::Building),
        );
    }
    let mut intents = IntentLog::new(&world);

    let summary = run_tick(&world, &mut intents, &mut memory, &ColonyConfig::default());

    assert_eq!(summary.reclaimed.len(), 20);
    let mut expected: Vec<AgentName> = world.agents.iter().map(|a| a.name.clone()).collect();
    expected.sort();
    let mut remaining = memory.names();
    remaining.sort();
    assert_eq!(remaining, expected);
}

#[test]
fn attacker_engages_the_nearest_hostile() {
    let world = busy_world(61);
    let mut memory = seeded_memory();
    memory.set(
        &AgentName::from("attacker_1"),
        AgentRecord::new(Role::Attacker, AgentState::Attacking),
    );
    let mut intents = IntentLog::new(&world);

    let summary = run_tick(&world, &mut intents, &mut memory, &ColonyConfig::default());

    let decision = summary
        .decisions
        .iter()
        .find(|d| d.agent.as_str() == "attacker_1")
        .unwrap();
    let action = decision.action.as_ref().unwrap();
    assert_eq!(action.kind, ActionKind::Attack);
    assert_eq!(action.target, "enemy1");
    assert_eq!(decision.movement.as_ref().unwrap().kind, ActionKind::MoveTo);
}

#[test]
fn unparseable_state_recovers_on_the_next_tick() {
    let json = r#"{"harvester_1":{"role":"harvester","state":"fleeing"}}"#;
    let mut memory = InMemoryStore::from_json(json).unwrap();
    let config = ColonyConfig::default();
    let name = AgentName::from("harvester_1");

    let mut world = busy_world(70);
    world.agents = vec![agent("harvester_1", 6, 6, 0)];
    let mut intents = IntentLog::new(&world);
    let first = run_tick(&world, &mut intents, &mut memory, &config);
    assert_eq!(first.failures.len(), 1);
    assert!(first.decisions.is_empty());
    let record = memory.get(&name).unwrap();
    assert_eq!(record.state(), Ok(Some(AgentState::Harvesting)));

    let mut world = busy_world(71);
    world.agents = vec![agent("harvester_1", 6, 6, 0)];
    let mut intents = IntentLog::new(&world);
    let second = run_tick(&world, &mut intents, &mut memory, &config);
    assert!(second.failures.is_empty(), "{:?}", second.failures);
    assert_eq!(second.decisions.len(), 1);
    assert_eq!(second.decisions[0].role, Role::Harvester);
}
