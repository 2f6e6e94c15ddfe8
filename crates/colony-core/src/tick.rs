//! Tick cycle: the fixed sequence that drives the colony once per tick.
//!
//! Each tick runs through these phases:
//!
//! 1. **Reconcile** -- drop persisted records of dead agents (when
//!    `memory.reconcile_phase` is `before_spawn`, the default).
//! 2. **Spawn** -- schedule every idle production facility.
//! 3. **Agents** -- evaluate every live agent's role state machine, in
//!    enumeration order. A failing agent is logged and skipped.
//! 4. **Reconcile** -- the same pass, when `reconcile_phase` is
//!    `after_agents`.
//!
//! Everything is recomputed from the snapshot; nothing carries over from
//! one tick to the next except what is written to the memory store.

use colony_agents::{
    AgentDecision, InMemoryStore, MemoryStore, StoreError, evaluate, reconcile,
};
use colony_types::AgentName;
use colony_world::{IntentLog, IntentSink, Snapshot, WorldError, WorldView};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::{ColonyConfig, HostConfig, ReconcilePhase};
use crate::spawn::{SpawnCoordinator, SpawnReport};

/// Errors that can occur while running a tick against host files.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// The world snapshot could not be loaded.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// The memory store could not be loaded or saved.
    #[error("memory error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: StoreError,
    },

    /// Intents could not be serialized.
    #[error("failed to serialize intents: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// Intents could not be written.
    #[error("failed to write intents: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}

/// An agent that could not be evaluated this tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentFailure {
    /// The agent.
    pub agent: AgentName,
    /// What went wrong.
    pub error: String,
}

/// Summary of a single tick's execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TickSummary {
    /// The tick number that was executed.
    pub tick: u64,
    /// One report per production facility.
    pub spawns: Vec<SpawnReport>,
    /// One decision per successfully evaluated agent.
    pub decisions: Vec<AgentDecision>,
    /// Agents left idle because evaluation failed.
    pub failures: Vec<AgentFailure>,
    /// Names whose persisted records were deleted.
    pub reclaimed: Vec<AgentName>,
}

impl TickSummary {
    /// Number of accepted spawn requests.
    pub fn spawned(&self) -> usize {
        self.spawns.iter().filter(|r| r.spawned()).count()
    }
}

/// Run one tick against the given world, intent sink, and memory store.
pub fn run_tick(
    world: &dyn WorldView,
    intents: &mut dyn IntentSink,
    memory: &mut dyn MemoryStore,
    config: &ColonyConfig,
) -> TickSummary {
    let tick = world.tick();
    let phase = config.memory.reconcile_phase;
    info!(tick, agents = world.agents().len(), "tick start");

    let mut reclaimed = Vec::new();
    if phase == ReconcilePhase::BeforeSpawn {
        reclaimed = reconcile(world, memory);
    }

    let spawns = SpawnCoordinator::new(config).run(world, intents, memory);

    let behavior = config.behavior();
    let mut decisions = Vec::with_capacity(world.agents().len());
    let mut failures = Vec::new();
    for agent in world.agents() {
        match evaluate(world, intents, memory, agent, &behavior) {
            Ok(decision) => decisions.push(decision),
            Err(e) => {
                warn!(tick, agent = %agent.name, error = %e, "agent left idle");
                failures.push(AgentFailure {
                    agent: agent.name.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    if phase == ReconcilePhase::AfterAgents {
        reclaimed = reconcile(world, memory);
    }

    let summary = TickSummary {
        tick,
        spawns,
        decisions,
        failures,
        reclaimed,
    };
    info!(
        tick,
        spawned = summary.spawned(),
        evaluated = summary.decisions.len(),
        failed = summary.failures.len(),
        reclaimed = summary.reclaimed.len(),
        "tick complete"
    );
    summary
}

/// Run one tick from the files named in `host`.
///
/// Reads the snapshot and memory, runs [`run_tick`], then writes the
/// accepted intents and the updated memory back.
pub fn run_host_tick(host: &HostConfig, config: &ColonyConfig) -> Result<TickSummary, TickError> {
    let world = Snapshot::from_file(&host.snapshot_path)?;
    let mut memory = InMemoryStore::load(&host.memory_path)?;
    let mut intents = IntentLog::new(&world);

    let summary = run_tick(&world, &mut intents, &mut memory, config);

    let accepted = intents.into_accepted();
    std::fs::write(&host.intents_path, serde_json::to_string_pretty(&accepted)?)?;
    memory.save(&host.memory_path)?;
    info!(
        intents = accepted.len(),
        path = %host.intents_path.display(),
        "intents written"
    );
    Ok(summary)
}
