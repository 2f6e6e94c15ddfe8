//! Garbage collection of records left behind by dead agents.

use std::collections::BTreeSet;

use colony_types::AgentName;
use colony_world::WorldView;
use tracing::info;

use crate::memory::MemoryStore;

/// Delete every persisted record whose agent is no longer alive.
///
/// Returns the reclaimed names in key order. Records of live agents are
/// not touched.
pub fn reconcile(world: &dyn WorldView, memory: &mut dyn MemoryStore) -> Vec<AgentName> {
    let live: BTreeSet<&AgentName> = world.agents().iter().map(|a| &a.name).collect();
    let mut reclaimed = Vec::new();
    for name in memory.names() {
        if live.contains(&name) {
            continue;
        }
        if memory.delete(&name) {
            info!(tick = world.tick(), agent = %name, "clearing non-existing agent memory");
            reclaimed.push(name);
        }
    }
    reclaimed
}
