//! Harvester, upgrader, builder, and maintainer.
//!
//! All four alternate between harvesting and one role-specific spend
//! state, with upgrading as the shared fallback when there is nothing to
//! spend energy on.

use colony_types::{Agent, AgentState, Role};
use colony_world::{IntentSink, WorldView};
use tracing::debug;

use super::{ActionKind, Attempt, Step, pursue};
use crate::targeting::{
    has_construction_sites, has_energy_sink_available, has_repairable, select_build_target,
    select_controller, select_energy_sink, select_harvest_source, select_repair_target,
};

/// The state a full worker moves into when it has something to spend on.
const fn spend_state(role: Role) -> AgentState {
    match role {
        Role::Harvester => AgentState::Delivering,
        Role::Builder => AgentState::Building,
        Role::Maintainer => AgentState::Repairing,
        Role::Upgrader | Role::Attacker => AgentState::Upgrading,
    }
}

/// Whether the target category of `state` exists in the agent's locale.
fn spend_available(world: &dyn WorldView, agent: &Agent, state: AgentState) -> bool {
    let locale = &agent.pos.locale;
    match state {
        AgentState::Delivering => has_energy_sink_available(world, locale),
        AgentState::Building => has_construction_sites(world, locale),
        AgentState::Repairing => has_repairable(world, locale),
        AgentState::Upgrading => true,
        AgentState::Harvesting | AgentState::Attacking | AgentState::Waiting => false,
    }
}

pub(super) fn step(
    world: &dyn WorldView,
    intents: &mut dyn IntentSink,
    agent: &Agent,
    role: Role,
    state: AgentState,
) -> Step {
    match state {
        AgentState::Harvesting => harvesting(world, intents, agent, role),
        AgentState::Upgrading => upgrading(world, intents, agent),
        AgentState::Delivering | AgentState::Building | AgentState::Repairing => {
            spending(world, intents, agent, state)
        }
        AgentState::Attacking | AgentState::Waiting => Step::hold(state),
    }
}

fn harvesting(
    world: &dyn WorldView,
    intents: &mut dyn IntentSink,
    agent: &Agent,
    role: Role,
) -> Step {
    let state = AgentState::Harvesting;
    if agent.store.is_full() {
        let spend = spend_state(role);
        if spend_available(world, agent, spend) {
            return Step::transition(spend);
        }
        debug!(agent = %agent.name, %spend, "nothing to spend on, upgrading instead");
        return Step::transition(AgentState::Upgrading);
    }

    let Some(source) = select_harvest_source(world, agent) else {
        debug!(agent = %agent.name, "no source to harvest");
        return Step::hold(state);
    };
    let outcome = intents.harvest(agent, source);
    let action = Attempt::new(ActionKind::Harvest, &source.id, outcome);
    pursue(intents, agent, state, action, &source.pos)
}

fn spending(
    world: &dyn WorldView,
    intents: &mut dyn IntentSink,
    agent: &Agent,
    state: AgentState,
) -> Step {
    if agent.store.is_empty() {
        return Step::transition(AgentState::Harvesting);
    }
    if !spend_available(world, agent, state) {
        debug!(agent = %agent.name, %state, "target category gone, upgrading instead");
        return Step::transition(AgentState::Upgrading);
    }

    match state {
        AgentState::Delivering => {
            let Some(sink) = select_energy_sink(world, &agent.pos.locale) else {
                return Step::hold(state);
            };
            let outcome = intents.transfer(agent, sink);
            let action = Attempt::new(ActionKind::Transfer, &sink.id, outcome);
            pursue(intents, agent, state, action, &sink.pos)
        }
        AgentState::Building => {
            let Some(site) = select_build_target(world, agent) else {
                return Step::hold(state);
            };
            let outcome = intents.build(agent, site);
            let action = Attempt::new(ActionKind::Build, &site.id, outcome);
            pursue(intents, agent, state, action, &site.pos)
        }
        AgentState::Repairing => {
            let Some(target) = select_repair_target(world, agent) else {
                return Step::hold(state);
            };
            let outcome = intents.repair(agent, target);
            let action = Attempt::new(ActionKind::Repair, &target.id, outcome);
            pursue(intents, agent, state, action, &target.pos)
        }
        AgentState::Harvesting
        | AgentState::Upgrading
        | AgentState::Attacking
        | AgentState::Waiting => Step::hold(state),
    }
}

fn upgrading(world: &dyn WorldView, intents: &mut dyn IntentSink, agent: &Agent) -> Step {
    let state = AgentState::Upgrading;
    if agent.store.is_empty() {
        return Step::transition(AgentState::Harvesting);
    }
    let Some(controller) = select_controller(world, &agent.pos.locale) else {
        debug!(agent = %agent.name, "no controller to upgrade");
        return Step::hold(state);
    };
    let outcome = intents.upgrade(agent, controller);
    let action = Attempt::new(ActionKind::Upgrade, &controller.id, outcome);
    pursue(intents, agent, state, action, &controller.pos)
}
