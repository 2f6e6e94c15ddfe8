//! Attacker: clears hostiles, then marked structures, then guards home.

use std::num::NonZeroU32;

use colony_types::{Agent, AgentState, BodyPart};
use colony_world::{IntentSink, WorldView};
use tracing::debug;

use super::{ActionKind, Attempt, BehaviorConfig, Step, pursue};
use crate::targeting::{
    has_hostiles, select_attack_marker, select_home_facility, select_hostile, structure_at,
};

/// Hit points one attack part removes per tick.
const ATTACK_PART_DAMAGE: u32 = 30;

/// Expected damage per tick and the ticks needed to bring `hits` to zero.
///
/// The tick count is `None` for an agent with no attack parts.
fn siege_estimate(agent: &Agent, hits: u32) -> (u32, Option<u32>) {
    let parts = u32::try_from(agent.count_parts(BodyPart::Attack)).unwrap_or(u32::MAX);
    let damage = parts.saturating_mul(ATTACK_PART_DAMAGE);
    let ticks = NonZeroU32::new(damage).map(|d| hits.div_ceil(d.get()));
    (damage, ticks)
}

pub(super) fn step(
    world: &dyn WorldView,
    intents: &mut dyn IntentSink,
    agent: &Agent,
    state: AgentState,
    config: &BehaviorConfig,
) -> Step {
    match state {
        AgentState::Attacking => attacking(world, intents, agent, config),
        AgentState::Waiting => waiting(world, intents, agent, config),
        AgentState::Harvesting
        | AgentState::Delivering
        | AgentState::Upgrading
        | AgentState::Building
        | AgentState::Repairing => Step::hold(state),
    }
}

fn attacking(
    world: &dyn WorldView,
    intents: &mut dyn IntentSink,
    agent: &Agent,
    config: &BehaviorConfig,
) -> Step {
    let state = AgentState::Attacking;
    let locale = &agent.pos.locale;

    if let Some(hostile) = select_hostile(world, agent) {
        let outcome = intents.attack_hostile(agent, hostile);
        let action = Attempt::new(ActionKind::Attack, &hostile.id, outcome);
        return pursue(intents, agent, state, action, &hostile.pos);
    }

    let Some(marker) = select_attack_marker(world, locale, &config.attack_marker) else {
        return Step::transition(AgentState::Waiting);
    };
    if let Some(target) = structure_at(world, &marker.pos) {
        let (expected_damage, ticks_to_destroy) = siege_estimate(agent, target.hits);
        debug!(
            agent = %agent.name,
            target = %target.id,
            hits = target.hits,
            hits_max = target.hits_max,
            attack_parts = agent.count_parts(BodyPart::Attack),
            expected_damage,
            ticks_to_destroy = ?ticks_to_destroy,
            "attacking marked structure"
        );
        let outcome = intents.attack_structure(agent, target);
        let action = Attempt::new(ActionKind::Attack, &target.id, outcome);
        return pursue(intents, agent, state, action, &target.pos);
    }
    let outcome = intents.move_to(agent, &marker.pos);
    Step::acted(state, Attempt::new(ActionKind::MoveTo, &marker.pos, outcome))
}

fn waiting(
    world: &dyn WorldView,
    intents: &mut dyn IntentSink,
    agent: &Agent,
    config: &BehaviorConfig,
) -> Step {
    let state = AgentState::Waiting;
    let locale = &agent.pos.locale;

    if has_hostiles(world, locale)
        || select_attack_marker(world, locale, &config.attack_marker).is_some()
    {
        return Step::transition(AgentState::Attacking);
    }

    let Some(home) = select_home_facility(world, locale) else {
        return Step::hold(state);
    };
    let far = world
        .range(&agent.pos, &home.pos)
        .is_none_or(|r| r > config.guard_radius);
    if !far {
        return Step::hold(state);
    }
    let outcome = intents.move_to(agent, &home.pos);
    Step::acted(state, Attempt::new(ActionKind::MoveTo, &home.pos, outcome))
}
