//! Target selection shared by every role.
//!
//! All selectors are pure functions of the world view and the asking
//! agent. Nearest-by-cost picks use [`WorldView::travel_cost`]: unreachable
//! candidates are skipped, ties go to the earlier candidate in enumeration
//! order, and when nothing is reachable the first candidate is returned so
//! a non-empty candidate set always yields a target.

use colony_types::{
    Agent, ConstructionSite, EnergySource, HostileAgent, LocaleName, Marker, Position, Positioned,
    ResourceContainer, Structure, StructureKind, Terrain,
};
use colony_world::{WorldView, extension_count};

/// Default name of the marker that designates an attack target.
pub const DEFAULT_ATTACK_MARKER: &str = "attack";

/// Roads are repaired only once below this fraction of their hit points,
/// expressed as `numerator / denominator`.
const ROAD_REPAIR_THRESHOLD: (u64, u64) = (3, 10);

/// Health fractions closer than `1 / REPAIR_FRACTION_BAND` are treated as
/// equal and ordered by distance instead.
const REPAIR_FRACTION_BAND: u64 = 10;

/// Pick the candidate with the lowest travel cost from `from`.
fn nearest<'a, T: Positioned>(
    world: &dyn WorldView,
    from: &Position,
    candidates: impl IntoIterator<Item = &'a T>,
) -> Option<&'a T> {
    let mut first = None;
    let mut best: Option<(&'a T, u32)> = None;
    for candidate in candidates {
        first.get_or_insert(candidate);
        let Some(cost) = world.travel_cost(from, candidate.pos()) else {
            continue;
        };
        if best.is_none_or(|(_, best_cost)| cost < best_cost) {
            best = Some((candidate, cost));
        }
    }
    best.map(|(c, _)| c).or(first)
}

/// Candidates ordered by ascending travel cost, stable on ties.
///
/// Unreachable candidates are dropped unless none is reachable, in which
/// case enumeration order is kept.
fn by_travel_cost<'a, T: Positioned>(
    world: &dyn WorldView,
    from: &Position,
    candidates: &'a [T],
) -> Vec<&'a T> {
    let mut reachable: Vec<(&'a T, u32)> = candidates
        .iter()
        .filter_map(|c| world.travel_cost(from, c.pos()).map(|cost| (c, cost)))
        .collect();
    if reachable.is_empty() {
        return candidates.iter().collect();
    }
    reachable.sort_by_key(|&(_, cost)| cost);
    reachable.into_iter().map(|(c, _)| c).collect()
}

/// Whether at least one cell around `source` can be stood on by `agent`.
fn has_free_adjacent_cell(world: &dyn WorldView, source: &EnergySource, agent: &Agent) -> bool {
    source.pos.neighbours().iter().any(|cell| {
        world.terrain(cell) != Terrain::Wall && !world.is_occupied(cell, Some(&agent.name))
    })
}

/// The source `agent` should harvest from.
///
/// Prefers the nearest source with a free adjacent cell and falls back to
/// the nearest source overall. `None` only when the locale has no sources.
pub fn select_harvest_source<'w>(
    world: &'w dyn WorldView,
    agent: &Agent,
) -> Option<&'w EnergySource> {
    let sources = world.sources(&agent.pos.locale);
    if sources.is_empty() {
        return None;
    }
    let available: Vec<&EnergySource> = sources
        .iter()
        .filter(|s| has_free_adjacent_cell(world, s, agent))
        .collect();
    if available.is_empty() {
        nearest(world, &agent.pos, sources)
    } else {
        nearest(world, &agent.pos, available)
    }
}

fn is_energy_sink(structure: &Structure) -> bool {
    matches!(
        structure.kind,
        StructureKind::Extension | StructureKind::Spawn | StructureKind::Tower
    ) && structure.free_capacity() > 0
}

/// The first spawn, extension, or tower in `locale` with room for energy.
///
/// This is enumeration order, not distance.
pub fn select_energy_sink<'w>(world: &'w dyn WorldView, locale: &LocaleName) -> Option<&'w Structure> {
    world.structures(locale).iter().find(|s| is_energy_sink(s))
}

/// Whether any energy sink in `locale` has room.
pub fn has_energy_sink_available(world: &dyn WorldView, locale: &LocaleName) -> bool {
    world.structures(locale).iter().any(is_energy_sink)
}

fn needs_repair(structure: &Structure) -> bool {
    if structure.owned && structure.hits < structure.hits_max {
        return true;
    }
    let (num, den) = ROAD_REPAIR_THRESHOLD;
    structure.kind == StructureKind::Road
        && u64::from(structure.hits).saturating_mul(den)
            < u64::from(structure.hits_max).saturating_mul(num)
}

/// Compare the health fraction `hits / max` against `other_hits / other_max`.
///
/// Returns `Some(true)` when the first is lower by more than the band,
/// `Some(false)` when the second is, and `None` when they fall within it.
fn lower_by_band(hits: u32, max: u32, other_hits: u32, other_max: u32) -> Option<bool> {
    // Structures without hit points count as fully healthy.
    let fraction = |h: u32, m: u32| if m == 0 { (1, 1) } else { (u64::from(h), u64::from(m)) };
    let (hits, max) = fraction(hits, max);
    let (other_hits, other_max) = fraction(other_hits, other_max);
    let lhs = hits.saturating_mul(other_max);
    let rhs = other_hits.saturating_mul(max);
    let gap = lhs.abs_diff(rhs).saturating_mul(REPAIR_FRACTION_BAND);
    if gap <= max.saturating_mul(other_max) {
        None
    } else {
        Some(lhs < rhs)
    }
}

/// The structure `agent` should repair next.
///
/// Owned damaged structures always qualify; roads qualify below 30% health.
/// A candidate beats the current best when its health fraction is lower by
/// more than 0.1, or when the fractions are within 0.1 and it is nearer.
/// The rule is not transitive, so this is a single left-to-right scan.
pub fn select_repair_target<'w>(world: &'w dyn WorldView, agent: &Agent) -> Option<&'w Structure> {
    let candidates = world
        .structures(&agent.pos.locale)
        .iter()
        .filter(|s| needs_repair(s))
        .map(|s| {
            let cost = world.travel_cost(&agent.pos, &s.pos).unwrap_or(u32::MAX);
            (s, cost)
        });

    let mut best: Option<(&Structure, u32)> = None;
    for (candidate, cost) in candidates {
        let Some((current, current_cost)) = best else {
            best = Some((candidate, cost));
            continue;
        };
        let replaces = lower_by_band(
            candidate.hits,
            candidate.hits_max,
            current.hits,
            current.hits_max,
        )
        .unwrap_or(cost < current_cost);
        if replaces {
            best = Some((candidate, cost));
        }
    }
    best.map(|(s, _)| s)
}

/// Whether anything in `locale` needs repair.
pub fn has_repairable(world: &dyn WorldView, locale: &LocaleName) -> bool {
    world.structures(locale).iter().any(needs_repair)
}

/// The construction site `agent` should build next.
///
/// Until the locale has an extension, extension sites come first and roads
/// second; afterwards roads come first. Within a kind the nearest wins, and
/// with neither kind present the nearest site of any kind is chosen.
pub fn select_build_target<'w>(
    world: &'w dyn WorldView,
    agent: &Agent,
) -> Option<&'w ConstructionSite> {
    let sorted = by_travel_cost(world, &agent.pos, world.construction_sites(&agent.pos.locale));
    let priority = if extension_count(world, &agent.pos.locale) > 0 {
        [StructureKind::Road, StructureKind::Extension]
    } else {
        [StructureKind::Extension, StructureKind::Road]
    };
    priority
        .iter()
        .find_map(|kind| sorted.iter().find(|site| site.kind == *kind))
        .or_else(|| sorted.first())
        .copied()
}

/// Whether `locale` has any pending construction site.
pub fn has_construction_sites(world: &dyn WorldView, locale: &LocaleName) -> bool {
    !world.construction_sites(locale).is_empty()
}

/// The nearest hostile agent in `agent`'s locale.
pub fn select_hostile<'w>(world: &'w dyn WorldView, agent: &Agent) -> Option<&'w HostileAgent> {
    nearest(world, &agent.pos, world.hostiles(&agent.pos.locale))
}

/// Whether `locale` holds any hostile agent.
pub fn has_hostiles(world: &dyn WorldView, locale: &LocaleName) -> bool {
    !world.hostiles(locale).is_empty()
}

/// The controller of `locale`.
pub fn select_controller<'w>(world: &'w dyn WorldView, locale: &LocaleName) -> Option<&'w Structure> {
    world
        .structures(locale)
        .iter()
        .find(|s| s.kind == StructureKind::Controller)
}

/// The first owned spawn in `locale`.
pub fn select_home_facility<'w>(
    world: &'w dyn WorldView,
    locale: &LocaleName,
) -> Option<&'w Structure> {
    world
        .structures(locale)
        .iter()
        .find(|s| s.is_production_facility())
}

/// The marker named exactly `name` in `locale`.
pub fn select_attack_marker<'w>(
    world: &'w dyn WorldView,
    locale: &LocaleName,
    name: &str,
) -> Option<&'w Marker> {
    world.markers(locale).iter().find(|m| m.name == name)
}

/// The first structure standing exactly on `pos`.
pub fn structure_at<'w>(world: &'w dyn WorldView, pos: &Position) -> Option<&'w Structure> {
    world.structures(&pos.locale).iter().find(|s| s.pos == *pos)
}
