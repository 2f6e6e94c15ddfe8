//! The read surface: what the core may observe during a tick.
//!
//! Every query is answered from one snapshot taken at tick start. Slices
//! are returned in the host's native enumeration order, which selectors
//! rely on for first-match and tie-breaking behavior.

use colony_types::{
    Agent, AgentName, ConstructionSite, EnergySource, HostileAgent, LocaleName, Marker, Position,
    ResourceContainer, Store, Structure, StructureKind, Terrain,
};

/// Read-only view of one tick's world state.
pub trait WorldView {
    /// Current tick index.
    fn tick(&self) -> u64;

    /// All live colony agents.
    fn agents(&self) -> &[Agent];

    /// Every locale the snapshot covers.
    fn locales(&self) -> Vec<&LocaleName>;

    /// Energy sources in a locale.
    fn sources(&self, locale: &LocaleName) -> &[EnergySource];

    /// Completed structures in a locale.
    fn structures(&self, locale: &LocaleName) -> &[Structure];

    /// Pending construction sites in a locale.
    fn construction_sites(&self, locale: &LocaleName) -> &[ConstructionSite];

    /// Hostile agents in a locale.
    fn hostiles(&self, locale: &LocaleName) -> &[HostileAgent];

    /// Markers in a locale.
    fn markers(&self, locale: &LocaleName) -> &[Marker];

    /// Terrain at a cell.
    fn terrain(&self, pos: &Position) -> Terrain;

    /// Estimated cost of travelling between two cells, `None` if unreachable.
    fn travel_cost(&self, from: &Position, to: &Position) -> Option<u32>;

    /// Straight-line range between two cells, `None` across locales.
    fn range(&self, from: &Position, to: &Position) -> Option<u32> {
        from.range_to(to)
    }

    /// Whether a cell holds an agent or a structure.
    ///
    /// `except` excludes one colony agent from the check, so an agent never
    /// blocks its own cell.
    fn is_occupied(&self, pos: &Position, except: Option<&AgentName>) -> bool {
        let agent_here = self
            .agents()
            .iter()
            .any(|a| a.pos == *pos && Some(&a.name) != except);
        agent_here
            || self.hostiles(&pos.locale).iter().any(|h| h.pos == *pos)
            || self.structures(&pos.locale).iter().any(|s| s.pos == *pos)
    }

    /// Owned production facilities across every locale.
    fn facilities(&self) -> Vec<&Structure> {
        self.locales()
            .into_iter()
            .flat_map(|locale| self.structures(locale))
            .filter(|s| s.is_production_facility())
            .collect()
    }

    /// Look up a live agent by name.
    fn agent(&self, name: &AgentName) -> Option<&Agent> {
        self.agents().iter().find(|a| a.name == *name)
    }
}

/// Energy available for producing agents in a locale.
///
/// Sums the stores of owned spawns and of every extension in the locale;
/// `used` is what a spawn request may spend this tick, `capacity` is the
/// pool ceiling.
pub fn spawn_pool(world: &dyn WorldView, locale: &LocaleName) -> Store {
    world
        .structures(locale)
        .iter()
        .filter(|s| match s.kind {
            StructureKind::Spawn => s.owned,
            StructureKind::Extension => true,
            _ => false,
        })
        .fold(Store::default(), |acc, s| Store {
            used: acc.used.saturating_add(s.used_capacity()),
            capacity: acc
                .capacity
                .saturating_add(s.energy_store().map_or(0, |store| store.capacity)),
        })
}

/// Number of completed extensions in a locale, whoever owns them.
pub fn extension_count(world: &dyn WorldView, locale: &LocaleName) -> usize {
    world
        .structures(locale)
        .iter()
        .filter(|s| s.kind == StructureKind::Extension)
        .count()
}
