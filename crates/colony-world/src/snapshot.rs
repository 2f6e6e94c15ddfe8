//! In-memory world snapshot.
//!
//! [`Snapshot`] is the concrete [`WorldView`] used by the tick binary and
//! by tests. It deserializes from the JSON the host dumps at tick start:
//!
//! ```json
//! {
//!   "tick": 1042,
//!   "agents": [ { "name": "harvester_1", "pos": { "locale": "W1N1", "x": 10, "y": 12 }, ... } ],
//!   "locales": {
//!     "W1N1": {
//!       "sources": [], "structures": [], "construction_sites": [],
//!       "hostiles": [], "markers": [],
//!       "terrain": { "walls": [[0, 0]], "swamps": [] }
//!     }
//!   }
//! }
//! ```
//!
//! Travel cost is the straight-line range inside a locale. Pathfinding is
//! the host's business; a host with real path costs supplies its own view.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use colony_types::{
    Agent, ConstructionSite, EnergySource, HostileAgent, LocaleName, Marker, Position, Structure,
    Terrain,
};
use serde::{Deserialize, Serialize};

use crate::error::WorldError;
use crate::view::WorldView;

/// Sparse terrain for one locale; unlisted cells are plain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainGrid {
    /// Impassable cells as `(x, y)`.
    #[serde(default)]
    pub walls: BTreeSet<(u32, u32)>,
    /// Swamp cells as `(x, y)`.
    #[serde(default)]
    pub swamps: BTreeSet<(u32, u32)>,
}

impl TerrainGrid {
    /// Terrain at `(x, y)`.
    pub fn at(&self, x: u32, y: u32) -> Terrain {
        if self.walls.contains(&(x, y)) {
            Terrain::Wall
        } else if self.swamps.contains(&(x, y)) {
            Terrain::Swamp
        } else {
            Terrain::Plain
        }
    }
}

/// Every object in one locale, in enumeration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleSnapshot {
    /// Energy sources.
    #[serde(default)]
    pub sources: Vec<EnergySource>,
    /// Completed structures.
    #[serde(default)]
    pub structures: Vec<Structure>,
    /// Pending construction sites.
    #[serde(default)]
    pub construction_sites: Vec<ConstructionSite>,
    /// Hostile agents.
    #[serde(default)]
    pub hostiles: Vec<HostileAgent>,
    /// Markers.
    #[serde(default)]
    pub markers: Vec<Marker>,
    /// Terrain.
    #[serde(default)]
    pub terrain: TerrainGrid,
}

/// A complete, read-only world state for one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Tick index.
    pub tick: u64,
    /// Live colony agents.
    #[serde(default)]
    pub agents: Vec<Agent>,
    /// Objects per locale.
    #[serde(default)]
    pub locales: BTreeMap<LocaleName, LocaleSnapshot>,
}

impl Snapshot {
    /// An empty world at the given tick.
    pub const fn new(tick: u64) -> Self {
        Self {
            tick,
            agents: Vec::new(),
            locales: BTreeMap::new(),
        }
    }

    /// Parse a snapshot from JSON and check that every object sits in the
    /// locale it is listed under.
    pub fn from_json(json: &str) -> Result<Self, WorldError> {
        let snapshot: Self = serde_json::from_str(json)?;
        snapshot.check_locales()?;
        Ok(snapshot)
    }

    /// Read and parse a snapshot file.
    pub fn from_file(path: &Path) -> Result<Self, WorldError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Mutable access to a locale, creating it if absent.
    pub fn locale_mut(&mut self, locale: impl Into<LocaleName>) -> &mut LocaleSnapshot {
        self.locales.entry(locale.into()).or_default()
    }

    fn locale(&self, locale: &LocaleName) -> Option<&LocaleSnapshot> {
        self.locales.get(locale)
    }

    fn check_locales(&self) -> Result<(), WorldError> {
        for (name, locale) in &self.locales {
            let positioned = locale
                .sources
                .iter()
                .map(|o| (o.id.as_str(), &o.pos))
                .chain(locale.structures.iter().map(|o| (o.id.as_str(), &o.pos)))
                .chain(locale.construction_sites.iter().map(|o| (o.id.as_str(), &o.pos)))
                .chain(locale.hostiles.iter().map(|o| (o.id.as_str(), &o.pos)))
                .chain(locale.markers.iter().map(|o| (o.name.as_str(), &o.pos)));
            for (id, pos) in positioned {
                if pos.locale != *name {
                    return Err(WorldError::LocaleMismatch {
                        id: id.to_owned(),
                        listed: name.to_string(),
                        actual: pos.locale.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl WorldView for Snapshot {
    fn tick(&self) -> u64 {
        self.tick
    }

    fn agents(&self) -> &[Agent] {
        &self.agents
    }

    fn locales(&self) -> Vec<&LocaleName> {
        self.locales.keys().collect()
    }

    fn sources(&self, locale: &LocaleName) -> &[EnergySource] {
        self.locale(locale)
            .map(|l| l.sources.as_slice())
            .unwrap_or_default()
    }

    fn structures(&self, locale: &LocaleName) -> &[Structure] {
        self.locale(locale)
            .map(|l| l.structures.as_slice())
            .unwrap_or_default()
    }

    fn construction_sites(&self, locale: &LocaleName) -> &[ConstructionSite] {
        self.locale(locale)
            .map(|l| l.construction_sites.as_slice())
            .unwrap_or_default()
    }

    fn hostiles(&self, locale: &LocaleName) -> &[HostileAgent] {
        self.locale(locale)
            .map(|l| l.hostiles.as_slice())
            .unwrap_or_default()
    }

    fn markers(&self, locale: &LocaleName) -> &[Marker] {
        self.locale(locale)
            .map(|l| l.markers.as_slice())
            .unwrap_or_default()
    }

    fn terrain(&self, pos: &Position) -> Terrain {
        self.locale(&pos.locale)
            .map_or(Terrain::Plain, |l| l.terrain.at(pos.x, pos.y))
    }

    fn travel_cost(&self, from: &Position, to: &Position) -> Option<u32> {
        from.range_to(to)
    }
}
