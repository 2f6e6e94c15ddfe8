//! World objects as observed in a single tick's snapshot.
//!
//! The host owns every object here; the core only reads them. Each
//! category is its own struct, and the capability traits at the bottom
//! ([`Positioned`], [`Damageable`], [`ResourceContainer`]) are what the
//! selectors are written against.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{BodyPart, StructureKind};
use crate::ids::{AgentName, LocaleName, ObjectId};

/// Width and height of every locale grid.
pub const LOCALE_SIZE: u32 = 50;

/// A cell inside a locale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Position {
    /// The locale this cell belongs to.
    pub locale: LocaleName,
    /// Column, `0..LOCALE_SIZE`.
    pub x: u32,
    /// Row, `0..LOCALE_SIZE`.
    pub y: u32,
}

impl Position {
    /// Create a position.
    pub fn new(locale: impl Into<LocaleName>, x: u32, y: u32) -> Self {
        Self {
            locale: locale.into(),
            x,
            y,
        }
    }

    /// Chebyshev distance to `other`, or `None` across locales.
    pub fn range_to(&self, other: &Self) -> Option<u32> {
        if self.locale != other.locale {
            return None;
        }
        Some(self.x.abs_diff(other.x).max(self.y.abs_diff(other.y)))
    }

    /// In-bounds cells of the 8-neighbourhood around this position.
    pub fn neighbours(&self) -> Vec<Self> {
        let mut cells = Vec::with_capacity(8);
        for dy in [-1_i64, 0, 1] {
            for dx in [-1_i64, 0, 1] {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let x = i64::from(self.x).checked_add(dx);
                let y = i64::from(self.y).checked_add(dy);
                let (Some(x), Some(y)) = (x, y) else {
                    continue;
                };
                let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
                    continue;
                };
                if x < LOCALE_SIZE && y < LOCALE_SIZE {
                    cells.push(Self {
                        locale: self.locale.clone(),
                        x,
                        y,
                    });
                }
            }
        }
        cells
    }
}

impl core::fmt::Display for Position {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "[{} {},{}]", self.locale, self.x, self.y)
    }
}

/// Energy held by an agent or a structure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    /// Energy currently held.
    pub used: u32,
    /// Maximum energy.
    pub capacity: u32,
}

impl Store {
    /// Create a store.
    pub const fn new(used: u32, capacity: u32) -> Self {
        Self { used, capacity }
    }

    /// Remaining room.
    pub const fn free(&self) -> u32 {
        self.capacity.saturating_sub(self.used)
    }

    /// No room left.
    pub const fn is_full(&self) -> bool {
        self.free() == 0
    }

    /// Nothing held.
    pub const fn is_empty(&self) -> bool {
        self.used == 0
    }
}

/// A live, owned agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    /// Unique name; key of the persisted record.
    pub name: AgentName,
    /// Current cell.
    pub pos: Position,
    /// Carried energy.
    #[serde(default)]
    pub store: Store,
    /// Current hit points.
    pub hits: u32,
    /// Maximum hit points.
    pub hits_max: u32,
    /// Body composition.
    #[serde(default)]
    pub body: Vec<BodyPart>,
}

impl Agent {
    /// Number of parts of the given type.
    pub fn count_parts(&self, part: BodyPart) -> usize {
        self.body.iter().filter(|p| **p == part).count()
    }
}

/// A regenerating energy source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergySource {
    /// Object id.
    pub id: ObjectId,
    /// Cell.
    pub pos: Position,
    /// Energy remaining until the next regeneration.
    pub energy: u32,
    /// Energy after regeneration.
    pub energy_capacity: u32,
}

/// A completed structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structure {
    /// Object id.
    pub id: ObjectId,
    /// Cell.
    pub pos: Position,
    /// Structure type.
    pub kind: StructureKind,
    /// Whether the colony owns it. Roads and walls are never owned.
    #[serde(default)]
    pub owned: bool,
    /// Current hit points (0 for structures without hit points).
    #[serde(default)]
    pub hits: u32,
    /// Maximum hit points (0 for structures without hit points).
    #[serde(default)]
    pub hits_max: u32,
    /// Energy store, for structures that hold energy.
    #[serde(default)]
    pub store: Option<Store>,
    /// Production facilities only: currently producing an agent.
    #[serde(default)]
    pub busy: bool,
}

impl Structure {
    /// An owned spawn.
    pub fn is_production_facility(&self) -> bool {
        self.kind == StructureKind::Spawn && self.owned
    }
}

/// A pending construction site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructionSite {
    /// Object id.
    pub id: ObjectId,
    /// Cell.
    pub pos: Position,
    /// What the site will become.
    pub kind: StructureKind,
    /// Work done so far.
    #[serde(default)]
    pub progress: u32,
    /// Work required.
    #[serde(default)]
    pub progress_total: u32,
}

/// An agent not owned by the colony.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostileAgent {
    /// Object id.
    pub id: ObjectId,
    /// Cell.
    pub pos: Position,
    /// Current hit points.
    pub hits: u32,
    /// Maximum hit points.
    pub hits_max: u32,
}

/// A named positional flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    /// Flag name; unique across the world.
    pub name: String,
    /// Cell.
    pub pos: Position,
}

// ---------------------------------------------------------------------------
// Capability traits
// ---------------------------------------------------------------------------

/// Anything with a location.
pub trait Positioned {
    /// Current cell.
    fn pos(&self) -> &Position;
}

/// Anything with hit points.
pub trait Damageable {
    /// Current hit points.
    fn hits(&self) -> u32;
    /// Maximum hit points.
    fn hits_max(&self) -> u32;

    /// Strictly below maximum.
    fn is_damaged(&self) -> bool {
        self.hits() < self.hits_max()
    }
}

/// Anything holding energy.
pub trait ResourceContainer {
    /// The energy store, if any.
    fn energy_store(&self) -> Option<Store>;

    /// Room for more energy; zero for objects without a store.
    fn free_capacity(&self) -> u32 {
        self.energy_store().map_or(0, |s| s.free())
    }

    /// Energy held; zero for objects without a store.
    fn used_capacity(&self) -> u32 {
        self.energy_store().map_or(0, |s| s.used)
    }
}

macro_rules! impl_positioned {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Positioned for $ty {
                fn pos(&self) -> &Position {
                    &self.pos
                }
            }
        )+
    };
}

impl_positioned!(Agent, EnergySource, Structure, ConstructionSite, HostileAgent, Marker);

impl Positioned for Position {
    fn pos(&self) -> &Position {
        self
    }
}

impl Damageable for Structure {
    fn hits(&self) -> u32 {
        self.hits
    }
    fn hits_max(&self) -> u32 {
        self.hits_max
    }
}

impl Damageable for HostileAgent {
    fn hits(&self) -> u32 {
        self.hits
    }
    fn hits_max(&self) -> u32 {
        self.hits_max
    }
}

impl Damageable for Agent {
    fn hits(&self) -> u32 {
        self.hits
    }
    fn hits_max(&self) -> u32 {
        self.hits_max
    }
}

impl ResourceContainer for Structure {
    fn energy_store(&self) -> Option<Store> {
        self.store
    }
}

impl ResourceContainer for Agent {
    fn energy_store(&self) -> Option<Store> {
        Some(self.store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_is_chebyshev() {
        let a = Position::new("W1N1", 10, 10);
        let b = Position::new("W1N1", 13, 11);
        assert_eq!(a.range_to(&b), Some(3));
        assert_eq!(Position::new("W2N1", 10, 10).range_to(&a), None);
    }

    #[test]
    fn corner_has_three_neighbours() {
        assert_eq!(Position::new("W1N1", 0, 0).neighbours().len(), 3);
        assert_eq!(Position::new("W1N1", 49, 25).neighbours().len(), 5);
        assert_eq!(Position::new("W1N1", 25, 25).neighbours().len(), 8);
    }

    #[test]
    fn store_fullness() {
        assert!(Store::new(50, 50).is_full());
        assert!(Store::new(0, 50).is_empty());
        assert_eq!(Store::new(20, 50).free(), 30);
        assert_eq!(Store::new(70, 50).free(), 0);
    }

    #[test]
    fn structure_without_store_has_no_free_capacity() {
        let road = Structure {
            id: ObjectId::from("r1"),
            pos: Position::new("W1N1", 1, 1),
            kind: StructureKind::Road,
            owned: false,
            hits: 100,
            hits_max: 5000,
            store: None,
            busy: false,
        };
        assert_eq!(road.free_capacity(), 0);
        assert!(road.is_damaged());
    }
}
