//! Unit catalog: the immutable archetypes a side may deploy.
//!
//! Entries are plain data. Presentation layers keep their own mapping from
//! archetype id to widgets; nothing here refers to UI.

use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ATTACK_INTERVAL, RANGED_THRESHOLD};
use crate::error::{CatalogError, SpawnError};

/// Catalog key of a unit archetype (e.g. `"knight"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArchetypeId(pub String);

impl ArchetypeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ArchetypeId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl Borrow<str> for ArchetypeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArchetypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A deployable unit type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitArchetype {
    pub id: ArchetypeId,
    /// Display name.
    pub name: String,
    /// Display colour (CSS hex).
    pub color: String,
    /// Resource cost to deploy.
    pub cost: f64,
    /// Starting (and maximum) hit points of an instance.
    pub hp: f64,
    /// Damage per attack.
    pub damage: f64,
    /// Movement speed (world units per second).
    pub speed: f64,
    /// Collision / draw radius.
    pub size: f64,
    /// Attack range (world units).
    pub range: f64,
    /// Seconds between attacks of one instance.
    #[serde(default = "default_attack_interval")]
    pub attack_interval: f64,
    /// Seconds before the same side may deploy this archetype again.
    pub spawn_cooldown: f64,
}

fn default_attack_interval() -> f64 {
    DEFAULT_ATTACK_INTERVAL
}

impl UnitArchetype {
    /// Whether this archetype attacks from range.
    pub fn is_ranged(&self) -> bool {
        self.range > RANGED_THRESHOLD
    }
}

/// Ordered, id-unique collection of archetypes.
///
/// Order is significant: the opponent breaks cost ties by catalog order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<UnitArchetype>", into = "Vec<UnitArchetype>")]
pub struct Catalog {
    archetypes: Vec<UnitArchetype>,
}

impl Catalog {
    /// Build a catalog, rejecting empty lists and duplicate ids.
    pub fn new(archetypes: Vec<UnitArchetype>) -> Result<Self, CatalogError> {
        if archetypes.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::new();
        for archetype in &archetypes {
            if !seen.insert(archetype.id.as_str()) {
                return Err(CatalogError::DuplicateArchetype(archetype.id.clone()));
            }
        }
        Ok(Self { archetypes })
    }

    /// The standard five-unit roster.
    pub fn standard() -> Self {
        let entry = |id: &str,
                     name: &str,
                     cost: f64,
                     hp: f64,
                     damage: f64,
                     speed: f64,
                     size: f64,
                     range: f64,
                     color: &str,
                     spawn_cooldown: f64| UnitArchetype {
            id: id.into(),
            name: name.to_owned(),
            color: color.to_owned(),
            cost,
            hp,
            damage,
            speed,
            size,
            range,
            attack_interval: DEFAULT_ATTACK_INTERVAL,
            spawn_cooldown,
        };

        Self {
            archetypes: vec![
                entry("skirm", "Skirm", 2.0, 100.0, 18.0, 120.0, 8.0, 12.0, "#64b678", 1.8),
                entry("knight", "Knight", 3.0, 320.0, 48.0, 55.0, 14.0, 16.0, "#cfa57a", 2.8),
                entry("archer", "Archer", 3.0, 120.0, 30.0, 110.0, 8.0, 120.0, "#ffd86b", 2.6),
                entry("giant", "Giant", 5.0, 900.0, 90.0, 35.0, 18.0, 18.0, "#e66b5a", 5.0),
                entry("mage", "Mage", 4.0, 200.0, 60.0, 75.0, 12.0, 140.0, "#9a6be5", 3.8),
            ],
        }
    }

    /// Look up an archetype by id.
    pub fn get(&self, id: &str) -> Result<&UnitArchetype, SpawnError> {
        self.archetypes
            .iter()
            .find(|a| a.id.as_str() == id)
            .ok_or_else(|| SpawnError::UnknownArchetype(id.into()))
    }

    /// All archetypes in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &UnitArchetype> {
        self.archetypes.iter()
    }

    pub fn len(&self) -> usize {
        self.archetypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<Vec<UnitArchetype>> for Catalog {
    type Error = CatalogError;

    fn try_from(archetypes: Vec<UnitArchetype>) -> Result<Self, Self::Error> {
        Self::new(archetypes)
    }
}

impl From<Catalog> for Vec<UnitArchetype> {
    fn from(catalog: Catalog) -> Self {
        catalog.archetypes
    }
}
