//! Events emitted by the simulation for UI and audio feedback.
//!
//! Events carry no kill attribution: a unit is destroyed because its hit
//! points ran out, not because of a particular attacker.

use serde::{Deserialize, Serialize};

use crate::catalog::ArchetypeId;
use crate::enums::{Lane, Side};
use crate::error::SpawnRejection;
use crate::types::UnitId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MatchEvent {
    /// A unit entered the field.
    UnitSpawned {
        unit_id: UnitId,
        side: Side,
        archetype: ArchetypeId,
        lane: Lane,
    },
    /// A spawn attempt was refused (e.g. flash the button).
    SpawnRejected {
        side: Side,
        archetype: ArchetypeId,
        reason: SpawnRejection,
    },
    /// A unit was removed after its hit points ran out.
    UnitDestroyed {
        unit_id: UnitId,
        side: Side,
        archetype: ArchetypeId,
    },
    /// A structure took a hit.
    StructureDamaged {
        side: Side,
        lane: Lane,
        damage: f64,
        remaining: f64,
    },
    /// A structure fell and the match is decided.
    MatchEnded {
        winner: Side,
        destroyed_side: Side,
        destroyed_lane: Lane,
    },
}
