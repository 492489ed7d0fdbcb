//! Commands sent from a frontend to the match, and spawn outcomes.

use serde::{Deserialize, Serialize};

use crate::catalog::ArchetypeId;
use crate::enums::Lane;
use crate::error::SpawnRejection;
use crate::types::UnitId;

/// All actions a player-side frontend can request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MatchCommand {
    /// Deploy a unit for the player. Without a lane the last selected lane
    /// (or the centre lane) is used.
    Spawn {
        archetype: ArchetypeId,
        #[serde(default)]
        lane: Option<Lane>,
    },
    /// Record the lane the pointer last pointed at, for the next spawn.
    SelectLane { lane: Lane },
    /// Restart the match from its initial state.
    Reset,
}

/// Result of a well-formed spawn attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnResult {
    Spawned(UnitId),
    Rejected(SpawnRejection),
}

impl SpawnResult {
    pub fn is_spawned(&self) -> bool {
        matches!(self, SpawnResult::Spawned(_))
    }

    pub fn unit_id(&self) -> Option<UnitId> {
        match self {
            SpawnResult::Spawned(id) => Some(*id),
            SpawnResult::Rejected(_) => None,
        }
    }
}
