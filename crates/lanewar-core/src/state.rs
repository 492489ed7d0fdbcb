//! Match snapshot — the complete visible state handed to a renderer/HUD.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::catalog::ArchetypeId;
use crate::constants::LANE_COUNT;
use crate::enums::{Lane, Side};
use crate::events::MatchEvent;
use crate::types::{SimTime, UnitId};

/// Read-only view of a match after a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub time: SimTime,
    pub running: bool,
    pub winner: Option<Side>,
    pub player: SideView,
    pub opponent: SideView,
    /// Live units in spawn order.
    pub units: Vec<UnitView>,
    /// Spawn button state for every side and archetype, catalog order,
    /// player entries first.
    pub spawn_options: Vec<SpawnOptionView>,
    /// Events since the previous snapshot.
    pub events: Vec<MatchEvent>,
}

impl MatchSnapshot {
    pub fn side(&self, side: Side) -> &SideView {
        match side {
            Side::Player => &self.player,
            Side::Opponent => &self.opponent,
        }
    }

    /// Spawn button state for one side and archetype.
    pub fn spawn_option(&self, side: Side, archetype: &str) -> Option<&SpawnOptionView> {
        self.spawn_options
            .iter()
            .find(|o| o.side == side && o.archetype.as_str() == archetype)
    }
}

/// Economy and structures of one side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideView {
    pub side: Side,
    pub resource: f64,
    pub resource_cap: f64,
    /// Structure hit points by lane index.
    pub structures: [f64; LANE_COUNT],
}

/// A live unit, with what a renderer needs to draw it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitView {
    pub id: UnitId,
    pub side: Side,
    pub archetype: ArchetypeId,
    pub name: String,
    pub color: String,
    pub size: f64,
    pub is_ranged: bool,
    pub lane: Lane,
    pub position: DVec2,
    pub hp: f64,
    pub max_hp: f64,
}

/// Spawn availability of one archetype for one side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnOptionView {
    pub side: Side,
    pub archetype: ArchetypeId,
    pub name: String,
    pub cost: f64,
    pub affordable: bool,
    pub ready: bool,
    /// Seconds until the archetype is off cooldown.
    pub cooldown_remaining: f64,
    pub cooldown_total: f64,
}

impl SpawnOptionView {
    /// Whether the spawn button should be enabled.
    pub fn available(&self) -> bool {
        self.affordable && self.ready
    }
}
