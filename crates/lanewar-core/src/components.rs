//! ECS components for hecs unit entities.
//!
//! Components are plain data structs.
//! Game logic lives in systems, not components.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::catalog::ArchetypeId;
use crate::enums::{Lane, Side};
use crate::types::UnitId;

/// Identity of a unit instance: who owns it, what it is, where it fights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub side: Side,
    pub archetype: ArchetypeId,
    pub lane: Lane,
}

/// Continuous position on the battlefield.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position(pub DVec2);

/// Hit points. A unit at or below zero is removed at the end of the tick.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Health {
    pub current: f64,
    pub max: f64,
}

impl Health {
    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }
}

/// Offensive stats copied from the archetype at spawn, plus the attack clock.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Attack {
    pub damage: f64,
    pub range: f64,
    /// Seconds between attacks of this instance.
    pub interval: f64,
    /// Elapsed time of the last attack; `None` until the first one.
    pub last_attack: Option<f64>,
}

impl Attack {
    /// Whether the attack clock allows an attack at `now`.
    pub fn ready_at(&self, now: f64) -> bool {
        match self.last_attack {
            None => true,
            Some(last) => now - last >= self.interval,
        }
    }
}

/// Movement speed (world units per second).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Mobility {
    pub speed: f64,
}
