//! Spawn resolution and the unit entity factory.
//!
//! `check` decides whether an attempt may proceed; `spawn_unit` creates the
//! entity. Charging the ledger sits between the two, in `MatchEngine`.

use hecs::World;

use lanewar_core::catalog::UnitArchetype;
use lanewar_core::components::{Attack, Health, Mobility, Position, Unit};
use lanewar_core::config::Battlefield;
use lanewar_core::enums::{Lane, Side};
use lanewar_core::error::SpawnRejection;
use lanewar_core::types::UnitId;

use crate::economy::Ledger;

/// Validate a spawn attempt against the match state and ledger.
/// Checks run in order and the first failure wins.
pub fn check(
    ledger: &Ledger,
    running: bool,
    side: Side,
    archetype: &UnitArchetype,
) -> Result<(), SpawnRejection> {
    if !running {
        return Err(SpawnRejection::MatchOver);
    }
    if !ledger.can_afford(side, archetype) {
        return Err(SpawnRejection::InsufficientResource);
    }
    if !ledger.is_ready(side, archetype) {
        return Err(SpawnRejection::OnCooldown);
    }
    Ok(())
}

/// Lane for a committed spawn: an explicit override, else (player only)
/// the pending pointer selection, else the centre lane. The pending
/// selection is consumed.
pub fn resolve_lane(side: Side, lane_override: Option<Lane>, selected: &mut Option<Lane>) -> Lane {
    let pending = match side {
        Side::Player => selected.take(),
        Side::Opponent => None,
    };
    lane_override.or(pending).unwrap_or(Lane::Center)
}

/// Create a unit entity at `side`'s spawn point in `lane`.
pub fn spawn_unit(
    world: &mut World,
    battlefield: &Battlefield,
    next_unit_id: &mut u32,
    side: Side,
    archetype: &UnitArchetype,
    lane: Lane,
) -> UnitId {
    let id = UnitId(*next_unit_id);
    *next_unit_id += 1;

    world.spawn((
        Unit {
            id,
            side,
            archetype: archetype.id.clone(),
            lane,
        },
        Position(battlefield.spawn_point(side, lane)),
        Health {
            current: archetype.hp,
            max: archetype.hp,
        },
        Attack {
            damage: archetype.damage,
            range: archetype.range,
            interval: archetype.attack_interval,
            last_attack: None,
        },
        Mobility {
            speed: archetype.speed,
        },
    ));

    id
}
