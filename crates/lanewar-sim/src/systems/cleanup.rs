//! Cleanup system: removes units whose hit points ran out.

use hecs::{Entity, World};

use lanewar_core::components::{Health, Unit};
use lanewar_core::events::MatchEvent;

/// Despawn every unit at or below zero hit points, whoever dealt the blow.
/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>, events: &mut Vec<MatchEvent>) {
    despawn_buffer.clear();

    let mut dead: Vec<(Entity, Unit)> = world
        .query::<(&Unit, &Health)>()
        .iter()
        .filter(|(_, (_, health))| !health.is_alive())
        .map(|(entity, (unit, _))| (entity, unit.clone()))
        .collect();
    dead.sort_unstable_by_key(|(_, unit)| unit.id);

    for (entity, unit) in dead {
        tracing::debug!(unit = %unit.id, side = %unit.side, archetype = %unit.archetype, "unit destroyed");
        events.push(MatchEvent::UnitDestroyed {
            unit_id: unit.id,
            side: unit.side,
            archetype: unit.archetype,
        });
        despawn_buffer.push(entity);
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
