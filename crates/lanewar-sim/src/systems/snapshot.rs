//! Snapshot system: queries the ECS world and builds a complete MatchSnapshot.
//!
//! This system is read-only — it never modifies the world.

use hecs::World;

use lanewar_core::catalog::Catalog;
use lanewar_core::components::{Health, Position, Unit};
use lanewar_core::enums::Side;
use lanewar_core::events::MatchEvent;
use lanewar_core::state::{MatchSnapshot, SideView, SpawnOptionView, UnitView};
use lanewar_core::types::SimTime;

use crate::economy::Ledger;

/// Build a complete MatchSnapshot from the current match state.
pub fn build_snapshot(
    world: &World,
    catalog: &Catalog,
    ledger: &Ledger,
    time: &SimTime,
    running: bool,
    winner: Option<Side>,
    events: Vec<MatchEvent>,
) -> MatchSnapshot {
    MatchSnapshot {
        time: *time,
        running,
        winner,
        player: build_side(ledger, Side::Player),
        opponent: build_side(ledger, Side::Opponent),
        units: build_units(world, catalog),
        spawn_options: build_spawn_options(catalog, ledger),
        events,
    }
}

fn build_side(ledger: &Ledger, side: Side) -> SideView {
    let state = ledger.side(side);
    SideView {
        side,
        resource: state.resource,
        resource_cap: state.resource_cap,
        structures: state.structures,
    }
}

/// Build UnitView list in spawn order, with presentation data from the catalog.
fn build_units(world: &World, catalog: &Catalog) -> Vec<UnitView> {
    let mut units: Vec<UnitView> = world
        .query::<(&Unit, &Position, &Health)>()
        .iter()
        .filter_map(|(_, (unit, pos, health))| {
            let archetype = catalog.get(unit.archetype.as_str()).ok()?;
            Some(UnitView {
                id: unit.id,
                side: unit.side,
                archetype: unit.archetype.clone(),
                name: archetype.name.clone(),
                color: archetype.color.clone(),
                size: archetype.size,
                is_ranged: archetype.is_ranged(),
                lane: unit.lane,
                position: pos.0,
                hp: health.current,
                max_hp: health.max,
            })
        })
        .collect();

    units.sort_by_key(|u| u.id);
    units
}

/// Spawn button state, player entries first, catalog order within a side.
fn build_spawn_options(catalog: &Catalog, ledger: &Ledger) -> Vec<SpawnOptionView> {
    let mut options = Vec::with_capacity(catalog.len() * Side::ALL.len());
    for side in Side::ALL {
        for archetype in catalog.iter() {
            options.push(SpawnOptionView {
                side,
                archetype: archetype.id.clone(),
                name: archetype.name.clone(),
                cost: archetype.cost,
                affordable: ledger.can_afford(side, archetype),
                ready: ledger.is_ready(side, archetype),
                cooldown_remaining: ledger.cooldown(side, archetype.id.as_str()),
                cooldown_total: archetype.spawn_cooldown,
            });
        }
    }
    options
}
