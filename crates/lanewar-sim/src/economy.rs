//! Economy & cooldown ledger.
//!
//! Per-side resource pools, structure hit points and per-archetype spawn
//! cooldowns. Stored on `MatchEngine`, NOT as ECS entities.

use std::collections::HashMap;

use lanewar_core::catalog::{Catalog, UnitArchetype};
use lanewar_core::config::EconomyConfig;
use lanewar_core::constants::LANE_COUNT;
use lanewar_core::enums::{Lane, Side};

/// Economy and structures of one side.
#[derive(Debug, Clone, PartialEq)]
pub struct SideState {
    pub resource: f64,
    pub resource_cap: f64,
    /// Structure hit points by lane index. May dip below zero in the tick a
    /// structure falls.
    pub structures: [f64; LANE_COUNT],
}

impl SideState {
    fn new(economy: &EconomyConfig) -> Self {
        Self {
            resource: economy.starting_resource.clamp(0.0, economy.resource_cap),
            resource_cap: economy.resource_cap,
            structures: [economy.structure_hp; LANE_COUNT],
        }
    }
}

/// Resource, structure and cooldown bookkeeping for both sides.
#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    regen_rate: f64,
    player: SideState,
    opponent: SideState,
    /// Remaining spawn cooldown (seconds) per archetype, one map per side.
    /// Holds an entry for every catalog archetype.
    player_cooldowns: HashMap<String, f64>,
    opponent_cooldowns: HashMap<String, f64>,
}

impl Ledger {
    /// Fresh ledger: starting resources, full structures, no cooldowns.
    pub fn new(economy: &EconomyConfig, catalog: &Catalog) -> Self {
        let zeroed: HashMap<String, f64> = catalog
            .iter()
            .map(|a| (a.id.as_str().to_owned(), 0.0))
            .collect();
        Self {
            regen_rate: economy.regen_rate,
            player: SideState::new(economy),
            opponent: SideState::new(economy),
            player_cooldowns: zeroed.clone(),
            opponent_cooldowns: zeroed,
        }
    }

    pub fn side(&self, side: Side) -> &SideState {
        match side {
            Side::Player => &self.player,
            Side::Opponent => &self.opponent,
        }
    }

    pub fn side_mut(&mut self, side: Side) -> &mut SideState {
        match side {
            Side::Player => &mut self.player,
            Side::Opponent => &mut self.opponent,
        }
    }

    fn cooldowns(&self, side: Side) -> &HashMap<String, f64> {
        match side {
            Side::Player => &self.player_cooldowns,
            Side::Opponent => &self.opponent_cooldowns,
        }
    }

    fn cooldowns_mut(&mut self, side: Side) -> &mut HashMap<String, f64> {
        match side {
            Side::Player => &mut self.player_cooldowns,
            Side::Opponent => &mut self.opponent_cooldowns,
        }
    }

    /// Add `regen_rate * dt` to the side's resource, clamped to `[0, cap]`.
    pub fn regenerate(&mut self, side: Side, dt: f64) {
        let gain = self.regen_rate * dt;
        let state = self.side_mut(side);
        state.resource = (state.resource + gain).clamp(0.0, state.resource_cap);
    }

    /// Count every cooldown of the side down by `dt`, floored at zero.
    pub fn tick_cooldowns(&mut self, side: Side, dt: f64) {
        for remaining in self.cooldowns_mut(side).values_mut() {
            *remaining = (*remaining - dt).max(0.0);
        }
    }

    pub fn can_afford(&self, side: Side, archetype: &UnitArchetype) -> bool {
        self.side(side).resource >= archetype.cost
    }

    pub fn is_ready(&self, side: Side, archetype: &UnitArchetype) -> bool {
        self.cooldown(side, archetype.id.as_str()) <= 0.0
    }

    /// Remaining cooldown in seconds (zero for ids outside the catalog).
    pub fn cooldown(&self, side: Side, archetype_id: &str) -> f64 {
        self.cooldowns(side).get(archetype_id).copied().unwrap_or(0.0)
    }

    /// Pay for a committed spawn: deduct the cost and start the cooldown.
    /// Callers check `can_afford` first.
    pub fn charge(&mut self, side: Side, archetype: &UnitArchetype) {
        let state = self.side_mut(side);
        state.resource = (state.resource - archetype.cost).max(0.0);
        self.set_cooldown(side, archetype.id.as_str(), archetype.spawn_cooldown);
    }

    /// Overwrite a cooldown (negative values are stored as zero).
    pub fn set_cooldown(&mut self, side: Side, archetype_id: &str, secs: f64) {
        if let Some(remaining) = self.cooldowns_mut(side).get_mut(archetype_id) {
            *remaining = secs.max(0.0);
        }
    }

    /// Apply damage to `owner`'s structure in `lane`. Returns the remaining
    /// hit points, which may be negative.
    pub fn damage_structure(&mut self, owner: Side, lane: Lane, damage: f64) -> f64 {
        let hp = &mut self.side_mut(owner).structures[lane.index()];
        *hp -= damage;
        *hp
    }
}
