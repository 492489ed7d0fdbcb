//! Match configuration.
//!
//! Every section has a `Default` reproducing the standard match, and every
//! field may be omitted from a JSON config file.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::constants::*;
use crate::enums::{Lane, Side};
use crate::error::ConfigError;

/// Field geometry. The player's home line is at the bottom (large `y`),
/// the opponent's at the top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Battlefield {
    pub width: f64,
    pub height: f64,
    /// Lane centre lines as fractions of `width`.
    pub lane_x_fractions: [f64; LANE_COUNT],
    /// Distance from the top/bottom edge to each home line.
    pub home_edge_inset: f64,
    /// Lateral spawn offset from the lane centre line.
    pub spawn_lateral_offset: f64,
}

impl Default for Battlefield {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
            lane_x_fractions: LANE_X_FRACTIONS,
            home_edge_inset: HOME_EDGE_INSET,
            spawn_lateral_offset: SPAWN_LATERAL_OFFSET,
        }
    }
}

impl Battlefield {
    /// X coordinate of a lane's centre line.
    pub fn lane_x(&self, lane: Lane) -> f64 {
        self.width * self.lane_x_fractions[lane.index()]
    }

    /// Y coordinate of a side's home line.
    pub fn home_y(&self, side: Side) -> f64 {
        match side {
            Side::Player => self.height - self.home_edge_inset,
            Side::Opponent => self.home_edge_inset,
        }
    }

    /// Position of `owner`'s structure in `lane`.
    pub fn structure_position(&self, owner: Side, lane: Lane) -> DVec2 {
        DVec2::new(self.lane_x(lane), self.home_y(owner))
    }

    /// Where a unit of `side` enters `lane`: on the home line, offset from
    /// the centre line so same-lane spawns of the two sides never coincide.
    pub fn spawn_point(&self, side: Side, lane: Lane) -> DVec2 {
        let offset = match side {
            Side::Player => -self.spawn_lateral_offset,
            Side::Opponent => self.spawn_lateral_offset,
        };
        DVec2::new(self.lane_x(lane) + offset, self.home_y(side))
    }

    /// Lane whose centre line is nearest to `x` (first lane wins ties).
    pub fn lane_at_x(&self, x: f64) -> Lane {
        let mut best = Lane::Center;
        let mut best_dist = f64::INFINITY;
        for lane in Lane::ALL {
            let dist = (self.lane_x(lane) - x).abs();
            if dist < best_dist {
                best_dist = dist;
                best = lane;
            }
        }
        best
    }
}

/// Resource and structure parameters, shared by both sides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    pub starting_resource: f64,
    pub resource_cap: f64,
    /// Resource regenerated per second.
    pub regen_rate: f64,
    pub structure_hp: f64,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_resource: STARTING_RESOURCE,
            resource_cap: RESOURCE_CAP,
            regen_rate: RESOURCE_REGEN_RATE,
            structure_hp: STRUCTURE_START_HP,
        }
    }
}

/// Opponent decision policy knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpponentConfig {
    /// When `false` the opponent never deploys on its own.
    pub enabled: bool,
    pub first_decision_at: f64,
    pub decision_interval_min: f64,
    pub decision_interval_max: f64,
    /// Probability of playing the cheapest candidate.
    pub cheapest_bias: f64,
    /// Probability of deploying to the centre lane.
    pub center_lane_bias: f64,
    /// Upper bound of the random cooldown seeded per archetype at match start.
    pub opening_cooldown_jitter: f64,
}

impl Default for OpponentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            first_decision_at: OPPONENT_FIRST_DECISION_AT,
            decision_interval_min: OPPONENT_DECISION_INTERVAL_MIN,
            decision_interval_max: OPPONENT_DECISION_INTERVAL_MAX,
            cheapest_bias: OPPONENT_CHEAPEST_BIAS,
            center_lane_bias: OPPONENT_CENTER_LANE_BIAS,
            opening_cooldown_jitter: OPPONENT_OPENING_COOLDOWN_JITTER,
        }
    }
}

/// Configuration for starting a new match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// RNG seed for determinism. Same seed and inputs = same match.
    pub seed: u64,
    pub battlefield: Battlefield,
    pub economy: EconomyConfig,
    pub opponent: OpponentConfig,
    pub catalog: Catalog,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            battlefield: Battlefield::default(),
            economy: EconomyConfig::default(),
            opponent: OpponentConfig::default(),
            catalog: Catalog::standard(),
        }
    }
}

impl MatchConfig {
    /// Parse and validate a JSON config. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: MatchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| -> Result<(), ConfigError> {
            Err(ConfigError::Invalid(msg.to_owned()))
        };

        if !(self.battlefield.width > 0.0 && self.battlefield.height > 0.0) {
            return invalid("battlefield dimensions must be positive");
        }
        if self.battlefield.home_edge_inset * 2.0 >= self.battlefield.height {
            return invalid("home lines overlap");
        }
        if !(self.economy.resource_cap >= 0.0 && self.economy.resource_cap.is_finite())
            || !(self.economy.regen_rate >= 0.0 && self.economy.regen_rate.is_finite())
        {
            return invalid("resource cap and regen rate must be finite and non-negative");
        }
        if !(0.0..=self.economy.resource_cap).contains(&self.economy.starting_resource) {
            return invalid("starting resource must lie within [0, cap]");
        }
        if !(self.economy.structure_hp > 0.0 && self.economy.structure_hp.is_finite()) {
            return invalid("structure hp must be finite and positive");
        }
        let o = &self.opponent;
        if !(o.decision_interval_min > 0.0
            && o.decision_interval_min < o.decision_interval_max
            && o.decision_interval_max.is_finite())
        {
            return invalid("opponent decision interval must be a finite, non-empty positive range");
        }
        if !(o.first_decision_at >= 0.0 && o.first_decision_at.is_finite()) {
            return invalid("first opponent decision must be a finite, non-negative time");
        }
        if !(0.0..=1.0).contains(&o.cheapest_bias) || !(0.0..=1.0).contains(&o.center_lane_bias) {
            return invalid("opponent biases must be probabilities");
        }
        if !(o.opening_cooldown_jitter >= 0.0 && o.opening_cooldown_jitter.is_finite()) {
            return invalid("opening cooldown jitter must be finite and non-negative");
        }
        for archetype in self.catalog.iter() {
            let stats = [
                archetype.cost,
                archetype.hp,
                archetype.damage,
                archetype.speed,
                archetype.range,
                archetype.attack_interval,
                archetype.spawn_cooldown,
            ];
            if stats.iter().any(|v| !v.is_finite())
                || archetype.cost < 0.0
                || archetype.hp <= 0.0
                || archetype.spawn_cooldown < 0.0
                || archetype.attack_interval < 0.0
            {
                return Err(ConfigError::Invalid(format!(
                    "archetype `{}` has out-of-range stats",
                    archetype.id
                )));
            }
        }
        Ok(())
    }
}
