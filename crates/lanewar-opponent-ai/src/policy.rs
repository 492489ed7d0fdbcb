//! Opponent deployment policy.
//!
//! Given the archetypes the opponent can currently deploy (affordable and
//! off cooldown, in catalog order), picks one and a lane. No ECS or
//! economy dependency; the caller filters candidates and commits the spawn.

use rand::Rng;

use lanewar_core::catalog::{ArchetypeId, UnitArchetype};
use lanewar_core::config::OpponentConfig;
use lanewar_core::enums::Lane;

use crate::schedule::DecisionClock;

/// Input to the policy for one tick.
pub struct OpponentContext<'a> {
    /// Elapsed match time.
    pub now: f64,
    /// Deployable archetypes, in catalog order.
    pub candidates: &'a [&'a UnitArchetype],
}

/// Output of the policy for one tick.
#[derive(Debug, Clone, PartialEq)]
pub enum OpponentDecision {
    /// Not yet time to act.
    Wait,
    /// Time to act, but nothing is deployable. The clock was still advanced.
    Skip,
    /// Attempt this spawn.
    Deploy { archetype: ArchetypeId, lane: Lane },
}

/// Evaluate the policy: gate on the clock, reschedule, then choose.
///
/// Draw order is fixed (interval, then archetype, then lane) so a seeded
/// generator reproduces the same decisions.
pub fn evaluate<R: Rng + ?Sized>(
    ctx: &OpponentContext<'_>,
    clock: &mut DecisionClock,
    config: &OpponentConfig,
    rng: &mut R,
) -> OpponentDecision {
    if !clock.is_due(ctx.now) {
        return OpponentDecision::Wait;
    }
    clock.reschedule(ctx.now, config, rng);

    let Some(chosen) = choose_archetype(ctx.candidates, config.cheapest_bias, rng) else {
        return OpponentDecision::Skip;
    };
    let lane = choose_lane(config.center_lane_bias, rng);

    OpponentDecision::Deploy {
        archetype: chosen.id.clone(),
        lane,
    }
}

/// Pick the cheapest candidate with probability `cheapest_bias`, otherwise
/// a uniformly random one. `None` if there are no candidates.
pub fn choose_archetype<'a, R: Rng + ?Sized>(
    candidates: &[&'a UnitArchetype],
    cheapest_bias: f64,
    rng: &mut R,
) -> Option<&'a UnitArchetype> {
    if candidates.is_empty() {
        return None;
    }
    if rng.gen::<f64>() < cheapest_bias {
        cheapest(candidates)
    } else {
        let idx = rng.gen_range(0..candidates.len());
        Some(candidates[idx])
    }
}

/// Lowest-cost candidate; equal costs resolve to the earliest in order.
pub fn cheapest<'a>(candidates: &[&'a UnitArchetype]) -> Option<&'a UnitArchetype> {
    let mut best: Option<&'a UnitArchetype> = None;
    for &candidate in candidates {
        match best {
            Some(current) if current.cost <= candidate.cost => {}
            _ => best = Some(candidate),
        }
    }
    best
}

/// Centre lane with probability `center_bias`, otherwise left or right
/// with equal probability.
pub fn choose_lane<R: Rng + ?Sized>(center_bias: f64, rng: &mut R) -> Lane {
    if rng.gen::<f64>() < center_bias {
        Lane::Center
    } else if rng.gen::<f64>() < 0.5 {
        Lane::Left
    } else {
        Lane::Right
    }
}
