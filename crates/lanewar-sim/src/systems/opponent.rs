//! Opponent system — asks the opponent policy for a decision each tick.
//!
//! Filters the catalog down to what the opponent can deploy right now and
//! hands it to `lanewar-opponent-ai`. The engine routes a `Deploy` through
//! the normal spawn path.

use rand_chacha::ChaCha8Rng;

use lanewar_core::catalog::{Catalog, UnitArchetype};
use lanewar_core::config::OpponentConfig;
use lanewar_core::enums::Side;

use lanewar_opponent_ai::policy::{evaluate, OpponentContext, OpponentDecision};
use lanewar_opponent_ai::schedule::DecisionClock;

use crate::economy::Ledger;

pub fn run(
    catalog: &Catalog,
    ledger: &Ledger,
    clock: &mut DecisionClock,
    config: &OpponentConfig,
    rng: &mut ChaCha8Rng,
    now: f64,
) -> OpponentDecision {
    if !config.enabled || !clock.is_due(now) {
        return OpponentDecision::Wait;
    }

    let candidates: Vec<&UnitArchetype> = catalog
        .iter()
        .filter(|a| ledger.can_afford(Side::Opponent, a) && ledger.is_ready(Side::Opponent, a))
        .collect();

    let ctx = OpponentContext {
        now,
        candidates: &candidates,
    };
    let decision = evaluate(&ctx, clock, config, rng);
    tracing::trace!(?decision, next_at = clock.next_decision_at, "opponent decision");
    decision
}
