//! Decision clock: when the opponent next gets to act.

use rand::Rng;
use serde::{Deserialize, Serialize};

use lanewar_core::config::OpponentConfig;

/// Single-timer state machine gating opponent decisions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecisionClock {
    /// Elapsed match time at which the next decision is due.
    pub next_decision_at: f64,
}

impl DecisionClock {
    /// A clock whose first decision falls at the configured opening time.
    pub fn new(config: &OpponentConfig) -> Self {
        Self {
            next_decision_at: config.first_decision_at,
        }
    }

    /// Whether a decision is due at `now`.
    pub fn is_due(&self, now: f64) -> bool {
        now >= self.next_decision_at
    }

    /// Push the next decision to `now` plus a uniform draw from the
    /// configured interval. Returns the new due time.
    pub fn reschedule<R: Rng + ?Sized>(
        &mut self,
        now: f64,
        config: &OpponentConfig,
        rng: &mut R,
    ) -> f64 {
        let interval = rng.gen_range(config.decision_interval_min..config.decision_interval_max);
        self.next_decision_at = now + interval;
        self.next_decision_at
    }
}
