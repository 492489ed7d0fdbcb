//! Simulation engine for LANEWAR.
//!
//! Owns the hecs ECS world of units, the economy ledger and the seeded RNG,
//! advances the match on `advance(dt)`, and produces `MatchSnapshot`s for
//! a renderer or HUD.

pub mod economy;
pub mod engine;
pub mod spawn;
pub mod systems;

pub use engine::MatchEngine;
pub use lanewar_core as core;

#[cfg(test)]
mod tests;
