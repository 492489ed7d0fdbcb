//! Opponent AI for LANEWAR.
//!
//! Decides when the computer side deploys, which affordable archetype it
//! plays and into which lane. Pure functions over plain data and an
//! injected random source; the simulation crate applies the decisions.

pub mod policy;
pub mod schedule;

pub use lanewar_core as core;
