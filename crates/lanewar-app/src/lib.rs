//! LANEWAR headless driver.
//!
//! Wires the match engine to a fixed-rate game loop thread. Commands arrive
//! as JSON lines on stdin, snapshots leave as JSON lines on stdout.

pub mod config;
pub mod game_loop;
pub mod input;
pub mod state;

pub use lanewar_core as core;
