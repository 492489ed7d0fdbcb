//! Core types and definitions for the LANEWAR simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! the unit catalog, components, commands, snapshots, events, config,
//! errors and constants. It has no dependency on any runtime framework.

pub mod catalog;
pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;
