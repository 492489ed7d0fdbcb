//! Systems that operate on the match each tick.
//!
//! Systems are plain functions over the hecs world and the ledger.
//! They do not own state — all state lives on `MatchEngine`.

pub mod cleanup;
pub mod combat;
pub mod opponent;
pub mod snapshot;
pub mod victory;
