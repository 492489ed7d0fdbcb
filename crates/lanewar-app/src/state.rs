//! Messages exchanged between the input reader and the game loop thread.

use lanewar_core::commands::MatchCommand;

/// Commands sent to the game loop thread.
#[derive(Debug)]
pub enum LoopCommand {
    /// A frontend command to apply to the match engine.
    Match(MatchCommand),
    /// Stop the game loop before the next frame.
    Shutdown,
}
