//! Stdin command reader: one JSON `MatchCommand` per line.

use std::io::BufRead;
use std::sync::mpsc;
use std::thread::JoinHandle;

use anyhow::Context;
use tracing::{debug, warn};

use lanewar_core::commands::MatchCommand;

use crate::state::LoopCommand;

/// Parse one input line. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Option<Result<MatchCommand, serde_json::Error>> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(serde_json::from_str(trimmed))
}

/// Forward every command read from `reader` to the game loop. Malformed
/// lines are logged and skipped. Returns when input ends or the loop hangs
/// up; on end of input a Shutdown is sent if `exit_on_eof`.
pub fn read_commands<R: BufRead>(reader: R, tx: &mpsc::Sender<LoopCommand>, exit_on_eof: bool) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                warn!(%err, "stdin read failed");
                break;
            }
        };
        match parse_line(&line) {
            None => {}
            Some(Ok(command)) => {
                debug!(?command, "command received");
                if tx.send(LoopCommand::Match(command)).is_err() {
                    return;
                }
            }
            Some(Err(err)) => warn!(%err, line = line.as_str(), "malformed command"),
        }
    }

    if exit_on_eof {
        debug!("stdin closed, shutting down");
        let _ = tx.send(LoopCommand::Shutdown);
    }
}

/// Read commands from stdin on a dedicated thread.
pub fn spawn_stdin_reader(
    tx: mpsc::Sender<LoopCommand>,
    exit_on_eof: bool,
) -> anyhow::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("lanewar-stdin".into())
        .spawn(move || read_commands(std::io::stdin().lock(), &tx, exit_on_eof))
        .context("failed to spawn stdin reader thread")
}
