//! Game loop thread: runs the match engine at a fixed frame rate and writes
//! snapshots as JSON lines.
//!
//! The engine is created inside this thread because it's cleaner for ownership.
//! Commands arrive via `mpsc` channel. Snapshots are written to the output
//! stream.

use std::io::Write;
use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use anyhow::Context;
use tracing::{debug, info, warn};

use lanewar_core::commands::{MatchCommand, SpawnResult};
use lanewar_core::constants::MAX_FRAME_DT;
use lanewar_core::enums::Side;
use lanewar_core::events::MatchEvent;
use lanewar_core::state::MatchSnapshot;
use lanewar_sim::MatchEngine;

use crate::config::AppConfig;
use crate::state::LoopCommand;

/// Why the game loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    MatchEnded(Side),
    MaxFrames,
    Shutdown,
    Disconnected,
}

/// Clamp wall-clock frame time to the simulation's maximum step.
pub fn clamp_dt(elapsed: Duration) -> f64 {
    elapsed.as_secs_f64().min(MAX_FRAME_DT)
}

/// One engine plus its output stream and frame bookkeeping.
pub struct GameLoop<W: Write> {
    engine: MatchEngine,
    config: AppConfig,
    frame: u64,
    /// Events drained since the last written snapshot.
    pending_events: Vec<MatchEvent>,
    out: W,
}

impl<W: Write> GameLoop<W> {
    pub fn new(config: AppConfig, out: W) -> anyhow::Result<Self> {
        let engine = MatchEngine::new(config.match_config.clone())
            .context("invalid match configuration")?;
        Ok(Self {
            engine,
            config,
            frame: 0,
            pending_events: Vec::new(),
            out,
        })
    }

    /// Apply one frontend command. Rejections and unknown archetypes are
    /// logged, never fatal.
    pub fn apply(&mut self, command: MatchCommand) {
        match self.engine.apply_command(command) {
            Ok(Some(SpawnResult::Rejected(reason))) => debug!(%reason, "player spawn rejected"),
            Ok(_) => {}
            Err(err) => warn!(%err, "ignoring command"),
        }
    }

    /// Advance one frame by `dt` seconds. The snapshot is written every
    /// `snapshot_every` frames and on the frame the match ends; events from
    /// skipped frames are carried into the next written snapshot.
    pub fn frame(&mut self, dt: f64) -> anyhow::Result<MatchSnapshot> {
        let mut snapshot = self.engine.tick(dt);
        self.frame += 1;
        self.pending_events.append(&mut snapshot.events);

        let due = self.frame % u64::from(self.config.snapshot_every) == 0;
        if due || !snapshot.running {
            snapshot.events = std::mem::take(&mut self.pending_events);
            serde_json::to_writer(&mut self.out, &snapshot).context("writing snapshot")?;
            self.out.write_all(b"\n").context("writing snapshot")?;
            self.out.flush().context("flushing snapshot")?;
        }
        Ok(snapshot)
    }

    pub fn engine(&self) -> &MatchEngine {
        &self.engine
    }

    pub fn frames(&self) -> u64 {
        self.frame
    }

    pub fn into_output(self) -> W {
        self.out
    }
}

/// Spawns the game loop in a new thread.
///
/// Returns the command sender and the thread's handle.
pub fn spawn_game_loop<W: Write + Send + 'static>(
    config: AppConfig,
    out: W,
) -> anyhow::Result<(mpsc::Sender<LoopCommand>, JoinHandle<anyhow::Result<LoopExit>>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<LoopCommand>();
    let mut game = GameLoop::new(config, out)?;

    let handle = std::thread::Builder::new()
        .name("lanewar-game-loop".into())
        .spawn(move || run_game_loop(&mut game, &cmd_rx))
        .context("failed to spawn game loop thread")?;

    Ok((cmd_tx, handle))
}

/// The game loop. Runs until the match ends, the frame limit is reached,
/// or a Shutdown command / channel disconnect.
fn run_game_loop<W: Write>(
    game: &mut GameLoop<W>,
    cmd_rx: &mpsc::Receiver<LoopCommand>,
) -> anyhow::Result<LoopExit> {
    let frame_duration = Duration::from_secs_f64(game.config.frame_secs());
    let fixed_dt = game.config.frame_secs().min(MAX_FRAME_DT);
    let realtime = game.config.realtime;
    let max_frames = game.config.max_frames;
    let mut last_frame = Instant::now();
    let mut next_frame_time = last_frame;

    info!(frame_rate = game.config.frame_rate, realtime, "game loop started");

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(LoopCommand::Match(cmd)) => game.apply(cmd),
                Ok(LoopCommand::Shutdown) => return Ok(LoopExit::Shutdown),
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return Ok(LoopExit::Disconnected),
            }
        }

        // 2. Advance one frame
        let dt = if realtime {
            let now = Instant::now();
            let dt = clamp_dt(now - last_frame);
            last_frame = now;
            dt
        } else {
            fixed_dt
        };
        let snapshot = game.frame(dt)?;
        if !snapshot.running {
            if let Some(winner) = snapshot.winner {
                return Ok(LoopExit::MatchEnded(winner));
            }
        }
        if max_frames.is_some_and(|max| game.frames() >= max) {
            return Ok(LoopExit::MaxFrames);
        }

        // 3. Sleep until next frame
        if realtime {
            next_frame_time += frame_duration;
            let now = Instant::now();
            if next_frame_time > now {
                std::thread::sleep(next_frame_time - now);
            } else if now - next_frame_time > frame_duration * 2 {
                // Too far behind; reset to avoid catch-up spiral
                next_frame_time = now;
            }
        }
    }
}
