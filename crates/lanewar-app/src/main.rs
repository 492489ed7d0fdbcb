use std::path::PathBuf;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lanewar_app::config::AppConfig;
use lanewar_app::game_loop::{self, LoopExit};
use lanewar_app::input;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lanewar=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = AppConfig::load(path.as_deref())?;
    let exit_on_eof = config.exit_on_eof;
    info!(seed = config.match_config.seed, "starting match");

    let (cmd_tx, handle) = game_loop::spawn_game_loop(config, std::io::stdout())?;

    // Detached: a blocked stdin read must not keep the process alive.
    // `cmd_tx` stays held here so closing stdin only stops the loop when
    // `exit_on_eof` asks for it.
    input::spawn_stdin_reader(cmd_tx.clone(), exit_on_eof)?;

    let exit = handle
        .join()
        .map_err(|_| anyhow::anyhow!("game loop thread panicked"))?
        .context("game loop failed")?;
    drop(cmd_tx);

    match exit {
        LoopExit::MatchEnded(winner) => info!(%winner, "match over"),
        other => info!(?other, "game loop stopped"),
    }
    Ok(())
}
