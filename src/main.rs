mod game;
mod game_loop;
mod snake;
mod term;

use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::{error, info};
use simplelog::{Config, LevelFilter, WriteLogger};

use crate::game::GameState;
use crate::game_loop::{FixedTicker, GameLoop};
use crate::term::{TermInput, TermManager};

/// Side of the square board, in pixels.
pub const BOARD_SIZE: i32 = 600;
/// Side of a single cell, in pixels.
pub const UNIT_SIZE: i32 = 25;
pub const GRID_CELLS: i32 = BOARD_SIZE / UNIT_SIZE;

#[derive(Parser)]
#[command(name = "snake")]
#[command(version, about = "Classic snake in the terminal")]
struct Cli {
    /// Milliseconds between game ticks
    #[arg(long, default_value = "150", value_parser = clap::value_parser!(u64).range(1..))]
    tick_ms: u64,

    /// File to write the log to
    #[arg(long, default_value = "snake.log")]
    log_file: PathBuf,

    /// Log debug events as well
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The terminal is in raw mode while playing, so log to a file
    let level = if cli.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    let log_file = File::create(&cli.log_file)
        .with_context(|| format!("Failed to create log file {}", cli.log_file.display()))?;
    WriteLogger::init(level, Config::default(), log_file)
        .map_err(|e| anyhow!("Failed to initialize logger: {}", e))?;

    info!("Starting snake, tick every {} ms", cli.tick_ms);

    let mut term = TermManager::new()?;
    term.setup()?;
    let played = play(&mut term, Duration::from_millis(cli.tick_ms));
    let restored = term.restore();

    info!("Exiting");
    finish(played, restored)
}

/// The game's own error wins over a failed terminal restore.
fn finish(played: Result<()>, restored: Result<()>) -> Result<()> {
    if let Err(e) = &played {
        error!("Game ended with an error: {:#}", e);
    }
    if let Err(e) = &restored {
        error!("Failed to restore the terminal: {:#}", e);
    }

    played.and(restored)
}

fn play(term: &mut TermManager, tick: Duration) -> Result<()> {
    if !term.show_intro()? {
        return Ok(());
    }

    let mut game = GameLoop::new(GameState::new(), FixedTicker::new(tick), TermInput, term);
    game.run()?;
    info!("Quit with score {}", game.state().score());
    Ok(())
}
