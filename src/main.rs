//! Terminal player for the merge puzzle.
mod config;
mod input;
mod render;
mod terminal;

use std::{
    env,
    fs::File,
    io::{self, Write},
    sync::Mutex,
    thread,
};

use anyhow::{Context, Result};
use lib_2048::{controller, Game};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use config::{Command, Config, USAGE};
use input::KeyDecoder;
use render::RawMode;
use terminal::TerminalSurface;

/// Directions buffered between the key reader and the turn loop.
const INPUT_CAPACITY: usize = 16;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args: Vec<_> = env::args().skip(1).collect();
    let mut stdout = io::stdout();

    let config = match Config::from_env().with_args(&args) {
        Ok(Command::Play(config)) => config,
        Ok(Command::Help) => return Ok(stdout.write_all(USAGE.as_bytes())?),
        Err(err) => return Ok(writeln!(stdout, "{err}\n\n{USAGE}")?),
    };

    setup_logging(&config)?;

    let rng = match config.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let _raw_mode = RawMode::enable(&io::stdin()).context("failed to set up the terminal")?;

    let mut surface = TerminalSurface::new(stdout, config.slide, config.appear);
    surface.draw().context("failed to draw the board")?;

    let mut game = Game::new(surface, rng)?;

    let (tx, mut rx) = mpsc::channel(INPUT_CAPACITY);
    let decoder = KeyDecoder::new()?;

    thread::Builder::new()
        .name("input".to_owned())
        .spawn(move || {
            if let Err(err) = input::forward_keys(io::stdin(), decoder, &tx) {
                error!(%err, "failed to read keys");
            }
        })
        .context("failed to start the input thread")?;

    let finished = tokio::select! {
        phase = controller::run(&mut game, &mut rx) => Some(phase),
        _ = tokio::signal::ctrl_c() => None,
    };

    if let Some(err) = game.surface_mut().take_error() {
        return Err(err).context("failed to draw the board");
    }

    match finished {
        Some(phase) => {
            let phase = phase?;
            info!(?phase, turns = game.turns(), "game ended");
        }
        None => info!(turns = game.turns(), "interrupted"),
    }

    Ok(())
}

/// Logs go to `MERGE_2048_LOG` when set, since stdout belongs to the board.
fn setup_logging(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);

    match &config.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;

            subscriber
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => subscriber.with_writer(io::stderr).init(),
    }

    Ok(())
}
