//! The turn loop.
//!
//! A [`Game`] owns the grid, the visual surface and the spawn RNG. Each legal
//! direction consumes a turn: the move is resolved, one tile spawns, and the
//! board is checked for a remaining move.

use core_2048::{AnimationEnd, Direction, GameError, Grid, Position, Result, Surface, Tile};
use rand::Rng;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::resolver::{self, MoveOutcome};

/// Tiles spawned before the first turn.
pub const INITIAL_TILES: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    AwaitingInput,
    Resolving,
    SpawnCheck,
    GameOver,
}

/// Result of one [`Game::play`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Turn {
    /// The direction had no legal move; nothing changed.
    Ignored,
    /// The move resolved and a tile spawned at `spawned`.
    Moved {
        outcome: MoveOutcome,
        spawned: Position,
    },
    /// As `Moved`, but the board has no move left.
    Lost {
        outcome: MoveOutcome,
        spawned: Position,
    },
    /// The game was already over.
    Finished,
}

impl Turn {
    /// Whether this call consumed a turn.
    pub const fn is_consumed(&self) -> bool {
        matches!(self, Self::Moved { .. } | Self::Lost { .. })
    }
}

pub struct Game<S, R> {
    grid: Grid,
    surface: S,
    rng: R,
    phase: Phase,
    turns: u64,
}

impl<S, R> Game<S, R>
where
    S: Surface,
    R: Rng,
{
    /// Starts a game on an empty board with the initial tiles spawned.
    pub fn new(surface: S, rng: R) -> Result<Self> {
        let mut game = Self::with_grid(Grid::new(), surface, rng);

        for _ in 0..INITIAL_TILES {
            let (_, _appeared) = game.spawn_tile()?;
        }

        info!("game started\n{}", game.grid);

        Ok(game)
    }

    /// Continues from a prepared board without spawning anything.
    ///
    /// A board with no legal move starts, and stays, over.
    pub fn with_grid(grid: Grid, surface: S, rng: R) -> Self {
        let mut game = Self {
            grid,
            surface,
            rng,
            phase: Phase::AwaitingInput,
            turns: 0,
        };

        if game.grid.tile_count() > 0 && resolver::is_game_over(&game.grid) {
            game.finish();
        }

        game
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub const fn phase(&self) -> Phase {
        self.phase
    }

    pub const fn turns(&self) -> u64 {
        self.turns
    }

    pub fn legal_moves(&self) -> [bool; 4] {
        resolver::legal_moves(&self.grid)
    }

    /// Plays one direction.
    ///
    /// A turn that is dropped or fails partway leaves the game in `Resolving`
    /// and every later call returns [`GameError::TurnInProgress`].
    pub async fn play(&mut self, direction: Direction) -> Result<Turn> {
        match self.phase {
            Phase::AwaitingInput => {}
            Phase::GameOver => return Ok(Turn::Finished),
            Phase::Resolving | Phase::SpawnCheck => return Err(GameError::TurnInProgress),
        }

        if !resolver::can_move(&self.grid, direction) {
            debug!(%direction, "no legal move, input re-armed");
            return Ok(Turn::Ignored);
        }

        self.phase = Phase::Resolving;
        let outcome = resolver::resolve(&mut self.grid, direction, &mut self.surface).await?;

        self.phase = Phase::SpawnCheck;
        let (spawned, appeared) = self.spawn_tile()?;
        self.turns += 1;

        info!(
            turn = self.turns,
            %direction,
            merges = outcome.merges.len(),
            %spawned,
            "turn resolved"
        );

        if resolver::is_game_over(&self.grid) {
            appeared.wait().await;
            self.finish();

            return Ok(Turn::Lost { outcome, spawned });
        }

        self.phase = Phase::AwaitingInput;

        Ok(Turn::Moved { outcome, spawned })
    }

    fn spawn_tile(&mut self) -> Result<(Position, AnimationEnd)> {
        let position = self.grid.random_empty_cell(&mut self.rng)?.position();

        let mut tile = Tile::new(&mut self.surface);
        let appeared = tile.wait_for_animation_end();
        let id = tile.id();

        self.grid
            .cell_mut(position)
            .link_tile(tile, &mut self.surface)?;
        debug!(tile = %id, %position, "spawned tile");

        Ok((position, appeared))
    }

    fn finish(&mut self) {
        self.phase = Phase::GameOver;
        self.surface.notify_loss();

        info!(turns = self.turns, "no moves left\n{}", self.grid);
    }
}

/// Plays directions from `inputs` until the game is over or the channel
/// closes, returning the final phase.
///
/// Input is disabled while a turn resolves: directions that arrive during a
/// consumed turn are discarded rather than queued.
pub async fn run<S, R>(game: &mut Game<S, R>, inputs: &mut mpsc::Receiver<Direction>) -> Result<Phase>
where
    S: Surface,
    R: Rng,
{
    while game.phase() != Phase::GameOver {
        let Some(direction) = inputs.recv().await else {
            break;
        };

        if !game.play(direction).await?.is_consumed() {
            continue;
        }

        let mut discarded = 0;
        while inputs.try_recv().is_ok() {
            discarded += 1;
        }

        if discarded > 0 {
            warn!(discarded, "dropped input received while a turn was resolving");
        }
    }

    Ok(game.phase())
}
