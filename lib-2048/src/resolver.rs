//! Move resolution: sliding every group toward an edge, then merging.
//!
//! A move runs in two phases. [`slide_tiles`] relocates tiles and parks each
//! merging tile in its target cell as a merge candidate, collecting one
//! animation end per moving tile. [`PendingMove::finish`] waits for all of
//! them and only then folds every candidate into its occupant, so merges land
//! together and no cell merges twice in one move.

use std::ops::ControlFlow;

use core_2048::{
    animation::{self, AnimationEnd},
    Direction, Grid, Group, Position, Result, Surface, Tile,
};
use tracing::debug;

use crate::control_flow_helper::ControlFlowHelper;

/// Whether some tile in `group` can slide or merge one step toward index 0.
pub fn can_move_in_group(grid: &Grid, group: &Group) -> bool {
    group.windows(2).any(|pair| {
        let (target, source) = (grid.cell(pair[0]), grid.cell(pair[1]));

        source.tile().is_some_and(|tile| target.can_accept(tile))
    })
}

pub fn can_move(grid: &Grid, direction: Direction) -> bool {
    Grid::groups(direction)
        .iter()
        .any(|group| can_move_in_group(grid, group))
}

/// Legality of each direction, indexed like [`Direction::ALL`].
pub fn legal_moves(grid: &Grid) -> [bool; 4] {
    Direction::ALL.map(|direction| can_move(grid, direction))
}

pub fn is_game_over(grid: &Grid) -> bool {
    !Direction::iter().any(|direction| can_move(grid, direction))
}

/// Slides then merges, returning once every merge has been applied.
pub async fn resolve(
    grid: &mut Grid,
    direction: Direction,
    surface: &mut dyn Surface,
) -> Result<MoveOutcome> {
    slide_tiles(grid, direction, surface)?
        .finish(grid, surface)
        .await
}

/// First phase of a move: relocates tiles without merging them.
pub fn slide_tiles(
    grid: &mut Grid,
    direction: Direction,
    surface: &mut dyn Surface,
) -> Result<PendingMove> {
    let mut transitions = Vec::new();

    for group in Grid::groups(direction) {
        slide_tiles_in_group(grid, &group, surface, &mut transitions)?;
    }

    Ok(PendingMove {
        direction,
        transitions,
    })
}

fn slide_tiles_in_group(
    grid: &mut Grid,
    group: &Group,
    surface: &mut dyn Surface,
    transitions: &mut Vec<AnimationEnd>,
) -> Result<()> {
    // Index 0 never moves; lower indices settle first so later tiles see
    // them in their final place.
    for index in 1..group.len() {
        let Some(tile) = grid.cell(group[index]).tile() else {
            continue;
        };

        let Some(target) = find_target(grid, group, index, tile) else {
            continue;
        };

        let mut tile = grid.cell_mut(group[index]).unlink_tile()?;
        transitions.push(tile.wait_for_transition_end());

        let target = grid.cell_mut(group[target]);
        debug!(tile = %tile.id(), value = tile.value(), from = %group[index], to = %target.position(), "sliding tile");

        if target.is_empty() {
            target.link_tile(tile, surface)?;
        } else {
            target.link_tile_for_merge(tile, surface)?;
        }
    }

    Ok(())
}

/// Farthest index below `index` the tile can reach.
///
/// The scan stops at the first cell that refuses the tile, and also right
/// after an occupied cell that accepts it: a tile merges with the first equal
/// tile it meets and never passes through it.
fn find_target(grid: &Grid, group: &Group, index: usize, tile: &Tile) -> Option<usize> {
    (0..index)
        .rev()
        .try_fold(None, |target, j| {
            let cell = grid.cell(group[j]);

            match (cell.can_accept(tile), cell.is_empty()) {
                (true, true) => ControlFlow::Continue(Some(j)),
                (true, false) => ControlFlow::Break(Some(j)),
                (false, _) => ControlFlow::Break(target),
            }
        })
        .into_inner()
}

/// A move whose slides have started but whose merges are not applied yet.
#[derive(Debug)]
#[must_use = "merges are only applied once the pending move is finished"]
pub struct PendingMove {
    direction: Direction,
    transitions: Vec<AnimationEnd>,
}

impl PendingMove {
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Number of tiles that changed cell.
    pub fn slid(&self) -> usize {
        self.transitions.len()
    }

    /// Waits for every slide animation, then applies every pending merge.
    pub async fn finish(self, grid: &mut Grid, surface: &mut dyn Surface) -> Result<MoveOutcome> {
        let slid = self.transitions.len();
        animation::join_all(self.transitions).await;

        let mut merges = Vec::new();

        for cell in grid.cells_mut().filter(|cell| cell.has_tile_for_merge()) {
            let value = cell.merge_tiles(surface)?;
            merges.push((cell.position(), value));
        }

        debug!(direction = %self.direction, slid, merges = merges.len(), "move resolved");

        Ok(MoveOutcome {
            direction: self.direction,
            slid,
            merges,
        })
    }
}

/// What a resolved move did to the board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub direction: Direction,
    /// Tiles that changed cell, merged ones included.
    pub slid: usize,
    /// Cell and resulting value of every merge.
    pub merges: Vec<(Position, u32)>,
}

impl MoveOutcome {
    pub fn moved(&self) -> bool {
        self.slid > 0
    }

    /// Sum of the values the merges produced.
    pub fn merged_value(&self) -> u32 {
        self.merges.iter().map(|&(_, value)| value).sum()
    }
}
