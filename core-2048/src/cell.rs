use tracing::trace;

use crate::{GameError, Position, Result, Surface, Tile};

/// One board position.
///
/// A cell owns at most one tile plus, while a move is being resolved, one
/// merge candidate of the same value.
#[derive(Debug)]
pub struct Cell {
    position: Position,
    tile: Option<Tile>,
    merge_candidate: Option<Tile>,
}

impl Cell {
    pub(crate) const fn new(position: Position) -> Self {
        Self {
            position,
            tile: None,
            merge_candidate: None,
        }
    }

    pub const fn position(&self) -> Position {
        self.position
    }

    pub fn tile(&self) -> Option<&Tile> {
        self.tile.as_ref()
    }

    pub fn value(&self) -> Option<u32> {
        self.tile.as_ref().map(Tile::value)
    }

    pub fn is_empty(&self) -> bool {
        self.tile.is_none()
    }

    pub fn has_tile_for_merge(&self) -> bool {
        self.merge_candidate.is_some()
    }

    /// Whether `tile` may slide into this cell, either into the empty slot or
    /// as the single merge candidate of an equal occupant.
    pub fn can_accept(&self, tile: &Tile) -> bool {
        match &self.tile {
            None => true,
            Some(occupant) => occupant.value() == tile.value() && self.merge_candidate.is_none(),
        }
    }

    pub fn link_tile(&mut self, mut tile: Tile, surface: &mut dyn Surface) -> Result<()> {
        if self.tile.is_some() {
            return Err(GameError::invalid_state(
                self.position,
                "cannot link a tile into an occupied cell",
            ));
        }

        surface.position_tile(tile.id(), self.position, tile.take_transition());
        self.tile = Some(tile);

        Ok(())
    }

    pub fn link_tile_for_merge(&mut self, mut tile: Tile, surface: &mut dyn Surface) -> Result<()> {
        let reason = match &self.tile {
            None => Some("cannot merge into an empty cell"),
            Some(occupant) if occupant.value() != tile.value() => {
                Some("merge candidate value differs from the occupant")
            }
            Some(_) if self.merge_candidate.is_some() => {
                Some("cell already holds a merge candidate")
            }
            Some(_) => None,
        };

        if let Some(reason) = reason {
            return Err(GameError::invalid_state(self.position, reason));
        }

        surface.position_tile(tile.id(), self.position, tile.take_transition());
        self.merge_candidate = Some(tile);

        Ok(())
    }

    pub fn unlink_tile(&mut self) -> Result<Tile> {
        let position = self.position;

        self.tile
            .take()
            .ok_or_else(|| GameError::invalid_state(position, "no tile to unlink"))
    }

    /// Folds the merge candidate into the occupant and returns the new value.
    pub fn merge_tiles(&mut self, surface: &mut dyn Surface) -> Result<u32> {
        let position = self.position;
        let no_merge = move || GameError::invalid_state(position, "no pending merge in this cell");

        let occupant = self.tile.as_mut().ok_or_else(no_merge)?;
        let candidate = self.merge_candidate.take().ok_or_else(no_merge)?;

        let value = occupant.value() + candidate.value();
        trace!(%position, tile = %occupant.id(), consumed = %candidate.id(), value, "merging tiles");

        occupant.set_value(value, surface);
        surface.remove_tile(candidate.id());

        Ok(value)
    }
}
