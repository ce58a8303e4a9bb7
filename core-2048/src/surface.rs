//! Contract between the board and whatever draws it.

use crate::{animation::Completion, Position, TileId};

/// Visual layer driven by board mutations.
///
/// Every tile has exactly one representation, created by
/// [`Surface::create_tile`] and kept until [`Surface::remove_tile`]. Each
/// [`Completion`] passed in must eventually be completed or dropped, or the
/// turn waiting on it never finishes.
pub trait Surface {
    /// A new tile exists; `appeared` fires when its appear animation ends.
    fn create_tile(&mut self, id: TileId, value: u32, appeared: Completion);

    /// Moves a tile's representation to `at`.
    ///
    /// `transition` is `None` for direct placement (spawns) and carries the
    /// slide completion otherwise.
    fn position_tile(&mut self, id: TileId, at: Position, transition: Option<Completion>);

    /// A merge changed the tile's value.
    fn update_tile(&mut self, id: TileId, value: u32);

    /// The tile was consumed by a merge.
    fn remove_tile(&mut self, id: TileId);

    /// No move is left. Called once per game.
    fn notify_loss(&mut self);
}

/// Surface that draws nothing and finishes every animation immediately.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSurface;

impl Surface for NullSurface {
    fn create_tile(&mut self, _id: TileId, _value: u32, _appeared: Completion) {}

    fn position_tile(&mut self, _id: TileId, _at: Position, _transition: Option<Completion>) {}

    fn update_tile(&mut self, _id: TileId, _value: u32) {}

    fn remove_tile(&mut self, _id: TileId) {}

    fn notify_loss(&mut self) {}
}
