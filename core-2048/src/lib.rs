//! Board model for the sliding-tile merge puzzle.
//!
//! A [`Grid`] owns one [`Cell`] per position and each cell owns at most one
//! [`Tile`]. Mutations report to a [`Surface`], the contract through which the
//! board drives its visual representation and learns when animations finish.

pub mod animation;
pub mod cell;
pub mod direction;
pub mod error;
pub mod grid;
pub mod position;
pub mod surface;
pub mod tile;

pub use animation::{AnimationEnd, Completion};
pub use cell::Cell;
pub use direction::Direction;
pub use error::{GameError, Result};
pub use grid::{Grid, Group, Values};
pub use position::Position;
pub use surface::{NullSurface, Surface};
pub use tile::{Tile, TileId, SPAWN_VALUE};

/// Width and height of the board.
pub const GRID_SIZE: usize = 4;
