//! Move resolution and the turn loop on top of the `core-2048` board.

pub use core_2048::*;

pub mod control_flow_helper;
pub mod controller;
pub mod resolver;

pub use controller::{run, Game, Phase, Turn};
pub use resolver::{MoveOutcome, PendingMove};
