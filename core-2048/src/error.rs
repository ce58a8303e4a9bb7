//! Errors raised by board operations.
//!
//! Every variant is a broken precondition: a correct turn loop never produces
//! one, so callers propagate them and stop instead of recovering.

use crate::Position;

pub type Result<T> = std::result::Result<T, GameError>;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// A cell or tile operation was called in a state its contract forbids.
    #[error("invalid state at cell {position}: {reason}")]
    InvalidState {
        position: Position,
        reason: &'static str,
    },

    #[error("no empty cell left to spawn a tile into")]
    NoEmptyCell,

    /// A new turn was requested while an earlier one never finished resolving.
    #[error("a turn is already being resolved")]
    TurnInProgress,
}

impl GameError {
    pub const fn invalid_state(position: Position, reason: &'static str) -> Self {
        Self::InvalidState { position, reason }
    }

    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidState { .. } => "invalid_state",
            Self::NoEmptyCell => "no_empty_cell",
            Self::TurnInProgress => "turn_in_progress",
        }
    }
}
