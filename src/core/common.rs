//! Common types for the board engine: tile outcomes, identities and errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::bitboard::BitBoardError;

/// Identity assigned to a participant at admission. Strictly positive.
pub type ParticipantId = u32;

/// State of one grid cell as seen by the shooter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tile {
    /// Not fired upon yet.
    #[default]
    Unknown,
    /// Shot landed on open water.
    Miss,
    /// Shot hit a ship that still has unhit cells.
    Ship,
    /// Shot hit the last intact cell of a ship.
    Sunk,
}

impl Tile {
    /// Whether the cell has been fired upon.
    pub fn is_resolved(self) -> bool {
        self != Tile::Unknown
    }
}

/// Why a proposed disposition was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispositionError {
    #[error("expected {expected} ships, got {got}")]
    WrongShipCount { expected: usize, got: usize },
    #[error("ship sizes {sizes:?} do not match the fleet {expected:?}")]
    WrongFleet { sizes: Vec<u8>, expected: Vec<u8> },
    #[error("ship at {position} of size {size} (vertical: {vertical}) leaves the grid")]
    OutOfBounds {
        position: i32,
        size: u8,
        vertical: bool,
    },
    #[error("two ships share a cell")]
    Overlap,
}

/// Errors returned by `Game` operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("invalid placement: {0}")]
    InvalidPlacement(#[from] DispositionError),
    #[error("participant {0} has no disposition in this match")]
    UnknownParticipant(ParticipantId),
    #[error("participant {0} has no opponent yet")]
    NoOpponent(ParticipantId),
    #[error("the match already holds two dispositions")]
    GameFull,
    #[error("position {0} is outside the grid")]
    PositionOutOfRange(usize),
    #[error(transparent)]
    Grid(#[from] BitBoardError),
}
