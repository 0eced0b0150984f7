//! Core battleship rules: disposition validation and the board engine.
//!
//! Nothing in here knows about connections, locks or notifications. The
//! orchestrator in [`crate::server`] drives these types under its session lock.

pub mod bitboard;
pub mod board;
pub mod common;
pub mod config;
pub mod game;
pub mod ship;
pub mod validator;

// Re-export commonly used types
pub use bitboard::{BitBoard, BitBoardError};
pub use board::{Board, Shot};
pub use common::{DispositionError, GameError, ParticipantId, Tile};
pub use config::*;
pub use game::Game;
pub use ship::{Grid, Orientation, Ship, ShipSpec};
pub use validator::{check_fleet, is_disposition_valid};
