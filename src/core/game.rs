use log::debug;

use crate::core::board::Board;
use crate::core::common::{GameError, ParticipantId, Tile};
use crate::core::ship::ShipSpec;

/// Both sides of one match and its winner, if any.
///
/// Boards are keyed by participant id; a match holds at most two of them.
/// Shots by one participant always land on the other participant's board.
#[derive(Debug, Default)]
pub struct Game {
    boards: Vec<(ParticipantId, Board)>,
    winner: Option<ParticipantId>,
}

impl Game {
    /// Create a match with no dispositions and no winner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the fleet of `id`. A second call for the same id replaces the
    /// previous disposition.
    pub fn save_disposition(
        &mut self,
        id: ParticipantId,
        ships: &[ShipSpec],
    ) -> Result<(), GameError> {
        let board = Board::new(ships)?;
        if let Some(entry) = self.boards.iter_mut().find(|(owner, _)| *owner == id) {
            entry.1 = board;
            debug!("disposition of {} replaced", id);
            return Ok(());
        }
        if self.boards.len() >= 2 {
            return Err(GameError::GameFull);
        }
        self.boards.push((id, board));
        debug!("disposition of {} saved", id);
        Ok(())
    }

    /// Resolve a shot fired by `id` at `position` on the opponent's board.
    ///
    /// Winning is only evaluated on fresh shots, so repeating the final shot
    /// returns its tile without declaring victory a second time.
    pub fn register_ply(
        &mut self,
        id: ParticipantId,
        position: usize,
    ) -> Result<Tile, GameError> {
        if !self.is_armed(id) {
            return Err(GameError::UnknownParticipant(id));
        }
        let (_, target) = self
            .boards
            .iter_mut()
            .find(|(owner, _)| *owner != id)
            .ok_or(GameError::NoOpponent(id))?;

        let shot = target.fire(position)?;
        if shot.fresh && self.winner.is_none() && target.all_sunk() {
            self.winner = Some(id);
        }
        Ok(shot.tile)
    }

    pub fn winner(&self) -> Option<ParticipantId> {
        self.winner
    }

    /// Whether `id` has a disposition in this match.
    pub fn is_armed(&self, id: ParticipantId) -> bool {
        self.boards.iter().any(|(owner, _)| *owner == id)
    }

    /// Drop the board of a departed participant. Boards that remain keep their
    /// fleet but lose their shot history so the next opponent starts clean.
    pub fn forget(&mut self, id: ParticipantId) {
        self.boards.retain(|(owner, _)| *owner != id);
        for (_, board) in &mut self.boards {
            board.clear_shots();
        }
        self.winner = None;
    }

    /// Board belonging to `id`.
    pub fn board(&self, id: ParticipantId) -> Option<&Board> {
        self.boards
            .iter()
            .find(|(owner, _)| *owner == id)
            .map(|(_, board)| board)
    }
}
