use crate::core::{DispositionError, GameError, ParticipantId};
use crate::protocol::RejectReason;

/// Errors surfaced by the session orchestrator.
///
/// Game-rule refusals (wrong turn, position off the grid) are not errors;
/// they come back as [`crate::protocol::PlayStatus`] values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServerError {
    #[error("2 clients already connected")]
    SessionFull,

    #[error("invalid placement: {0}")]
    InvalidPlacement(#[from] DispositionError),

    #[error("unknown id {0}")]
    UnknownParticipant(ParticipantId),

    #[error("participant {0} cannot rearm while a match is in progress")]
    MatchInProgress(ParticipantId),

    #[error(transparent)]
    Game(GameError),
}

impl From<GameError> for ServerError {
    fn from(err: GameError) -> Self {
        match err {
            GameError::InvalidPlacement(e) => ServerError::InvalidPlacement(e),
            other => ServerError::Game(other),
        }
    }
}

impl ServerError {
    /// Wire level classification of the error.
    pub fn reason(&self) -> RejectReason {
        match self {
            ServerError::SessionFull => RejectReason::SessionFull,
            ServerError::InvalidPlacement(_) => RejectReason::InvalidPlacement,
            ServerError::UnknownParticipant(_) => RejectReason::UnknownParticipant,
            ServerError::MatchInProgress(_) => RejectReason::MatchInProgress,
            ServerError::Game(_) => RejectReason::Protocol,
        }
    }
}
