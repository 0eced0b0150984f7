//! Messages exchanged between the match server and its clients.
//!
//! Every frame on the wire is one of these values, bincode encoded. Clients
//! send [`Request`]s; the server answers with [`ServerFrame`]s and pushes
//! [`Notification`]s on the connection that was admitted.

use serde::{Deserialize, Serialize};

use crate::core::{ParticipantId, ShipSpec, Tile};

/// Requests a client may issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Request {
    /// Ask for a seat. Answered by `Notification::Admitted` or `Rejected`.
    Connect { name: String, ships: Vec<ShipSpec> },
    /// Leave the session. Answered by `Ack`.
    Disconnect { id: ParticipantId },
    /// Fire at `position`. Answered by `Played`.
    Play { id: ParticipantId, position: i32 },
    /// Supply the fleet for the next round. Answered by `Ack`.
    Rearm {
        id: ParticipantId,
        ships: Vec<ShipSpec>,
    },
}

/// Match progress from one participant's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    Playing,
    Victory,
    Defeat,
}

/// Server initiated messages for one participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notification {
    /// First message after admission, carrying the assigned id.
    Admitted { id: ParticipantId },
    GameStatus {
        is_my_turn: bool,
        status: MatchStatus,
    },
}

/// Whether a play request was taken into account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayStatus {
    Accepted,
    NotYourTurn,
    InvalidPosition,
}

/// Answer to `Request::Play`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayReply {
    pub tile: Tile,
    pub status: PlayStatus,
}

impl PlayReply {
    pub fn accepted(tile: Tile) -> Self {
        Self {
            tile,
            status: PlayStatus::Accepted,
        }
    }

    /// A refusal carries no tile information.
    pub fn refused(status: PlayStatus) -> Self {
        Self {
            tile: Tile::Unknown,
            status,
        }
    }
}

/// Why a request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    SessionFull,
    InvalidPlacement,
    UnknownParticipant,
    MatchInProgress,
    /// The request does not make sense on this connection.
    Protocol,
}

/// Frames sent by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServerFrame {
    Notification(Notification),
    Played(PlayReply),
    Ack,
    Rejected {
        reason: RejectReason,
        message: String,
    },
}
