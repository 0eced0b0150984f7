//! Session orchestrator.
//!
//! A [`Server`] seats at most two participants, arbitrates their turns and
//! pushes a status notification to both after every state change. Seats, turn
//! pointer, ply counter, the current [`Game`] and the notifier registry all
//! live in one `Session` behind a single mutex, so admission, turn rotation
//! and grid mutation are linearized. Notification channels are unbounded, so
//! a fan-out happens entirely while the lock is held and no other transition
//! can slip between the two deliveries.
//!
//! Admission hands back a [`SessionHandle`] instead of blocking: the handle
//! owns the participant's notification stream and resolves
//! [`SessionHandle::closed`] once the participant has left. There is no turn
//! timeout; an idle turn holder stalls the match until someone disconnects.

use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

use crate::core::{Game, ParticipantId, ShipSpec, Tile, GRID_CELLS};
use crate::error::ServerError;
use crate::notifier::{DeliveryError, Notifier};
use crate::protocol::{MatchStatus, Notification, PlayReply, PlayStatus};
use crate::session::{Participant, Seats, Slot};

/// A seated participant's end of the session.
#[derive(Debug)]
pub struct SessionHandle {
    id: ParticipantId,
    slot: Slot,
    notifications: mpsc::UnboundedReceiver<Notification>,
    leave: CancellationToken,
}

impl SessionHandle {
    pub fn id(&self) -> ParticipantId {
        self.id
    }

    pub fn slot(&self) -> Slot {
        self.slot
    }

    /// Next notification, or `None` once the participant has been removed
    /// and every queued notification was read.
    pub async fn next_notification(&mut self) -> Option<Notification> {
        self.notifications.recv().await
    }

    /// Queued notification, if any, without waiting.
    pub fn try_next_notification(&mut self) -> Option<Notification> {
        self.notifications.try_recv().ok()
    }

    /// Resolves when the participant leaves the session.
    pub async fn closed(&self) {
        self.leave.cancelled().await
    }

    pub fn is_closed(&self) -> bool {
        self.leave.is_cancelled()
    }

    /// Split the handle for transports that forward notifications and watch
    /// for closure from different tasks.
    pub fn into_parts(
        self,
    ) -> (
        ParticipantId,
        mpsc::UnboundedReceiver<Notification>,
        CancellationToken,
    ) {
        (self.id, self.notifications, self.leave)
    }
}

/// Point-in-time view of the session, for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSnapshot {
    /// Participant expected to play, `None` when no match is active.
    pub turn: Option<ParticipantId>,
    pub plies: u32,
    /// Number of matches started so far.
    pub round: u32,
    /// Winner of the most recently finished match.
    pub last_winner: Option<ParticipantId>,
    /// Seated participants in turn order.
    pub seated: Vec<(Slot, ParticipantId, String)>,
}

struct Session {
    seats: Seats,
    last_id: ParticipantId,
    turn: Option<ParticipantId>,
    plies: u32,
    round: u32,
    last_winner: Option<ParticipantId>,
    game: Game,
    notifier: Notifier,
}

impl Session {
    fn new() -> Self {
        Self {
            seats: Seats::new(),
            last_id: 0,
            turn: None,
            plies: 0,
            round: 0,
            last_winner: None,
            game: Game::new(),
            notifier: Notifier::new(),
        }
    }

    /// Both seats filled and both fleets on the board.
    fn is_armed_pair(&self) -> bool {
        self.seats.is_full() && self.seats.occupants().all(|p| self.game.is_armed(p.id))
    }

    /// The first seat always takes the first ply.
    fn start_match(&mut self) {
        let Some(first) = self.seats.get(Slot::First).map(|p| p.id) else {
            return;
        };
        self.turn = Some(first);
        self.plies = 0;
        self.round += 1;
        info!("Round {}: let's begin with {}", self.round, first);
        self.broadcast();
    }

    fn status_for(&self, id: ParticipantId) -> Notification {
        let status = match self.game.winner() {
            Some(winner) if winner == id => MatchStatus::Victory,
            Some(_) => MatchStatus::Defeat,
            None => MatchStatus::Playing,
        };
        Notification::GameStatus {
            is_my_turn: self.turn == Some(id),
            status,
        }
    }

    /// Send the current status to every seated participant. A failed delivery
    /// does not stop the others; the first failure is returned.
    fn dispatch_game_status(&self) -> Result<(), DeliveryError> {
        let mut outcome = Ok(());
        for participant in self.seats.occupants() {
            let delivered = self
                .notifier
                .notify(participant.id, self.status_for(participant.id));
            if let Err(err) = delivered {
                outcome = outcome.and(Err(err));
            }
        }
        outcome
    }

    fn broadcast(&self) {
        if let Err(err) = self.dispatch_game_status() {
            warn!("error dispatching game status notification: {}", err);
        }
    }

    fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            turn: self.turn,
            plies: self.plies,
            round: self.round,
            last_winner: self.last_winner,
            seated: self
                .seats
                .occupants()
                .map(|p| (p.slot, p.id, p.name.clone()))
                .collect(),
        }
    }
}

/// Shared handle on the session. Cloning is cheap; every clone drives the
/// same session.
#[derive(Clone)]
pub struct Server {
    session: Arc<Mutex<Session>>,
}

impl Default for Server {
    fn default() -> Self {
        Self::new()
    }
}

impl Server {
    pub fn new() -> Self {
        Self {
            session: Arc::new(Mutex::new(Session::new())),
        }
    }

    /// Admit a participant with its fleet.
    ///
    /// Fails with `SessionFull` when both seats are taken and with
    /// `InvalidPlacement` when the fleet is refused; in both cases nothing
    /// changes and no id is consumed. The first notification on the returned
    /// handle is `Admitted`. When this admission completes an armed pair the
    /// match starts and both participants receive their status.
    pub async fn connect(
        &self,
        name: impl Into<String>,
        ships: Vec<ShipSpec>,
    ) -> Result<SessionHandle, ServerError> {
        let name = name.into();
        let mut guard = self.session.lock().await;
        let session = &mut *guard;

        let slot = session.seats.first_empty().ok_or(ServerError::SessionFull)?;
        let id = session.last_id + 1;
        session.game.save_disposition(id, &ships)?;
        session.last_id = id;

        let leave = CancellationToken::new();
        let participant = Participant {
            id,
            name,
            slot,
            leave: leave.clone(),
        };
        info!("{} is {} ({})", slot, participant.name, id);
        if session.seats.seat(participant).is_err() {
            return Err(ServerError::SessionFull);
        }

        let (tx, rx) = mpsc::unbounded_channel();
        session.notifier.register(id, tx);
        if let Err(err) = session.notifier.notify(id, Notification::Admitted { id }) {
            warn!("error sending admission to {}: {}", id, err);
        }

        if session.is_armed_pair() {
            session.start_match();
        }

        Ok(SessionHandle {
            id,
            slot,
            notifications: rx,
            leave,
        })
    }

    /// Remove `id` from its seat and end its session.
    ///
    /// The active match is suspended: the turn pointer is cleared, the
    /// departed fleet is dropped and the remaining participant is told it is
    /// not their turn. The next admission starts a fresh match.
    pub async fn disconnect(&self, id: ParticipantId) -> Result<(), ServerError> {
        let mut guard = self.session.lock().await;
        let session = &mut *guard;

        let participant = session
            .seats
            .vacate(id)
            .ok_or(ServerError::UnknownParticipant(id))?;
        session.notifier.unregister(id);
        session.game.forget(id);
        session.turn = None;
        participant.leave.cancel();
        info!("A {} has no name ({} left)", participant.slot, participant.name);

        session.broadcast();
        Ok(())
    }

    /// Fire at `position` on behalf of `id`.
    ///
    /// Wrong turn and off-grid positions are refusals, not errors, and leave
    /// the session untouched. An accepted shot flips the turn and notifies
    /// both participants; a winning shot ends the match, announces
    /// victory/defeat and replaces the game with a fresh one awaiting
    /// [`Server::rearm`]. The turn is cleared before that announcement, so
    /// both sides receive `is_my_turn = false` with VICTORY/DEFEAT.
    pub async fn play(&self, id: ParticipantId, position: i32) -> Result<PlayReply, ServerError> {
        let mut guard = self.session.lock().await;
        let session = &mut *guard;

        if session.seats.find(id).is_none() {
            return Err(ServerError::UnknownParticipant(id));
        }
        if session.turn != Some(id) {
            return Ok(PlayReply::refused(PlayStatus::NotYourTurn));
        }
        let cell = match usize::try_from(position) {
            Ok(cell) if cell < GRID_CELLS => cell,
            _ => return Ok(PlayReply::refused(PlayStatus::InvalidPosition)),
        };

        let tile = session.game.register_ply(id, cell)?;
        match tile {
            Tile::Ship => info!("Player {} touched at {}", id, cell),
            Tile::Sunk => info!("Player {} sank a ship at {}", id, cell),
            _ => debug!("Player {} missed at {}", id, cell),
        }

        let winner = session.game.winner();
        session.turn = match winner {
            Some(_) => None,
            None => session.seats.opponent_of(id).map(|p| p.id),
        };
        session.plies += 1;
        session.broadcast();

        if let Some(winner) = winner {
            info!(
                "{} won round {} in {} plies",
                winner, session.round, session.plies
            );
            session.last_winner = Some(winner);
            session.game = Game::new();
        }

        Ok(PlayReply::accepted(tile))
    }

    /// Supply the fleet for the next match.
    ///
    /// Only allowed while no match is active. Once both seated participants
    /// are armed the next match starts.
    pub async fn rearm(&self, id: ParticipantId, ships: Vec<ShipSpec>) -> Result<(), ServerError> {
        let mut guard = self.session.lock().await;
        let session = &mut *guard;

        if session.seats.find(id).is_none() {
            return Err(ServerError::UnknownParticipant(id));
        }
        if session.turn.is_some() {
            return Err(ServerError::MatchInProgress(id));
        }
        session.game.save_disposition(id, &ships)?;
        debug!("Player {} rearmed", id);

        if session.is_armed_pair() {
            session.start_match();
        }
        Ok(())
    }

    pub async fn snapshot(&self) -> MatchSnapshot {
        self.session.lock().await.snapshot()
    }
}
