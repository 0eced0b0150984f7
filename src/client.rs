//! Client side of a match: request/reply helpers over a [`Transport`] and an
//! automatic player used by the `play` subcommand and the end-to-end tests.

use std::collections::VecDeque;

use anyhow::bail;
use log::{debug, info};
use rand::Rng;

use crate::core::{Grid, ParticipantId, ShipSpec, GRID_CELLS};
use crate::disposer::Disposer;
use crate::protocol::{
    MatchStatus, Notification, PlayReply, PlayStatus, RejectReason, Request, ServerFrame,
};
use crate::transport::Transport;

/// The server refused a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("request refused ({reason:?}): {message}")]
pub struct Refused {
    pub reason: RejectReason,
    pub message: String,
}

/// Matches won and lost by an automatic player.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub won: u32,
    pub lost: u32,
}

impl Tally {
    pub fn rounds(&self) -> u32 {
        self.won + self.lost
    }
}

/// One participant talking to the server.
///
/// Notifications that arrive while a reply is awaited are queued and handed
/// out by [`Client::next_notification`] in arrival order.
pub struct Client<T: Transport> {
    transport: T,
    id: Option<ParticipantId>,
    pending: VecDeque<Notification>,
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            id: None,
            pending: VecDeque::new(),
        }
    }

    /// Id assigned at admission, if admitted.
    pub fn id(&self) -> Option<ParticipantId> {
        self.id
    }

    fn admitted_id(&self) -> anyhow::Result<ParticipantId> {
        match self.id {
            Some(id) => Ok(id),
            None => bail!("not connected"),
        }
    }

    /// Next non-notification frame, queueing notifications on the way.
    async fn reply(&mut self) -> anyhow::Result<ServerFrame> {
        loop {
            match self.transport.recv().await? {
                ServerFrame::Notification(notification) => self.pending.push_back(notification),
                ServerFrame::Rejected { reason, message } => {
                    return Err(Refused { reason, message }.into())
                }
                frame => return Ok(frame),
            }
        }
    }

    async fn expect_ack(&mut self) -> anyhow::Result<()> {
        match self.reply().await? {
            ServerFrame::Ack => Ok(()),
            other => bail!("expected Ack, got {:?}", other),
        }
    }

    /// Ask for a seat and wait for the assigned id.
    pub async fn connect(
        &mut self,
        name: impl Into<String>,
        ships: Vec<ShipSpec>,
    ) -> anyhow::Result<ParticipantId> {
        if let Some(id) = self.id {
            bail!("already admitted as {}", id);
        }
        self.transport
            .send(Request::Connect {
                name: name.into(),
                ships,
            })
            .await?;
        loop {
            match self.transport.recv().await? {
                ServerFrame::Notification(Notification::Admitted { id }) => {
                    self.id = Some(id);
                    return Ok(id);
                }
                ServerFrame::Notification(notification) => self.pending.push_back(notification),
                ServerFrame::Rejected { reason, message } => {
                    return Err(Refused { reason, message }.into())
                }
                other => bail!("unexpected answer to connect: {:?}", other),
            }
        }
    }

    pub async fn play(&mut self, position: i32) -> anyhow::Result<PlayReply> {
        let id = self.admitted_id()?;
        self.transport.send(Request::Play { id, position }).await?;
        match self.reply().await? {
            ServerFrame::Played(reply) => Ok(reply),
            other => bail!("unexpected answer to play: {:?}", other),
        }
    }

    pub async fn rearm(&mut self, ships: Vec<ShipSpec>) -> anyhow::Result<()> {
        let id = self.admitted_id()?;
        self.transport.send(Request::Rearm { id, ships }).await?;
        self.expect_ack().await
    }

    /// Leave the session. The server closes the connection afterwards.
    pub async fn disconnect(&mut self) -> anyhow::Result<()> {
        let id = self.admitted_id()?;
        self.transport.send(Request::Disconnect { id }).await?;
        self.expect_ack().await?;
        self.id = None;
        Ok(())
    }

    pub async fn next_notification(&mut self) -> anyhow::Result<Notification> {
        if let Some(notification) = self.pending.pop_front() {
            return Ok(notification);
        }
        match self.transport.recv().await? {
            ServerFrame::Notification(notification) => Ok(notification),
            other => bail!("unexpected frame while idle: {:?}", other),
        }
    }

    /// Play `rounds` matches firing at random unexplored cells, rearming with
    /// `disposer` between matches, then leave. Must be called after
    /// [`Client::connect`].
    pub async fn autoplay<R: Rng>(
        &mut self,
        disposer: &mut dyn Disposer,
        rng: &mut R,
        rounds: u32,
    ) -> anyhow::Result<Tally> {
        let mut tally = Tally::default();
        let mut fired = Grid::new();
        // "not my turn" updates owed for our own accepted shots; any other one
        // means the match was suspended or restarted with a new opponent
        let mut owed_idle: u32 = 0;

        while tally.rounds() < rounds {
            let Notification::GameStatus { is_my_turn, status } = self.next_notification().await?
            else {
                continue;
            };
            match status {
                MatchStatus::Playing if is_my_turn => {
                    let position = next_target(&mut fired, rng);
                    let reply = self.play(position as i32).await?;
                    debug!("Fired at {}: {:?}", position, reply);
                    if reply.status == PlayStatus::Accepted {
                        fired.set_index(position)?;
                        owed_idle += 1;
                    }
                }
                MatchStatus::Playing if owed_idle > 0 => owed_idle -= 1,
                MatchStatus::Playing => {
                    debug!("Opponent changed, forgetting {} shots", fired.count_ones());
                    fired.clear_all();
                }
                MatchStatus::Victory | MatchStatus::Defeat => {
                    if status == MatchStatus::Victory {
                        tally.won += 1;
                    } else {
                        tally.lost += 1;
                    }
                    info!("Round over: {:?} ({} won, {} lost)", status, tally.won, tally.lost);
                    fired.clear_all();
                    owed_idle = 0;
                    if tally.rounds() < rounds {
                        self.rearm(disposer.dispose()).await?;
                    }
                }
            }
        }

        self.disconnect().await?;
        Ok(tally)
    }
}

/// Uniformly random cell not yet in `fired`. Starts over with an empty set
/// once every cell has been fired at.
fn next_target<R: Rng>(fired: &mut Grid, rng: &mut R) -> usize {
    let mut open: Vec<usize> = open_cells(fired);
    if open.is_empty() {
        fired.clear_all();
        open = (0..GRID_CELLS).collect();
    }
    open[rng.random_range(0..open.len())]
}

fn open_cells(fired: &Grid) -> Vec<usize> {
    (0..GRID_CELLS)
        .filter(|&cell| !fired.get_index(cell).unwrap_or(true))
        .collect()
}
