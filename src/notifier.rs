//! Registry of outbound notification channels, one per participant.
//!
//! The notifier addresses exactly one participant per call and never buffers
//! or retries: a failed delivery is handed back to the caller.

use std::collections::HashMap;

use log::debug;
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;

use crate::core::ParticipantId;
use crate::protocol::Notification;

/// Delivery failures reported by [`Notifier::notify`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    #[error("no channel registered for participant {0}")]
    NotRegistered(ParticipantId),
    #[error("channel of participant {0} is closed")]
    ChannelClosed(ParticipantId),
}

#[derive(Debug, Default)]
pub struct Notifier {
    channels: HashMap<ParticipantId, UnboundedSender<Notification>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `id` to `channel`, replacing any previous binding.
    pub fn register(&mut self, id: ParticipantId, channel: UnboundedSender<Notification>) {
        if self.channels.insert(id, channel).is_some() {
            debug!("channel of participant {} replaced", id);
        }
    }

    /// Remove the binding of `id`. Dropping the sender ends the receiving
    /// stream once queued notifications are drained.
    pub fn unregister(&mut self, id: ParticipantId) -> bool {
        self.channels.remove(&id).is_some()
    }

    pub fn is_registered(&self, id: ParticipantId) -> bool {
        self.channels.contains_key(&id)
    }

    /// Deliver `message` to `id`.
    pub fn notify(&self, id: ParticipantId, message: Notification) -> Result<(), DeliveryError> {
        let channel = self
            .channels
            .get(&id)
            .ok_or(DeliveryError::NotRegistered(id))?;
        channel
            .send(message)
            .map_err(|_| DeliveryError::ChannelClosed(id))
    }
}
