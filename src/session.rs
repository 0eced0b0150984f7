//! The two seats of a session and the participants sitting in them.

use core::fmt;

use tokio_util::sync::CancellationToken;

use crate::core::ParticipantId;

/// One of the two fixed seats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    First,
    Second,
}

impl Slot {
    /// Seats in turn order.
    pub const ALL: [Slot; 2] = [Slot::First, Slot::Second];

    fn index(self) -> usize {
        match self {
            Slot::First => 0,
            Slot::Second => 1,
        }
    }

    pub fn other(self) -> Slot {
        match self {
            Slot::First => Slot::Second,
            Slot::Second => Slot::First,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::First => write!(f, "Blue"),
            Slot::Second => write!(f, "Red"),
        }
    }
}

/// A seated participant.
#[derive(Debug, Clone)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub slot: Slot,
    /// Cancelled when the participant leaves the session.
    pub leave: CancellationToken,
}

/// Fixed table of two seats, each empty or holding one participant.
#[derive(Debug, Default)]
pub struct Seats {
    seats: [Option<Participant>; 2],
}

impl Seats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_filled(&self, slot: Slot) -> bool {
        self.seats[slot.index()].is_some()
    }

    pub fn is_full(&self) -> bool {
        Slot::ALL.iter().all(|&slot| self.is_filled(slot))
    }

    /// First empty seat in turn order.
    pub fn first_empty(&self) -> Option<Slot> {
        Slot::ALL.into_iter().find(|&slot| !self.is_filled(slot))
    }

    pub fn get(&self, slot: Slot) -> Option<&Participant> {
        self.seats[slot.index()].as_ref()
    }

    /// Seat `participant` in its slot. Returns the participant back if the
    /// seat is already taken.
    pub fn seat(&mut self, participant: Participant) -> Result<(), Participant> {
        let seat = &mut self.seats[participant.slot.index()];
        if seat.is_some() {
            return Err(participant);
        }
        *seat = Some(participant);
        Ok(())
    }

    pub fn find(&self, id: ParticipantId) -> Option<&Participant> {
        self.occupants().find(|p| p.id == id)
    }

    /// Empty the seat held by `id` and return its occupant.
    pub fn vacate(&mut self, id: ParticipantId) -> Option<Participant> {
        self.seats
            .iter_mut()
            .find(|seat| matches!(seat, Some(p) if p.id == id))
            .and_then(Option::take)
    }

    /// The occupant of the other seat.
    pub fn opponent_of(&self, id: ParticipantId) -> Option<&Participant> {
        let slot = self.find(id)?.slot;
        self.get(slot.other())
    }

    /// Seated participants in turn order.
    pub fn occupants(&self) -> impl Iterator<Item = &Participant> {
        self.seats.iter().flatten()
    }
}
