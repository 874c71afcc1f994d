//! Must-return obligations.
//!
//! A vehicle lent out between its owner's trips must be back with the owner
//! by the owner's next departure.  Each such promise is an [`Obligation`];
//! a vehicle keeps them on an [`ObligationStack`] whose top entry is the one
//! due next.

use std::fmt;

use mf_core::{LinkId, SimTime};

/// "Be back at `link` by `deadline`."
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Obligation {
    /// Where the owner will be waiting.  `None` if it was never recorded; the
    /// return drive then heads for the last passenger drop-off location.
    pub link:     Option<LinkId>,
    pub deadline: SimTime,
}

impl Obligation {
    pub fn new(link: LinkId, deadline: SimTime) -> Self {
        Self { link: Some(link), deadline }
    }
}

impl fmt::Display for Obligation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.link {
            Some(link) => write!(f, "{link} by {}", self.deadline),
            None       => write!(f, "<unknown link> by {}", self.deadline),
        }
    }
}

/// Per-vehicle LIFO of obligations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObligationStack {
    entries: Vec<Obligation>,
}

impl ObligationStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, obligation: Obligation) {
        self.entries.push(obligation);
    }

    pub fn pop(&mut self) -> Option<Obligation> {
        self.entries.pop()
    }

    /// The obligation due next.
    pub fn peek(&self) -> Option<&Obligation> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether work starting `now` and lasting `duration` seconds can be
    /// taken on without breaking the top obligation.
    pub fn admits(&self, now: SimTime, duration: u64) -> bool {
        self.peek()
            .is_none_or(|top| top.deadline >= now.saturating_add(duration))
    }
}
