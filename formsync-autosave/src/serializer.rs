//! "Switch to latest" bookkeeping for save operations.
//!
//! Each dispatched save carries a ticket. Only the ticket of the most recent
//! dispatch may change shared state when its save completes; older saves may
//! still finish on the wire but their outcome is dropped.

use tracing::debug;

/// Identifies one dispatched save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SaveTicket(u64);

impl SaveTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Generation counter deciding which save outcome counts.
#[derive(Debug, Default)]
pub struct SaveSerializer {
    latest: u64,
    outstanding: Option<SaveTicket>,
}

impl SaveSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a ticket for a new save, superseding any outstanding one.
    pub fn dispatch(&mut self) -> SaveTicket {
        if let Some(stale) = self.outstanding {
            debug!("Save #{} superseded by #{}", stale.0, self.latest + 1);
        }
        self.latest += 1;
        let ticket = SaveTicket(self.latest);
        self.outstanding = Some(ticket);
        ticket
    }

    /// Whether `ticket` belongs to the save still awaited.
    pub fn is_current(&self, ticket: SaveTicket) -> bool {
        self.outstanding == Some(ticket)
    }

    /// Settles `ticket`. Returns `true` if its outcome may be applied.
    pub fn complete(&mut self, ticket: SaveTicket) -> bool {
        if self.is_current(ticket) {
            self.outstanding = None;
            true
        } else {
            debug!("Discarding outcome of stale save #{}", ticket.0);
            false
        }
    }

    /// Makes every issued ticket stale.
    pub fn invalidate(&mut self) {
        self.latest += 1;
        self.outstanding = None;
    }

    /// Whether a current save has not completed yet.
    pub fn in_flight(&self) -> bool {
        self.outstanding.is_some()
    }

    /// Number of tickets issued or invalidated so far.
    pub fn generation(&self) -> u64 {
        self.latest
    }
}
