//! Cancellable-timer primitive.
//!
//! The debouncer itself owns no timer. Each `schedule` hands back a
//! [`Ticket`]; the host arms a real timer for that ticket and calls
//! [`Debouncer::fire`] when it expires. Scheduling again invalidates every
//! earlier ticket, so a burst of calls collapses to the last payload even if
//! a stale timer still fires.

use std::time::Duration;

/// Handle for one scheduled invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

#[derive(Debug)]
pub struct Debouncer<T> {
    window: Duration,
    generation: u64,
    pending: Option<(Ticket, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            generation: 0,
            pending: None,
        }
    }

    /// Quiescence window the host timer should wait.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Replace any pending payload and return the ticket that may fire it.
    pub fn schedule(&mut self, payload: T) -> Ticket {
        self.generation += 1;
        let ticket = Ticket(self.generation);
        if self.pending.is_some() {
            log::trace!("debounce: superseding pending call with #{}", ticket.0);
        }
        self.pending = Some((ticket, payload));
        ticket
    }

    /// Take the payload if `ticket` is the latest one and hasn't fired yet.
    pub fn fire(&mut self, ticket: Ticket) -> Option<T> {
        match self.pending.take() {
            Some((current, payload)) if current == ticket => Some(payload),
            other => {
                self.pending = other;
                None
            }
        }
    }

    /// Drop the pending payload. Returns `true` if one was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn pending_ticket(&self) -> Option<Ticket> {
        self.pending.as_ref().map(|(ticket, _)| *ticket)
    }
}
