//! Single-slot job supervision.
//!
//! Per session at most one compile job runs. A trigger that arrives while a
//! job is in flight marks that job superseded and parks its snapshot in the
//! one pending slot, replacing whatever was parked there. When the in-flight
//! job completes its result is applied only if it was not superseded, then
//! the parked snapshot starts.

use crate::core::Snapshot;

/// A job the caller should start now.
#[derive(Debug)]
pub(super) struct Ticket {
    pub(super) job: u64,
    pub(super) snapshot: Snapshot,
}

#[derive(Debug)]
struct InFlight {
    job: u64,
    superseded: bool,
}

/// What to do with a finished job.
#[derive(Debug)]
pub(super) struct Completion {
    /// Push the result to the surface.
    pub(super) apply: bool,
    /// Start this next.
    pub(super) next: Option<Ticket>,
}

#[derive(Debug, Default)]
pub(super) struct JobSlot {
    in_flight: Option<InFlight>,
    pending: Option<Ticket>,
}

impl JobSlot {
    /// Submit a snapshot under job id `job`.
    ///
    /// Returns the ticket to start immediately when idle, `None` when it was
    /// parked behind the in-flight job.
    pub(super) fn submit(&mut self, snapshot: Snapshot, job: u64) -> Option<Ticket> {
        let ticket = Ticket { job, snapshot };
        match &mut self.in_flight {
            Some(current) => {
                current.superseded = true;
                self.pending = Some(ticket);
                None
            }
            None => {
                self.in_flight = Some(InFlight {
                    job,
                    superseded: false,
                });
                Some(ticket)
            }
        }
    }

    /// Record completion of `job`. Unknown job ids are stale and ignored.
    pub(super) fn complete(&mut self, job: u64) -> Completion {
        match &self.in_flight {
            Some(current) if current.job == job => {
                let apply = !current.superseded;
                self.in_flight = None;
                let next = self.pending.take().map(|ticket| {
                    self.in_flight = Some(InFlight {
                        job: ticket.job,
                        superseded: false,
                    });
                    ticket
                });
                Completion { apply, next }
            }
            _ => Completion {
                apply: false,
                next: None,
            },
        }
    }

    #[cfg(test)]
    pub(super) fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Revision of the parked snapshot, if any.
    #[cfg(test)]
    pub(super) fn pending_revision(&self) -> Option<u64> {
        self.pending.as_ref().map(|t| t.snapshot.revision)
    }
}
