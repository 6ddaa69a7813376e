use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;

use crate::core::{SessionId, Snapshot};

/// Sleep used when nothing is armed.
const IDLE: Duration = Duration::from_secs(86400);

struct Pending {
    deadline: Instant,
    snapshot: Snapshot,
}

/// Pure per-session debounce timing. No channels, no clock reads.
///
/// Every change replaces the session's snapshot and pushes its deadline to
/// `now + delay`, so a burst fires once, `delay` after its last change,
/// carrying the snapshot current at fire time.
pub(super) struct Scheduler {
    delay: Duration,
    pending: FxHashMap<SessionId, Pending>,
}

impl Scheduler {
    pub(super) fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: FxHashMap::default(),
        }
    }

    pub(super) fn on_change(&mut self, snapshot: Snapshot, now: Instant) {
        let deadline = now + self.delay;
        self.pending
            .insert(snapshot.session, Pending { deadline, snapshot });
    }

    /// Returns whether a deadline was armed.
    pub(super) fn cancel(&mut self, session: SessionId) -> bool {
        self.pending.remove(&session).is_some()
    }

    /// Remove and return every snapshot whose deadline is at or before `now`.
    pub(super) fn take_due(&mut self, now: Instant) -> Vec<Snapshot> {
        let due: Vec<SessionId> = self
            .pending
            .iter()
            .filter(|(_, p)| p.deadline <= now)
            .map(|(id, _)| *id)
            .collect();

        due.into_iter()
            .filter_map(|id| self.pending.remove(&id))
            .map(|p| p.snapshot)
            .collect()
    }

    pub(super) fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().map(|p| p.deadline).min()
    }

    /// Precise sleep duration until the next deadline.
    pub(super) fn sleep_duration(&self, now: Instant) -> Duration {
        match self.next_deadline() {
            Some(deadline) => deadline
                .saturating_duration_since(now)
                .max(Duration::from_millis(1)),
            None => IDLE,
        }
    }

    #[cfg(test)]
    pub(super) fn is_armed(&self, session: SessionId) -> bool {
        self.pending.contains_key(&session)
    }
}
