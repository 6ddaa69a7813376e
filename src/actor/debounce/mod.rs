//! Debounce Actor
//!
//! Coalesces bursts of document changes per session: a fire happens only
//! after `[preview] update_delay` of quiet, and carries the newest snapshot.
//!
//! ```text
//! DebounceMsg::Change -> Scheduler (pure timing) -> PipelineMsg::Fire
//! ```

mod scheduler;

#[cfg(test)]
mod tests;

use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use super::messages::{DebounceMsg, PipelineMsg};
use scheduler::Scheduler;

/// Debounce Actor - one timer per session
pub struct DebounceActor {
    rx: mpsc::Receiver<DebounceMsg>,
    pipeline_tx: mpsc::Sender<PipelineMsg>,
    scheduler: Scheduler,
}

impl DebounceActor {
    pub fn new(
        rx: mpsc::Receiver<DebounceMsg>,
        pipeline_tx: mpsc::Sender<PipelineMsg>,
        delay: Duration,
    ) -> Self {
        Self {
            rx,
            pipeline_tx,
            scheduler: Scheduler::new(delay),
        }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        loop {
            let sleep = self.scheduler.sleep_duration(Instant::now());
            tokio::select! {
                biased;
                msg = self.rx.recv() => match msg {
                    Some(DebounceMsg::Change(snapshot)) => {
                        crate::debug!("debounce"; "armed {} rev {}", snapshot.session, snapshot.revision);
                        self.scheduler.on_change(snapshot, Instant::now());
                    }
                    Some(DebounceMsg::Cancel(session)) => {
                        if self.scheduler.cancel(session) {
                            crate::debug!("debounce"; "cancelled {}", session);
                        }
                    }
                    Some(DebounceMsg::Shutdown) | None => break,
                },
                _ = tokio::time::sleep(sleep) => {
                    for snapshot in self.scheduler.take_due(Instant::now()) {
                        crate::debug!("debounce"; "fire {} rev {}", snapshot.session, snapshot.revision);
                        if self.pipeline_tx.send(PipelineMsg::Fire(snapshot)).await.is_err() {
                            return;
                        }
                    }
                }
            }
        }
        crate::debug!("debounce"; "stopped");
    }
}
