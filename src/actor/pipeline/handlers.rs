use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::export::ExportRequest;
use super::supervisor::Ticket;
use super::{PipelineActor, Session};
use crate::actor::messages::{DebounceMsg, OpenReply, PipelineMsg, SurfaceMsg};
use crate::compiler::{artifact_path, diagnostic};
use crate::core::{PipelineError, SessionId, Snapshot};
use crate::logger;
use crate::surface::{NoticeLevel, View};
use crate::transport::{self, EncodedBlob};
use crate::utils::path::normalize_path;

impl PipelineActor {
    /// Open or foreground the session for `document` and compile right away.
    pub(super) async fn on_open(
        &mut self,
        document: PathBuf,
        text: Option<String>,
    ) -> Result<OpenReply, String> {
        let document = normalize_path(&document);
        let text = match text {
            Some(text) => text,
            None => std::fs::read_to_string(&document).map_err(|e| {
                let message = format!("failed to read `{}`: {e}", document.display());
                crate::log!("error"; "{}", message);
                message
            })?,
        };

        let id = SessionId::for_document(&document);
        let reused = self.sessions.contains_key(&id);
        let revision = self.next_revision();
        let temp_root = &self.temp_root;
        let session = self.sessions.entry(id).or_insert_with(|| Session {
            work_dir: temp_root.join(id.to_string()),
            document: document.clone(),
            view: View::Blank,
            submitted: 0,
            slot: Default::default(),
        });

        let snapshot = Snapshot::new(id, revision, text);
        let view = session.view.clone();

        if reused {
            crate::log!("preview"; "foreground {}", document.display());
        } else {
            crate::log!("preview"; "open {} ({})", document.display(), id);
        }

        // The immediate compile makes any armed deadline obsolete.
        let _ = self.debounce_tx.send(DebounceMsg::Cancel(id)).await;
        let surface = if reused {
            SurfaceMsg::Show { session: id, view }
        } else {
            SurfaceMsg::Open(id)
        };
        let _ = self.surface_tx.send(surface).await;
        self.submit(snapshot);

        Ok(OpenReply {
            session: id,
            reused,
        })
    }

    /// Full new text for an open document; arms the debounce timer.
    pub(super) async fn on_change(&mut self, document: PathBuf, text: String) {
        let document = normalize_path(&document);
        let id = SessionId::for_document(&document);
        if !self.sessions.contains_key(&id) {
            crate::debug!("pipeline"; "ignoring change, not open: {}", document.display());
            return;
        }

        let snapshot = Snapshot::new(id, self.next_revision(), text);
        let _ = self.debounce_tx.send(DebounceMsg::Change(snapshot)).await;
    }

    fn next_revision(&mut self) -> u64 {
        self.last_revision += 1;
        self.last_revision
    }

    pub(super) fn on_fire(&mut self, snapshot: Snapshot) {
        match self.sessions.get(&snapshot.session) {
            None => {
                crate::debug!("pipeline"; "fire for closed session {}", snapshot.session);
            }
            Some(session) if snapshot.revision <= session.submitted => {
                crate::debug!(
                    "pipeline";
                    "stale fire {} rev {} (submitted {})",
                    snapshot.session, snapshot.revision, session.submitted
                );
            }
            Some(_) => self.submit(snapshot),
        }
    }

    /// Hand a snapshot to the session's job slot, starting it if idle.
    fn submit(&mut self, snapshot: Snapshot) {
        let id = snapshot.session;
        let Some(session) = self.sessions.get_mut(&id) else {
            return;
        };

        session.submitted = snapshot.revision;
        let job = self.next_job;
        self.next_job += 1;

        match session.slot.submit(snapshot, job) {
            Some(ticket) => {
                let work_dir = session.work_dir.clone();
                self.spawn_job(id, work_dir, ticket);
            }
            None => crate::debug!("pipeline"; "{} busy, parked job {}", id, job),
        }
    }

    /// Compile and encode off the actor thread; the result returns as `JobDone`.
    fn spawn_job(&self, session: SessionId, work_dir: PathBuf, ticket: Ticket) {
        let compiler = Arc::clone(&self.compiler);
        let tx = self.self_tx.clone();
        let job = ticket.job;
        crate::debug!("pipeline"; "start job {} for {} rev {}", job, session, ticket.snapshot.revision);

        tokio::spawn(async move {
            let start = Instant::now();
            let outcome = tokio::task::spawn_blocking(move || {
                let artifact = compiler.compile(&ticket.snapshot, &work_dir)?;
                transport::encode(&artifact)
            })
            .await
            .unwrap_or_else(|e| Err(PipelineError::Compile(format!("compile task failed: {e}"))));

            let _ = tx
                .send(PipelineMsg::JobDone {
                    session,
                    job,
                    outcome,
                    elapsed: start.elapsed(),
                })
                .await;
        });
    }

    pub(super) async fn on_job_done(
        &mut self,
        id: SessionId,
        job: u64,
        outcome: Result<EncodedBlob, PipelineError>,
        elapsed: Duration,
    ) {
        let Some(session) = self.sessions.get_mut(&id) else {
            crate::debug!("pipeline"; "job {} finished after {} closed", job, id);
            return;
        };

        let done = session.slot.complete(job);
        if done.apply {
            let name = session.name();
            let view = match outcome {
                Ok(blob) => {
                    logger::status_success(&format!(
                        "compiled {name} ({}ms)",
                        elapsed.as_millis()
                    ));
                    View::Artifact(blob)
                }
                Err(e) => {
                    crate::debug!("pipeline"; "{} error for {}", e.kind(), id);
                    let message = e.to_string();
                    logger::status_error(
                        &format!("compile failed: {name}"),
                        &diagnostic::summarize(&message),
                    );
                    View::Error(message)
                }
            };
            session.view = view.clone();
            let _ = self.surface_tx.send(SurfaceMsg::Show { session: id, view }).await;
        } else {
            crate::debug!("pipeline"; "discarded superseded job {} for {}", job, id);
        }

        if let Some(ticket) = done.next {
            let work_dir = session.work_dir.clone();
            self.spawn_job(id, work_dir, ticket);
        }
    }

    /// Remove the session. Returns whether it was open.
    pub(super) async fn on_close(&mut self, document: PathBuf) -> bool {
        let document = normalize_path(&document);
        let id = SessionId::for_document(&document);
        if self.sessions.remove(&id).is_none() {
            return false;
        }

        crate::log!("preview"; "close {}", document.display());
        let _ = self.debounce_tx.send(DebounceMsg::Cancel(id)).await;
        let _ = self.surface_tx.send(SurfaceMsg::Close(id)).await;
        true
    }

    /// Copy the on-disk artifact out. Outcome is a notice; state is untouched.
    pub(super) async fn on_export(&mut self, id: SessionId) {
        let Some(session) = self.sessions.get(&id) else {
            let _ = self
                .surface_tx
                .send(SurfaceMsg::Notice {
                    session: id,
                    level: NoticeLevel::Error,
                    message: "Failed to save PDF: preview is closed".to_string(),
                })
                .await;
            return;
        };

        let document = session.document.clone();
        let artifact = artifact_path(&session.work_dir);
        let exporter = Arc::clone(&self.exporter);
        let surface_tx = self.surface_tx.clone();

        tokio::spawn(async move {
            let result = tokio::task::spawn_blocking(move || {
                exporter.export(&ExportRequest {
                    session: id,
                    document: &document,
                    artifact: &artifact,
                })
            })
            .await
            .unwrap_or_else(|e| {
                Err(PipelineError::Export {
                    path: PathBuf::new(),
                    source: std::io::Error::other(e.to_string()),
                })
            });

            let (level, message) = match result {
                Ok(dest) => {
                    crate::log!("export"; "saved {}", dest.display());
                    (NoticeLevel::Info, format!("PDF saved to {}", dest.display()))
                }
                Err(e) => {
                    crate::log!("error"; "export failed: {}", e);
                    (NoticeLevel::Error, format!("Failed to save PDF: {e}"))
                }
            };

            let _ = surface_tx
                .send(SurfaceMsg::Notice {
                    session: id,
                    level,
                    message,
                })
                .await;
        });
    }
}
