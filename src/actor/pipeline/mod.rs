//! Pipeline Actor - the orchestrator
//!
//! Owns every open session and drives snapshots through
//! compile -> transport -> surface push.
//!
//! ```text
//! Open ----------------------------> submit -> JobSlot -> spawn_blocking(compile + encode)
//! Change -> DebounceActor -> Fire -> submit                        |
//!                                                                  v
//!                          SurfaceActor <- Show(Artifact | Error) <- JobDone
//! ```
//!
//! Messages are handled one at a time; the only suspension points are the
//! channel sends, the compile job and the export copy.

mod export;
mod handlers;
mod supervisor;


use std::path::PathBuf;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tokio::sync::mpsc;

use super::messages::{DebounceMsg, PipelineMsg, SessionInfo, SurfaceMsg};
use crate::compiler::{Compile, artifact_path};
use crate::core::SessionId;
use crate::surface::View;
use supervisor::JobSlot;

pub use export::{DirExporter, Exporter};

/// One open preview surface.
struct Session {
    document: PathBuf,
    work_dir: PathBuf,
    view: View,
    /// Latest revision handed to the job slot.
    submitted: u64,
    slot: JobSlot,
}

impl Session {
    fn info(&self, id: SessionId) -> SessionInfo {
        SessionInfo {
            id,
            document: self.document.clone(),
            artifact: artifact_path(&self.work_dir),
            view: self.view.label(),
        }
    }

    fn name(&self) -> String {
        self.document.file_name().map_or_else(
            || self.document.display().to_string(),
            |n| n.to_string_lossy().into_owned(),
        )
    }
}

pub struct PipelineActor {
    rx: mpsc::Receiver<PipelineMsg>,
    /// Compile jobs report back through this.
    self_tx: mpsc::Sender<PipelineMsg>,
    debounce_tx: mpsc::Sender<DebounceMsg>,
    surface_tx: mpsc::Sender<SurfaceMsg>,
    compiler: Arc<dyn Compile>,
    exporter: Arc<dyn Exporter>,
    /// Parent of all session work dirs.
    temp_root: PathBuf,
    sessions: FxHashMap<SessionId, Session>,
    /// Revisions are actor-wide so a reopened session never reuses one.
    last_revision: u64,
    next_job: u64,
}

impl PipelineActor {
    pub fn new(
        (self_tx, rx): (mpsc::Sender<PipelineMsg>, mpsc::Receiver<PipelineMsg>),
        debounce_tx: mpsc::Sender<DebounceMsg>,
        surface_tx: mpsc::Sender<SurfaceMsg>,
        compiler: Arc<dyn Compile>,
        exporter: Arc<dyn Exporter>,
        temp_root: PathBuf,
    ) -> Self {
        Self {
            rx,
            self_tx,
            debounce_tx,
            surface_tx,
            compiler,
            exporter,
            temp_root,
            sessions: FxHashMap::default(),
            last_revision: 0,
            next_job: 1,
        }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        while let Some(msg) = self.rx.recv().await {
            match msg {
                PipelineMsg::Open {
                    document,
                    text,
                    reply,
                } => {
                    let result = self.on_open(document, text).await;
                    if let Some(reply) = reply {
                        let _ = reply.send(result);
                    }
                }
                PipelineMsg::Change { document, text } => self.on_change(document, text).await,
                PipelineMsg::Close { document, reply } => {
                    let closed = self.on_close(document).await;
                    if let Some(reply) = reply {
                        let _ = reply.send(closed);
                    }
                }
                PipelineMsg::Fire(snapshot) => self.on_fire(snapshot),
                PipelineMsg::JobDone {
                    session,
                    job,
                    outcome,
                    elapsed,
                } => self.on_job_done(session, job, outcome, elapsed).await,
                PipelineMsg::Export(session) => self.on_export(session).await,
                PipelineMsg::Lookup { session, reply } => {
                    let _ = reply.send(self.sessions.get(&session).map(|s| s.info(session)));
                }
                PipelineMsg::List(reply) => {
                    let mut list: Vec<SessionInfo> =
                        self.sessions.iter().map(|(id, s)| s.info(*id)).collect();
                    list.sort_by(|a, b| a.document.cmp(&b.document));
                    let _ = reply.send(list);
                }
                PipelineMsg::Shutdown => {
                    crate::debug!("pipeline"; "shutting down");
                    break;
                }
            }
        }
    }
}
