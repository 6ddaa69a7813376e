//! Actor Coordinator - wires up the preview actor system
//!
//! The Coordinator is a thin orchestrator that:
//! - Creates communication channels
//! - Starts the WebSocket acceptor for preview surfaces
//! - Wires up actors and opens the initial documents
//! - Runs them until the shutdown signal

mod runtime;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use super::debounce::DebounceActor;
use super::messages::{DebounceMsg, PipelineMsg, SurfaceMsg};
use super::pipeline::{DirExporter, PipelineActor};
use super::surface::SurfaceActor;
use super::watch::WatchActor;
use crate::compiler::LatexInvoker;
use crate::config::TexmexConfig;
use runtime::Actors;

pub const CHANNEL_BUFFER: usize = 32;

/// Channel pair feeding the pipeline actor.
pub type PipelineChannel = (mpsc::Sender<PipelineMsg>, mpsc::Receiver<PipelineMsg>);

/// Create the pipeline channel. The HTTP API keeps a sender.
pub fn pipeline_channel() -> PipelineChannel {
    mpsc::channel(CHANNEL_BUFFER)
}

/// Coordinator - wires up and runs the actor system.
pub struct Coordinator {
    config: Arc<TexmexConfig>,
    documents: Vec<PathBuf>,
    pipeline: Option<PipelineChannel>,
    shutdown_rx: Option<Receiver<()>>,
}

impl Coordinator {
    pub fn with_config(config: Arc<TexmexConfig>) -> Self {
        Self {
            config,
            documents: Vec::new(),
            pipeline: None,
            shutdown_rx: None,
        }
    }

    /// Documents to open and watch at startup.
    pub fn with_documents(mut self, documents: Vec<PathBuf>) -> Self {
        self.documents = documents;
        self
    }

    /// Use an existing pipeline channel (its sender is shared elsewhere).
    pub fn with_pipeline(mut self, channel: PipelineChannel) -> Self {
        self.pipeline = Some(channel);
        self
    }

    /// Set shutdown signal receiver.
    pub fn with_shutdown_signal(mut self, rx: Receiver<()>) -> Self {
        self.shutdown_rx = Some(rx);
        self
    }

    /// Run the actor system.
    pub async fn run(mut self) -> Result<()> {
        let (pipeline_tx, pipeline_rx) = self.pipeline.take().unwrap_or_else(pipeline_channel);
        let (debounce_tx, debounce_rx) = mpsc::channel::<DebounceMsg>(CHANNEL_BUFFER);
        let (surface_tx, surface_rx) = mpsc::channel::<SurfaceMsg>(CHANNEL_BUFFER);
        let config = &self.config;

        match crate::surface::server::start_ws_server_with_channel(
            config.serve.interface,
            config.serve.ws_port,
            surface_tx.clone(),
        ) {
            Ok(actual_port) => crate::cli::serve::set_actual_ws_port(actual_port),
            Err(e) => crate::log!("error"; "websocket server failed: {}", e),
        }

        let watch = WatchActor::new(&self.documents, pipeline_tx.clone())
            .map_err(|e| anyhow::anyhow!("watcher failed: {}", e))?;

        let pipeline = PipelineActor::new(
            (pipeline_tx.clone(), pipeline_rx),
            debounce_tx.clone(),
            surface_tx.clone(),
            Arc::new(LatexInvoker::from_config(&config.compiler)),
            Arc::new(DirExporter::new(config.export.clone())),
            config.temp_root().to_path_buf(),
        );
        let debounce = DebounceActor::new(debounce_rx, pipeline_tx.clone(), config.preview.delay());
        let surface = SurfaceActor::new(surface_rx, pipeline_tx.clone());

        let opens = self
            .documents
            .iter()
            .map(|document| PipelineMsg::Open {
                document: document.clone(),
                text: None,
                reply: None,
            })
            .collect();

        crate::debug!("actor"; "start");
        runtime::run_actors(
            Actors {
                watch,
                pipeline,
                debounce,
                surface,
            },
            (pipeline_tx, debounce_tx, surface_tx),
            opens,
            self.shutdown_rx.take(),
        )
        .await;

        crate::debug!("actor"; "stopped");
        Ok(())
    }
}
