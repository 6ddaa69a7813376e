use std::time::Duration;

use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use crate::actor::debounce::DebounceActor;
use crate::actor::messages::{DebounceMsg, PipelineMsg, SurfaceMsg};
use crate::actor::pipeline::PipelineActor;
use crate::actor::surface::SurfaceActor;
use crate::actor::watch::WatchActor;

pub(super) struct Actors {
    pub(super) watch: WatchActor,
    pub(super) pipeline: PipelineActor,
    pub(super) debounce: DebounceActor,
    pub(super) surface: SurfaceActor,
}

type Senders = (
    mpsc::Sender<PipelineMsg>,
    mpsc::Sender<DebounceMsg>,
    mpsc::Sender<SurfaceMsg>,
);

/// Run all actors concurrently until shutdown.
pub(super) async fn run_actors(
    actors: Actors,
    (pipeline_tx, debounce_tx, surface_tx): Senders,
    opens: Vec<PipelineMsg>,
    shutdown_rx: Option<Receiver<()>>,
) {
    let pipeline_handle = tokio::spawn(actors.pipeline.run());
    let debounce_handle = tokio::spawn(actors.debounce.run());
    let surface_handle = tokio::spawn(actors.surface.run());
    let watch_handle = tokio::spawn(actors.watch.run());

    for open in opens {
        if pipeline_tx.send(open).await.is_err() {
            break;
        }
    }

    if let Some(rx) = shutdown_rx {
        loop {
            if rx.try_recv().is_ok() || crate::core::is_shutdown() {
                crate::debug!("actor"; "shutdown signal received");
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    } else {
        let _ = watch_handle.await;
        return;
    }

    watch_handle.abort();
    let _ = pipeline_tx.send(PipelineMsg::Shutdown).await;
    let _ = debounce_tx.send(DebounceMsg::Shutdown).await;
    let _ = surface_tx.send(SurfaceMsg::Shutdown).await;

    let drain = async {
        let _ = pipeline_handle.await;
        let _ = debounce_handle.await;
        let _ = surface_handle.await;
    };
    let _ = tokio::time::timeout(Duration::from_millis(500), drain).await;
}
