//! Preview server: session pages, artifact download and the control API.
//!
//! ```text
//! GET  /                             open sessions
//! GET  /preview/<session>            render surface (connects over WebSocket)
//! GET  /preview/<session>/document.pdf
//! POST /api/open    {path, text?}    -> {session, url, reused}
//! POST /api/change  {path, text}
//! POST /api/close   {path}
//! ```

mod api;
mod lifecycle;
mod response;
mod route;

use crate::{
    actor::coordinator::pipeline_channel,
    config::cfg,
    core::SessionId,
    debug, log,
};
use anyhow::{Context, Result};
use api::ServeContext;
use crossbeam::channel;
use route::Route;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU16, Ordering};
use tiny_http::{Request, Server};

/// Default WebSocket port for preview surfaces
pub const DEFAULT_WS_PORT: u16 = 35730;

/// Actual WebSocket port (may differ from the configured one if it was in use)
/// Updated by coordinator after WebSocket server binds successfully
static ACTUAL_WS_PORT: AtomicU16 = AtomicU16::new(DEFAULT_WS_PORT);

/// Update the actual WebSocket port (called by coordinator after binding)
pub fn set_actual_ws_port(port: u16) {
    ACTUAL_WS_PORT.store(port, Ordering::Relaxed);
}

/// Get the actual WebSocket port
fn get_actual_ws_port() -> u16 {
    ACTUAL_WS_PORT.load(Ordering::Relaxed)
}

/// Run the preview server for `files` until Ctrl+C.
pub fn serve_preview(files: &[PathBuf]) -> Result<()> {
    let config = cfg();
    set_actual_ws_port(config.serve.ws_port);

    let documents: Vec<PathBuf> = files.iter().map(|f| config.resolve_document(f)).collect();
    for document in &documents {
        if !document.is_file() {
            log!("warning"; "{} does not exist yet", document.display());
        }
    }

    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);

    let (shutdown_tx, shutdown_rx) = channel::unbounded::<()>();
    lifecycle::register_server_for_shutdown(Arc::clone(&server), shutdown_tx);

    log!("serve"; "http://{}", addr);
    for document in &documents {
        log!(
            "preview";
            "{} -> http://{}/preview/{}",
            document.display(),
            addr,
            SessionId::for_document(document)
        );
    }

    let (pipeline_tx, pipeline_rx) = pipeline_channel();
    let actor_handle = lifecycle::spawn_actors(
        Arc::clone(&config),
        documents,
        (pipeline_tx.clone(), pipeline_rx),
        shutdown_rx,
    );

    let context = Arc::new(ServeContext {
        config,
        addr,
        pipeline_tx,
    });
    run_request_loop(&server, context)?;

    lifecycle::wait_for_shutdown(actor_handle);
    debug!("serve"; "stopped");
    Ok(())
}

fn run_request_loop(server: &Server, context: Arc<ServeContext>) -> Result<()> {
    // Handlers block on the pipeline actor; keep them off the accept loop.
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(4)
        .build()
        .context("failed to create thread pool")?;

    for request in server.incoming_requests() {
        let context = Arc::clone(&context);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &context) {
                log!("serve"; "request error: {e}");
            }
        });
    }
    Ok(())
}

/// Handle a single HTTP request
fn handle_request(request: Request, context: &ServeContext) -> Result<()> {
    if crate::core::is_shutdown() {
        return response::respond_unavailable(request);
    }

    debug!("serve"; "{} {}", request.method(), request.url());
    match Route::resolve(request.method(), request.url()) {
        Route::Index => context.index(request),
        Route::Preview(session) => context.preview(request, session),
        Route::Artifact(session) => context.artifact(request, session),
        Route::Open => context.open(request),
        Route::Change => context.change(request),
        Route::Close => context.close(request),
        Route::MethodNotAllowed => response::respond_method_not_allowed(request),
        Route::NotFound => response::respond_not_found(request, "404 Not Found"),
    }
}

#[cfg(test)]
mod tests;
