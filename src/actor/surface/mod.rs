//! Surface Actor - pushes session state to preview pages
//!
//! This actor is responsible for:
//! - Owning WebSocket client connections (handshaken by `surface::server`)
//! - Tracking each session's surface state so late attachers catch up
//! - Forwarding the page's export action to the pipeline
//!
//! # Architecture
//!
//! ```text
//! PipelineActor --[Show/Notice/Close]--> SurfaceActor --[session clients]--> pages
//!       ^                                                                      |
//!       +-----------------------------[export]---------------------------------+
//! ```

mod client_io;
mod delivery;

use std::net::TcpStream;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tokio::sync::mpsc;
use tungstenite::WebSocket;

use super::messages::{PipelineMsg, SurfaceMsg};
use crate::core::SessionId;
use crate::surface::{SurfacePayload, SurfaceState};

/// A connected page and the session it is attached to
struct RegisteredClient {
    ws: WebSocket<TcpStream>,
    session: Option<SessionId>,
    /// A write hit a full socket buffer; the rest sits in the write buffer.
    flushing: bool,
}

type States = Arc<Mutex<FxHashMap<SessionId, SurfaceState>>>;

pub struct SurfaceActor {
    rx: mpsc::Receiver<SurfaceMsg>,
    /// Connected clients (shared with the reader thread)
    clients: Arc<Mutex<Vec<RegisteredClient>>>,
    /// Latest state per session, replayed to newly attached clients
    states: States,
    pipeline_tx: mpsc::Sender<PipelineMsg>,
}

impl SurfaceActor {
    pub fn new(rx: mpsc::Receiver<SurfaceMsg>, pipeline_tx: mpsc::Sender<PipelineMsg>) -> Self {
        Self {
            rx,
            clients: Arc::new(Mutex::new(Vec::new())),
            states: Arc::new(Mutex::new(FxHashMap::default())),
            pipeline_tx,
        }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        let clients = Arc::clone(&self.clients);
        let states = Arc::clone(&self.states);
        let pipeline_tx = self.pipeline_tx.clone();
        std::thread::spawn(move || {
            Self::client_reader_loop(clients, states, pipeline_tx);
        });

        while let Some(msg) = self.rx.recv().await {
            match msg {
                SurfaceMsg::Open(session) => {
                    self.states.lock().entry(session).or_default().open();
                }

                SurfaceMsg::Show { session, view } => {
                    let json = view.payload().map(|p| p.to_json());
                    self.states.lock().entry(session).or_default().show(view);
                    if let Some(json) = json {
                        self.send_to_session(session, json);
                    }
                }

                SurfaceMsg::Notice {
                    session,
                    level,
                    message,
                } => {
                    let json = SurfacePayload::Notice {
                        level,
                        message: &message,
                    }
                    .to_json();
                    self.send_to_session(session, json);
                }

                SurfaceMsg::Close(session) => {
                    self.states.lock().entry(session).or_default().close();
                    self.send_to_session(session, SurfacePayload::Closed.to_json());
                }

                SurfaceMsg::AddClient { ws, session } => self.add_client(ws, session),

                SurfaceMsg::Shutdown => {
                    crate::debug!("surface"; "shutting down");
                    let mut clients = self.clients.lock();
                    for mut client in clients.drain(..) {
                        let _ = client.ws.close(None);
                    }
                    break;
                }
            }
        }
    }
}

/// JSON a client attaching to `session` should receive right away.
///
/// Sessions the actor has never heard of are reported closed.
fn attach_payload(states: &States, session: SessionId) -> Option<String> {
    match states.lock().get(&session) {
        Some(state) => state.payload().map(|p| p.to_json()),
        None => Some(SurfacePayload::Closed.to_json()),
    }
}
