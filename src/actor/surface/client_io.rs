use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tungstenite::WebSocket;
use tungstenite::protocol::Message;

use super::{RegisteredClient, States, SurfaceActor, attach_payload};
use crate::actor::messages::PipelineMsg;
use crate::core::SessionId;
use crate::surface::SurfaceCommand;

/// Reader thread poll interval
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Poll interval while some client still has queued output
const FLUSH_INTERVAL: Duration = Duration::from_millis(5);

impl SurfaceActor {
    /// Register a handshaken client and replay its session's state
    pub(super) fn add_client(&self, ws: WebSocket<TcpStream>, session: Option<SessionId>) {
        let mut client = RegisteredClient::new(ws, session);

        if let Some(id) = session
            && let Some(json) = attach_payload(&self.states, id)
            && !client.push(Message::Text(json.into()))
        {
            return;
        }

        let mut clients = self.clients.lock();
        crate::debug!("surface"; "client registered (total: {}, session: {:?})", clients.len() + 1, session);
        clients.push(client);
    }

    /// Background thread to read client messages and finish queued writes
    ///
    /// Exits once the actor has dropped its handle to `clients`.
    pub(super) fn client_reader_loop(
        clients: Arc<Mutex<Vec<RegisteredClient>>>,
        states: States,
        pipeline_tx: mpsc::Sender<PipelineMsg>,
    ) {
        let mut interval = POLL_INTERVAL;

        while Arc::strong_count(&clients) > 1 {
            std::thread::sleep(interval);

            let mut clients_guard = clients.lock();
            let mut disconnected = Vec::new();

            for (i, client) in clients_guard.iter_mut().enumerate() {
                if !client.flush() {
                    disconnected.push(i);
                    continue;
                }

                match client.ws.read() {
                    Ok(Message::Text(text)) => match SurfaceCommand::parse(&text) {
                        Some(SurfaceCommand::Attach { session }) => {
                            let Ok(id) = session.parse::<SessionId>() else {
                                crate::debug!("surface"; "bad session id: {}", session);
                                continue;
                            };
                            client.session = Some(id);
                            if let Some(json) = attach_payload(&states, id)
                                && !client.push(Message::Text(json.into()))
                            {
                                disconnected.push(i);
                            }
                        }
                        Some(SurfaceCommand::Export) => match client.session {
                            Some(id) => {
                                if pipeline_tx.try_send(PipelineMsg::Export(id)).is_err() {
                                    crate::log!("surface"; "pipeline busy, export dropped");
                                }
                            }
                            None => crate::debug!("surface"; "export from unattached client"),
                        },
                        None => crate::debug!("surface"; "unknown client message: {}", text.as_str()),
                    },
                    Ok(Message::Close(_)) => disconnected.push(i),
                    Err(tungstenite::Error::Io(ref e))
                        if e.kind() == std::io::ErrorKind::WouldBlock => {}
                    Err(_) => disconnected.push(i),
                    _ => {}
                }
            }

            for i in disconnected.into_iter().rev() {
                clients_guard.remove(i);
            }

            interval = if clients_guard.iter().any(|c| c.flushing) {
                FLUSH_INTERVAL
            } else {
                POLL_INTERVAL
            };
        }
    }
}
