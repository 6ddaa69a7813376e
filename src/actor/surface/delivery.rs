use std::io::ErrorKind;
use std::net::TcpStream;

use tungstenite::WebSocket;
use tungstenite::protocol::Message;

use super::{RegisteredClient, SurfaceActor};
use crate::core::SessionId;

impl RegisteredClient {
    pub(super) fn new(ws: WebSocket<TcpStream>, session: Option<SessionId>) -> Self {
        Self {
            ws,
            session,
            flushing: false,
        }
    }

    /// Queue `msg` and write as much of it as the socket accepts.
    ///
    /// Returns `false` once the client is gone.
    pub(super) fn push(&mut self, msg: Message) -> bool {
        let result = self.ws.send(msg);
        self.settle(result)
    }

    /// Continue a write that stopped on a full socket buffer.
    pub(super) fn flush(&mut self) -> bool {
        if !self.flushing {
            return true;
        }
        let result = self.ws.flush();
        self.settle(result)
    }

    /// `WouldBlock` leaves the frame in tungstenite's write buffer.
    fn settle(&mut self, result: tungstenite::Result<()>) -> bool {
        match result {
            Ok(()) => {
                self.flushing = false;
                true
            }
            Err(tungstenite::Error::Io(e)) if e.kind() == ErrorKind::WouldBlock => {
                self.flushing = true;
                true
            }
            Err(e) => {
                crate::debug!("surface"; "client disconnected: {}", e);
                false
            }
        }
    }
}

impl SurfaceActor {
    /// Send a JSON payload to every client attached to `session`.
    pub(super) fn send_to_session(&self, session: SessionId, json: String) {
        let msg = Message::Text(json.into());
        let mut clients = self.clients.lock();
        let mut sent = 0;

        clients.retain_mut(|client| {
            if client.session != Some(session) {
                return true;
            }
            let alive = client.push(msg.clone());
            if alive {
                sent += 1;
            }
            alive
        });

        crate::debug!("surface"; "sent to {} clients of {}", sent, session);
    }
}
