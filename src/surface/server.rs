//! WebSocket server for preview surfaces.
//!
//! Accepts connections on a dedicated thread. Each connection is handshaken
//! on its own short-lived thread, which also waits briefly for the page's
//! attach message, then handed to the surface actor in non-blocking mode.

use std::net::{IpAddr, TcpListener, TcpStream};
use std::time::Duration;

use anyhow::Result;
use tungstenite::WebSocket;
use tungstenite::protocol::Message;

use super::SurfaceCommand;
use crate::actor::messages::SurfaceMsg;
use crate::core::SessionId;

/// Maximum port retry attempts
const MAX_PORT_RETRIES: u16 = 10;

/// Upper bound for a client to finish the HTTP upgrade.
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);

/// How long to wait for the attach message the page sends on open.
const ATTACH_WAIT: Duration = Duration::from_millis(250);

/// Start the WebSocket acceptor. Returns the port actually bound.
pub fn start_ws_server_with_channel(
    interface: IpAddr,
    base_port: u16,
    surface_tx: tokio::sync::mpsc::Sender<SurfaceMsg>,
) -> Result<u16> {
    let (listener, actual_port) = try_bind_port(interface, base_port, MAX_PORT_RETRIES)?;
    listener.set_nonblocking(true)?;

    std::thread::spawn(move || {
        loop {
            if crate::core::is_shutdown() || surface_tx.is_closed() {
                break;
            }
            match listener.accept() {
                Ok((stream, addr)) => {
                    crate::debug!("surface"; "client connected: {}", addr);
                    let surface_tx = surface_tx.clone();
                    std::thread::spawn(move || {
                        if let Some(msg) = handshake(stream)
                            && surface_tx.blocking_send(msg).is_err()
                        {
                            crate::debug!("surface"; "actor gone, dropping client {}", addr);
                        }
                    });
                }
                Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    std::thread::sleep(Duration::from_millis(100));
                }
                Err(e) => {
                    crate::log!("surface"; "accept error: {}", e);
                    std::thread::sleep(Duration::from_millis(100));
                }
            }
        }
    });

    Ok(actual_port)
}

/// Upgrade `stream` and pick up an early attach. `None` if the client is unusable.
fn handshake(stream: TcpStream) -> Option<SurfaceMsg> {
    // The listener is non-blocking; the upgrade runs blocking with a timeout
    let setup = stream
        .set_nonblocking(false)
        .and_then(|()| stream.set_read_timeout(Some(HANDSHAKE_TIMEOUT)));
    if let Err(e) = setup {
        crate::debug!("surface"; "socket setup failed: {}", e);
        return None;
    }

    let mut ws = match tungstenite::accept(stream) {
        Ok(ws) => ws,
        Err(e) => {
            crate::log!("surface"; "handshake failed: {}", e);
            return None;
        }
    };

    let session = read_attach(&mut ws);

    let socket = ws.get_ref();
    if let Err(e) = socket
        .set_read_timeout(None)
        .and_then(|()| socket.set_nonblocking(true))
    {
        crate::debug!("surface"; "socket setup failed: {}", e);
        return None;
    }

    Some(SurfaceMsg::AddClient { ws, session })
}

/// The attach message, if the page sends it within `ATTACH_WAIT`.
///
/// A later attach is handled by the actor's reader loop.
fn read_attach(ws: &mut WebSocket<TcpStream>) -> Option<SessionId> {
    ws.get_ref().set_read_timeout(Some(ATTACH_WAIT)).ok()?;
    match ws.read() {
        Ok(Message::Text(text)) => match SurfaceCommand::parse(&text) {
            Some(SurfaceCommand::Attach { session }) => session.parse().ok(),
            _ => {
                crate::debug!("surface"; "expected attach, got: {}", text.as_str());
                None
            }
        },
        _ => None,
    }
}

/// Try binding to port, retry with incremented port if in use
fn try_bind_port(
    interface: IpAddr,
    base_port: u16,
    max_retries: u16,
) -> Result<(TcpListener, u16)> {
    let mut last_error = None;

    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        match TcpListener::bind((interface, port)) {
            Ok(listener) => {
                let actual_port = listener.local_addr()?.port();
                return Ok((listener, actual_port));
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(anyhow::anyhow!(
        "Failed to bind WebSocket server after {} attempts: {}",
        max_retries,
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}
