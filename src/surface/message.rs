//! Surface wire protocol.
//!
//! Outbound (server -> page), tagged by `kind`:
//!
//! ```json
//! {"kind":"artifact","data":"JVBERi0xLjQ..."}
//! {"kind":"error","message":"! Undefined control sequence.\n..."}
//! {"kind":"closed"}
//! {"kind":"notice","level":"info","message":"PDF saved to /work/main.pdf"}
//! ```
//!
//! Inbound (page -> server), tagged by `command`:
//!
//! ```json
//! {"command":"attach","session":"0123456789abcdef"}
//! {"command":"export"}
//! ```

use serde::{Deserialize, Serialize};

/// Message pushed to surface clients.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SurfacePayload<'a> {
    Artifact { data: &'a str },
    Error { message: &'a str },
    Closed,
    Notice { level: NoticeLevel, message: &'a str },
}

impl SurfacePayload<'_> {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Message received from a surface client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum SurfaceCommand {
    /// Bind this connection to a session.
    Attach { session: String },
    /// Save the current artifact.
    Export,
}

impl SurfaceCommand {
    pub fn parse(text: &str) -> Option<Self> {
        serde_json::from_str(text).ok()
    }
}
