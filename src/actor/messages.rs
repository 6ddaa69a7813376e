//! Actor Message Definitions
//!
//! Message types for inter-actor communication.
//!
//! ```text
//! WatchActor --Change--> PipelineActor --Change--> DebounceActor
//!                            ^    |                      |
//!                            |    +--Fire----------------+
//!                            |    |
//!  HTTP /api --Open/Close----+    +--Show/Notice--> SurfaceActor --> pages
//!  page --Export-----------------------------------------'
//! ```

use std::net::TcpStream;
use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::oneshot;
use tungstenite::WebSocket;

use crate::core::{PipelineError, SessionId, Snapshot};
use crate::surface::{NoticeLevel, View};
use crate::transport::EncodedBlob;

// =============================================================================
// PipelineActor Messages
// =============================================================================

/// Reply to an open request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenReply {
    pub session: SessionId,
    /// The session already existed and was brought to the foreground.
    pub reused: bool,
}

/// Read-only view of one session, for the HTTP index and preview pages.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub id: SessionId,
    pub document: PathBuf,
    /// On-disk artifact of the work dir (may not exist yet).
    pub artifact: PathBuf,
    pub view: &'static str,
}

/// Messages to Pipeline Actor
#[derive(Debug)]
pub enum PipelineMsg {
    /// Open (or foreground) the surface for a document and compile now.
    /// `text: None` reads the document from disk.
    Open {
        document: PathBuf,
        text: Option<String>,
        reply: Option<oneshot::Sender<Result<OpenReply, String>>>,
    },
    /// Full new text of an open document.
    Change { document: PathBuf, text: String },
    /// Close the surface of a document. Replies whether it was open.
    Close {
        document: PathBuf,
        reply: Option<oneshot::Sender<bool>>,
    },
    /// Debounce deadline elapsed for this snapshot.
    Fire(Snapshot),
    /// A compile job finished.
    JobDone {
        session: SessionId,
        job: u64,
        outcome: Result<EncodedBlob, PipelineError>,
        elapsed: Duration,
    },
    /// Export the current artifact of a session.
    Export(SessionId),
    Lookup {
        session: SessionId,
        reply: oneshot::Sender<Option<SessionInfo>>,
    },
    List(oneshot::Sender<Vec<SessionInfo>>),
    Shutdown,
}

// =============================================================================
// DebounceActor Messages
// =============================================================================

/// Messages to Debounce Actor
#[derive(Debug)]
pub enum DebounceMsg {
    /// Store as latest snapshot and re-arm the session's deadline.
    Change(Snapshot),
    /// Drop the session's pending deadline.
    Cancel(SessionId),
    Shutdown,
}

// =============================================================================
// SurfaceActor Messages
// =============================================================================

/// Messages to Surface Actor
#[derive(Debug)]
pub enum SurfaceMsg {
    /// Open the session's surface; nothing to show until the first push.
    Open(SessionId),
    /// Replace the session's content.
    Show { session: SessionId, view: View },
    /// One-shot notice, not part of the surface state.
    Notice {
        session: SessionId,
        level: NoticeLevel,
        message: String,
    },
    Close(SessionId),
    /// Handshaken, non-blocking client and the session it attached to.
    AddClient {
        ws: WebSocket<TcpStream>,
        session: Option<SessionId>,
    },
    Shutdown,
}
