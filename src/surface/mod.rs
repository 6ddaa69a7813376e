//! Render surface: the browser page that displays a session's artifact.
//!
//! - [`state`]: per-session surface state machine
//! - [`message`]: JSON payloads exchanged with the page
//! - [`server`]: WebSocket acceptor feeding the surface actor

pub mod message;
pub mod server;
pub mod state;

pub use message::{NoticeLevel, SurfaceCommand, SurfacePayload};
pub use state::{SurfaceState, View};
