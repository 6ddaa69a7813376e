//! Actor System for Live Preview
//!
//! Message-passing concurrency for preview mode:
//!
//! ```text
//! WatchActor --> PipelineActor <--> DebounceActor
//!  (notify)      (sessions, jobs)     (timers)
//!                      |
//!                      v
//!                SurfaceActor --> pages
//!                (websocket)
//! ```
//!
//! # Module Structure
//!
//! - `messages` - Message types for inter-actor communication
//! - `watch` - Document watcher
//! - `debounce` - Per-session debounce timers
//! - `pipeline` - Session orchestration, compile jobs, export
//! - `surface` - WebSocket delivery to preview pages
//! - `coordinator` - Wires up and runs actors

pub mod coordinator;
pub mod debounce;
pub mod messages;
pub mod pipeline;
pub mod surface;
pub mod watch;

pub use coordinator::Coordinator;
