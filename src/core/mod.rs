//! Core types shared across the pipeline.

mod error;
mod session;
mod state;

pub use error::PipelineError;
pub use session::{SessionId, Snapshot};
pub use state::{is_shutdown, register_server, setup_shutdown_handler};
