//! Compilation of document snapshots into PDF artifacts.
//!
//! - [`invoker`]: runs the external LaTeX compiler in a session work dir
//! - [`diagnostic`]: pulls a one-line summary out of compiler output

pub mod diagnostic;
pub mod invoker;

use std::path::{Path, PathBuf};

use crate::core::{PipelineError, Snapshot};

pub use invoker::LatexInvoker;

/// Name of the source file written into a work dir.
pub const SOURCE_NAME: &str = "temp.tex";
/// Name of the artifact the compiler produces in a work dir.
pub const ARTIFACT_NAME: &str = "temp.pdf";

/// Something that turns a snapshot into an artifact on disk.
///
/// Implementations block; the pipeline calls them from `spawn_blocking`.
pub trait Compile: Send + Sync + 'static {
    fn compile(&self, snapshot: &Snapshot, work_dir: &Path) -> Result<PathBuf, PipelineError>;
}

/// Artifact location inside a work dir.
pub fn artifact_path(work_dir: &Path) -> PathBuf {
    work_dir.join(ARTIFACT_NAME)
}
