//! Export collaborator.
//!
//! Export never compiles: it re-reads the artifact currently on disk and
//! hands it to an [`Exporter`].

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::ExportConfig;
use crate::core::{PipelineError, SessionId};

/// Everything an exporter needs to know about one export.
#[derive(Debug, Clone, Copy)]
pub struct ExportRequest<'a> {
    pub session: SessionId,
    pub document: &'a Path,
    pub artifact: &'a Path,
}

/// Destination for the "Download PDF" action. Blocking.
pub trait Exporter: Send + Sync + 'static {
    /// Returns where the artifact ended up.
    fn export(&self, request: &ExportRequest<'_>) -> Result<PathBuf, PipelineError>;
}

/// Copies the artifact to `[export] dir`.
#[derive(Debug, Clone)]
pub struct DirExporter {
    config: ExportConfig,
}

impl DirExporter {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }
}

impl Exporter for DirExporter {
    fn export(&self, request: &ExportRequest<'_>) -> Result<PathBuf, PipelineError> {
        let bytes = fs::read(request.artifact).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PipelineError::MissingArtifact(request.artifact.to_path_buf())
            } else {
                PipelineError::io("failed to read artifact", request.artifact, e)
            }
        })?;

        let dest = self.config.destination_for(request.document);
        let write = || -> std::io::Result<()> {
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&dest, &bytes)
        };
        write().map_err(|source| PipelineError::Export {
            path: dest.clone(),
            source,
        })?;

        Ok(dest)
    }
}
