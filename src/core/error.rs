//! Pipeline error types.
//!
//! Compile and artifact errors are turned into an error view on the preview
//! surface by the orchestrator; export errors become a one-shot notice.

use std::path::PathBuf;

use thiserror::Error;

/// Failure of one pipeline step.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Compiler exited non-zero or could not be launched.
    /// Carries the captured diagnostic text verbatim.
    #[error("{0}")]
    Compile(String),

    #[error("{context} `{}`: {source}", path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Compiler reported success but produced no artifact.
    #[error("compiler exited successfully but `{}` was not produced", .0.display())]
    MissingArtifact(PathBuf),

    /// Compiler reported success but the artifact is empty.
    #[error("compiler produced an empty artifact `{}`", .0.display())]
    EmptyArtifact(PathBuf),

    /// Writing the exported artifact failed.
    #[error("failed to write `{}`: {source}", path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    pub fn io(context: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            context,
            path: path.into(),
            source,
        }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Compile(_) => "compile",
            Self::Io { .. } | Self::MissingArtifact(_) | Self::EmptyArtifact(_) => "io",
            Self::Export { .. } => "export",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_compile_error_is_verbatim() {
        let text = "! Undefined control sequence.\nl.5 \\foo\n";
        let err = PipelineError::Compile(text.to_string());
        assert_eq!(err.to_string(), text);
        assert_eq!(err.kind(), "compile");
    }

    #[test]
    fn test_io_error_display() {
        let err = PipelineError::io(
            "failed to create work directory",
            "/readonly/.texmex-temp",
            Error::new(ErrorKind::PermissionDenied, "permission denied"),
        );
        let display = err.to_string();
        assert!(display.contains("failed to create work directory"));
        assert!(display.contains("/readonly/.texmex-temp"));
        assert!(display.contains("permission denied"));
        assert_eq!(err.kind(), "io");
    }

    #[test]
    fn test_artifact_errors_are_io_kind() {
        assert_eq!(PipelineError::MissingArtifact("a.pdf".into()).kind(), "io");
        assert_eq!(PipelineError::EmptyArtifact("a.pdf".into()).kind(), "io");
    }
}
