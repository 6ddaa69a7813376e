//! External LaTeX compiler invocation.
//!
//! One call, one process: the snapshot is written to `<work_dir>/temp.tex`
//! and the compiler is run with `-interaction=nonstopmode` so it never waits
//! on the terminal. A zero exit is only trusted if `temp.pdf` exists and is
//! not empty.

use std::fs;
use std::path::{Path, PathBuf};

use super::{ARTIFACT_NAME, Compile, SOURCE_NAME};
use crate::config::CompilerConfig;
use crate::core::{PipelineError, Snapshot};
use crate::utils::exec::{Cmd, combined_output};

/// Runs `pdflatex` (or whatever `[compiler] path` names).
#[derive(Debug, Clone)]
pub struct LatexInvoker {
    program: PathBuf,
    args: Vec<String>,
}

impl LatexInvoker {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_config(config: &CompilerConfig) -> Self {
        Self::new(config.program(), config.args.clone())
    }

    fn command(&self, work_dir: &Path, source: &Path) -> Cmd {
        let mut output_dir = std::ffi::OsString::from("-output-directory=");
        output_dir.push(work_dir);

        Cmd::new(&self.program)
            .arg("-interaction=nonstopmode")
            .arg(output_dir)
            .args(&self.args)
            .arg(source)
            .cwd(work_dir)
    }
}

impl Compile for LatexInvoker {
    fn compile(&self, snapshot: &Snapshot, work_dir: &Path) -> Result<PathBuf, PipelineError> {
        fs::create_dir_all(work_dir)
            .map_err(|e| PipelineError::io("failed to create work directory", work_dir, e))?;

        let source = work_dir.join(SOURCE_NAME);
        fs::write(&source, snapshot.text.as_bytes())
            .map_err(|e| PipelineError::io("failed to write source", &source, e))?;

        let cmd = self.command(work_dir, &source);
        let program = cmd.program_name();
        let output = cmd.output().map_err(|e| {
            PipelineError::Compile(format!("failed to launch `{program}`: {e}"))
        })?;

        if !output.status.success() {
            return Err(PipelineError::Compile(combined_output(&output)));
        }

        verify_artifact(&work_dir.join(ARTIFACT_NAME))
    }
}

/// A successful exit must leave a non-empty artifact behind.
fn verify_artifact(path: &Path) -> Result<PathBuf, PipelineError> {
    match fs::metadata(path) {
        Ok(meta) if meta.len() == 0 => Err(PipelineError::EmptyArtifact(path.to_path_buf())),
        Ok(_) => Ok(path.to_path_buf()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(PipelineError::MissingArtifact(path.to_path_buf()))
        }
        Err(e) => Err(PipelineError::io("failed to inspect artifact", path, e)),
    }
}
