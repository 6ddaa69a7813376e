//! `texmex compile`: one compile, no server.
//!
//! Uses the same work dir and invoker as a preview session, then copies the
//! artifact out.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};

use crate::compiler::{Compile, LatexInvoker, diagnostic};
use crate::config::TexmexConfig;
use crate::core::{PipelineError, SessionId, Snapshot};
use crate::{debug, log};

/// Compile `file` once and write the PDF to `output` (or `<stem>.pdf` beside it).
pub fn compile_once(config: &TexmexConfig, file: &Path, output: Option<&Path>) -> Result<PathBuf> {
    compile_with(
        &LatexInvoker::from_config(&config.compiler),
        config,
        file,
        output,
    )
}

fn compile_with(
    compiler: &dyn Compile,
    config: &TexmexConfig,
    file: &Path,
    output: Option<&Path>,
) -> Result<PathBuf> {
    let document = config.resolve_document(file);
    let text = fs::read_to_string(&document)
        .with_context(|| format!("failed to read {}", document.display()))?;

    let session = SessionId::for_document(&document);
    let work_dir = config.temp_root().join(session.to_string());
    debug!("compile"; "{} in {}", document.display(), work_dir.display());

    let started = Instant::now();
    let artifact = match compiler.compile(&Snapshot::new(session, 1, text), &work_dir) {
        Ok(artifact) => artifact,
        Err(PipelineError::Compile(message)) => {
            log!("error"; "{}", diagnostic::summarize(&message));
            bail!("failed to compile {}", document.display());
        }
        Err(e) => return Err(e.into()),
    };

    let destination = match output {
        Some(path) => crate::utils::path::resolve_path(path, &std::env::current_dir()?),
        None => document.with_extension("pdf"),
    };
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::copy(&artifact, &destination)
        .with_context(|| format!("failed to write {}", destination.display()))?;

    log!(
        "compile";
        "{} -> {} ({}ms)",
        document.display(),
        destination.display(),
        started.elapsed().as_millis()
    );
    Ok(destination)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Copies the source text into the artifact, or fails with a LaTeX-style log.
    struct CopyCompiler {
        fail: bool,
    }

    impl Compile for CopyCompiler {
        fn compile(&self, snapshot: &Snapshot, work_dir: &Path) -> Result<PathBuf, PipelineError> {
            if self.fail {
                return Err(PipelineError::Compile(
                    "! Undefined control sequence.\nl.3 \\foo".into(),
                ));
            }
            fs::create_dir_all(work_dir).unwrap();
            let artifact = crate::compiler::artifact_path(work_dir);
            fs::write(&artifact, snapshot.text.as_bytes()).unwrap();
            Ok(artifact)
        }
    }

    fn config_in(dir: &Path) -> TexmexConfig {
        let mut config = TexmexConfig {
            root: dir.to_path_buf(),
            ..Default::default()
        };
        config.preview.temp_dir = dir.join(".texmex-temp");
        config
    }

    #[test]
    fn test_default_output_next_to_document() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        fs::write(root.join("main.tex"), "%PDF body").unwrap();
        let config = config_in(&root);

        let written = compile_with(
            &CopyCompiler { fail: false },
            &config,
            Path::new("main.tex"),
            None,
        )
        .unwrap();

        assert_eq!(written, root.join("main.pdf"));
        assert_eq!(fs::read_to_string(&written).unwrap(), "%PDF body");
        let session = SessionId::for_document(&root.join("main.tex"));
        assert!(root.join(".texmex-temp").join(session.to_string()).join("temp.pdf").exists());
    }

    #[test]
    fn test_explicit_output_creates_parent() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        fs::write(root.join("main.tex"), "body").unwrap();
        let out = root.join("build").join("paper.pdf");

        let written = compile_with(
            &CopyCompiler { fail: false },
            &config_in(&root),
            Path::new("main.tex"),
            Some(&out),
        )
        .unwrap();

        assert_eq!(written, out);
        assert!(out.exists());
    }

    #[test]
    fn test_compile_failure_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        fs::write(root.join("main.tex"), "\\foo").unwrap();

        let result = compile_with(
            &CopyCompiler { fail: true },
            &config_in(&root),
            Path::new("main.tex"),
            None,
        );

        assert!(result.is_err());
        assert!(!root.join("main.pdf").exists());
    }

    #[test]
    fn test_missing_document() {
        let dir = TempDir::new().unwrap();
        let result = compile_once(
            &config_in(dir.path()),
            Path::new("absent.tex"),
            None,
        );
        assert!(result.unwrap_err().to_string().contains("failed to read"));
    }
}
