//! `[compiler]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [compiler]
//! path = "pdflatex"          # executable name (resolved via PATH) or path
//! args = ["-shell-escape"]   # extra arguments, placed before the input file
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// External compiler settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Compiler executable.
    pub path: String,

    /// Extra arguments.
    pub args: Vec<String>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            path: "pdflatex".to_string(),
            args: Vec::new(),
        }
    }
}

impl CompilerConfig {
    /// Executable with `~` expanded.
    pub fn program(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.path).into_owned())
    }

    /// Locate the executable on `PATH` (or check an explicit path).
    pub fn locate(&self) -> Option<PathBuf> {
        which::which(self.program()).ok()
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_compiler_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.compiler.path, "pdflatex");
        assert!(config.compiler.args.is_empty());
    }

    #[test]
    fn test_compiler_override() {
        let config =
            test_parse_config("[compiler]\npath = \"lualatex\"\nargs = [\"-shell-escape\"]");
        assert_eq!(config.compiler.path, "lualatex");
        assert_eq!(config.compiler.args, vec!["-shell-escape".to_string()]);
    }

    #[test]
    fn test_program_tilde_expansion() {
        let config = test_parse_config("[compiler]\npath = \"~/texlive/bin/pdflatex\"");
        let program = config.compiler.program();
        assert!(!program.to_string_lossy().starts_with('~') || std::env::var_os("HOME").is_none());
        assert!(program.ends_with("texlive/bin/pdflatex"));
    }

    #[test]
    fn test_locate_missing_compiler() {
        let config = test_parse_config("[compiler]\npath = \"texmex-no-such-compiler\"");
        assert!(config.compiler.locate().is_none());
    }
}
