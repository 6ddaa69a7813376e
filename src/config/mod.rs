//! Project configuration management for `texmex.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── compiler   # [compiler]
//! │   ├── export     # [export]
//! │   ├── preview    # [preview]
//! │   └── serve      # [serve]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError
//! │   └── handle     # Global config handle
//! └── mod.rs         # TexmexConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section       | Purpose                                         |
//! |---------------|-------------------------------------------------|
//! | `[compiler]`  | External LaTeX compiler executable and args     |
//! | `[preview]`   | Debounce delay, per-session work directories    |
//! | `[serve]`     | Preview server (interface, port, ws_port)       |
//! | `[export]`    | Where "Download PDF" writes                     |
//!
//! The file is optional. Without one, every section takes its defaults and
//! the project root is the current directory.

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{CompilerConfig, ExportConfig, PreviewConfig, ServeConfig};
pub use types::{ConfigError, cfg, init_config};

use crate::{
    cli::{Cli, Commands},
    log,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing texmex.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TexmexConfig {
    /// Absolute path to the config file, if one was found (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Project root directory (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub compiler: CompilerConfig,

    #[serde(default)]
    pub preview: PreviewConfig,

    #[serde(default)]
    pub serve: ServeConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

impl TexmexConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd for the config file. The project root is the
    /// config file's parent directory, or cwd when there is none.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        Self::load_from(cli, &cwd)
    }

    fn load_from(cli: &Cli, cwd: &Path) -> Result<Self> {
        let config_path = find_config_file(&cli.config, cwd);

        let mut config = match &config_path {
            Some(path) => Self::from_path(path)?,
            None => {
                crate::debug!("config"; "no {} found, using defaults", cli.config.display());
                Self::default()
            }
        };

        let root = config_path
            .as_deref()
            .and_then(Path::parent)
            .map_or_else(|| cwd.to_path_buf(), Path::to_path_buf);

        config.config_path = config_path;
        config.finalize(cli, &root);
        config.validate()?;
        config.check_compiler();

        Ok(config)
    }

    /// Finalize configuration after loading.
    fn finalize(&mut self, cli: &Cli, root: &Path) {
        self.apply_command_options(cli);
        self.normalize_paths(root);
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {field}");
        }
    }

    /// Directory holding every session's work directory.
    pub fn temp_root(&self) -> &Path {
        &self.preview.temp_dir
    }

    /// Resolve a user-supplied document path against the project root.
    pub fn resolve_document(&self, path: &Path) -> PathBuf {
        crate::utils::path::resolve_path(path, &self.root)
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        Self::update_option(
            &mut self.compiler.path,
            cli.compiler_args().compiler.as_ref(),
        );

        match &cli.command {
            Commands::Preview {
                interface,
                port,
                delay,
                ..
            } => {
                Self::update_option(&mut self.serve.interface, interface.as_ref());
                Self::update_option(&mut self.serve.port, port.as_ref());
                Self::update_option(&mut self.preview.update_delay, delay.as_ref());
            }
            Commands::Compile { .. } => {}
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // path normalization
    // ========================================================================

    /// Normalize all paths relative to root directory.
    fn normalize_paths(&mut self, root: &Path) {
        use crate::utils::path::normalize_path;

        let root = normalize_path(root);
        self.config_path = self.config_path.as_deref().map(normalize_path);

        self.preview.temp_dir = Self::expand_path(&self.preview.temp_dir, &root);
        self.export.dir = Self::expand_path(&self.export.dir, &root);
        self.root = root;
    }

    /// Expand `~` and join relative paths onto the root.
    fn expand_path(path: &Path, root: &Path) -> PathBuf {
        let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
        let path = PathBuf::from(expanded);
        let full_path = if path.is_relative() {
            root.join(&path)
        } else {
            path
        };
        crate::utils::path::normalize_path(&full_path)
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.preview.update_delay == 0 {
            return Err(ConfigError::Validation(
                "[preview] update_delay must be greater than 0".into(),
            ));
        }
        if self.compiler.path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "[compiler] path must not be empty".into(),
            ));
        }
        if self.export.file_name.as_deref().is_some_and(str::is_empty) {
            return Err(ConfigError::Validation(
                "[export] file_name must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Warn when the compiler cannot be found; compiles will then report it.
    fn check_compiler(&self) {
        match self.compiler.locate() {
            Some(path) => crate::debug!("config"; "compiler: {}", path.display()),
            None => log!(
                "warning";
                "compiler `{}` not found in PATH, compiles will fail",
                self.compiler.path
            ),
        }
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse a config snippet.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> TexmexConfig {
    let (parsed, ignored) = TexmexConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_from_str_invalid_toml() {
        let result = TexmexConfig::parse_with_ignored("[serve\nport = 1");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[preview]\nupdate_delay = 300\n[unknown_section]\nfield = \"value\"";
        let (config, ignored) = TexmexConfig::parse_with_ignored(content).unwrap();

        assert_eq!(config.preview.update_delay, 300);
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_no_unknown_fields() {
        let content = "[compiler]\npath = \"xelatex\"\n[serve]\nport = 9000";
        let (_, ignored) = TexmexConfig::parse_with_ignored(content).unwrap();
        assert!(ignored.is_empty());
    }

    #[test]
    fn test_validate_zero_delay() {
        let config = test_parse_config("[preview]\nupdate_delay = 0");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(msg)) if msg.contains("update_delay")
        ));
    }

    #[test]
    fn test_load_without_config_file() {
        let dir = TempDir::new().unwrap();
        let cli = Cli::parse_from(["texmex", "preview", "main.tex", "-d", "250", "-p", "6000"]);

        let config = TexmexConfig::load_from(&cli, dir.path()).unwrap();

        assert!(config.config_path.is_none());
        assert_eq!(config.root, crate::utils::path::normalize_path(dir.path()));
        assert_eq!(config.preview.update_delay, 250);
        assert_eq!(config.serve.port, 6000);
        assert_eq!(config.temp_root(), config.root.join(".texmex-temp"));
        assert_eq!(config.export.dir, config.root);
    }

    #[test]
    fn test_load_from_parent_config() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("chapters");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            dir.path().join("texmex.toml"),
            "[compiler]\npath = \"lualatex\"\n[export]\ndir = \"build\"\n",
        )
        .unwrap();
        let cli = Cli::parse_from(["texmex", "compile", "main.tex"]);

        let config = TexmexConfig::load_from(&cli, &nested).unwrap();

        let root = crate::utils::path::normalize_path(dir.path());
        assert_eq!(config.root, root);
        assert_eq!(config.compiler.path, "lualatex");
        assert_eq!(config.export.dir, root.join("build"));
    }

    #[test]
    fn test_cli_compiler_overrides_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("texmex.toml"), "[compiler]\npath = \"lualatex\"\n").unwrap();
        let cli = Cli::parse_from(["texmex", "compile", "main.tex", "--compiler", "xelatex"]);

        let config = TexmexConfig::load_from(&cli, dir.path()).unwrap();
        assert_eq!(config.compiler.path, "xelatex");
    }

    #[test]
    fn test_load_rejects_zero_delay_from_cli() {
        let dir = TempDir::new().unwrap();
        let cli = Cli::parse_from(["texmex", "preview", "main.tex", "-d", "0"]);
        assert!(TexmexConfig::load_from(&cli, dir.path()).is_err());
    }

    #[test]
    fn test_resolve_document() {
        let config = TexmexConfig {
            root: PathBuf::from("/project"),
            ..Default::default()
        };
        assert_eq!(
            config.resolve_document(Path::new("main.tex")),
            PathBuf::from("/project/main.tex")
        );
        assert_eq!(
            config.resolve_document(Path::new("/abs/doc.tex")),
            PathBuf::from("/abs/doc.tex")
        );
    }
}
