//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// texmex - LaTeX live preview
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (searched upward from the current directory)
    #[arg(short = 'C', long, global = true, default_value = "texmex.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Open a live preview for one or more documents and recompile on change
    #[command(visible_alias = "p")]
    Preview {
        /// Documents to preview
        #[arg(required = true, value_hint = clap::ValueHint::FilePath)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        compiler_args: CompilerArgs,

        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Quiet period in milliseconds before recompiling after a change
        #[arg(short, long, value_name = "MS")]
        delay: Option<u64>,
    },

    /// Compile a document once and write the PDF
    #[command(visible_alias = "c")]
    Compile {
        /// Document to compile
        #[arg(value_hint = clap::ValueHint::FilePath)]
        file: PathBuf,

        #[command(flatten)]
        compiler_args: CompilerArgs,

        /// Output PDF path (default: next to the document)
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        output: Option<PathBuf>,
    },
}

/// Shared compiler arguments for Preview and Compile commands
#[derive(clap::Args, Debug, Clone, Default)]
pub struct CompilerArgs {
    /// Compiler executable (e.g., pdflatex, xelatex, lualatex)
    #[arg(short = 'L', long = "compiler", value_name = "PROGRAM")]
    pub compiler: Option<String>,
}

impl Cli {
    pub const fn is_preview(&self) -> bool {
        matches!(self.command, Commands::Preview { .. })
    }

    pub fn compiler_args(&self) -> &CompilerArgs {
        match &self.command {
            Commands::Preview { compiler_args, .. } | Commands::Compile { compiler_args, .. } => {
                compiler_args
            }
        }
    }
}
