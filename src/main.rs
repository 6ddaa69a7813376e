//! texmex - live preview for LaTeX documents.

#![allow(dead_code)]

mod actor;
mod cli;
mod compiler;
mod config;
mod core;
mod embed;
mod logger;
mod surface;
mod transport;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::{TexmexConfig, init_config};

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = init_config(TexmexConfig::load(&cli)?);

    match &cli.command {
        Commands::Preview { files, .. } => cli::serve::serve_preview(files),
        Commands::Compile { file, output, .. } => {
            cli::compile::compile_once(&config, file, output.as_deref()).map(|_| ())
        }
    }
}
