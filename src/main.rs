//! Mango - a markdown static site generator with a live-reload dev server.

#![allow(dead_code)]

mod build;
mod cli;
mod config;
mod content;
mod core;
mod embed;
mod logger;
mod theme;
mod utils;
mod view;
mod watch;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::SiteConfig;

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

    let config = SiteConfig::load(&cli)?;
    logger::set_verbose(config.verbose(&cli));

    match cli.command {
        Commands::Build => build::run(&config),
        Commands::Serve { .. } => cli::serve::run(config),
    }
}
