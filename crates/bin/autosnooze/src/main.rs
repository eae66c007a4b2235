//! # autosnooze — snooze home automations from the command line
//!
//! Composition root that wires the adapters into the application services.
//!
//! ## Responsibilities
//! - Parse CLI arguments and load configuration (file, env vars)
//! - Initialize logging to stderr
//! - Construct adapters: snapshot loader, JSON-lines command sink on stdout,
//!   file-backed last-duration store
//! - Construct application services, injecting adapters via port traits
//! - Run the requested subcommand
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod cli;
mod config;
mod sink;
mod snapshot;
mod state;

use std::io::IsTerminal;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::config::Config;

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    init_tracing(&config.logging.filter);
    cli.run(&config).await
}
