// SPDX-FileCopyrightText: 2026 Lumen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lumen - a local assistant that remembers what it learns.
//!
//! This is the binary entry point. Each subcommand loads and validates the
//! configuration, then drives the dialogue core or one of the memory jobs.

mod commands;
mod jobs;
mod permissions;
mod research;
mod shell;
mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use lumen_config::model::LumenConfig;
use lumen_core::LumenError;
use tracing_subscriber::EnvFilter;

/// Lumen - a local assistant that remembers what it learns.
#[derive(Parser, Debug)]
#[command(name = "lumen", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch an interactive REPL session.
    Shell,
    /// Answer a single utterance and exit.
    Ask {
        /// The utterance, e.g. "What is the capital of France?".
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Consolidate memory: summary, fact vectors and capital relations.
    Consolidate,
    /// Write today's digest of conversations, inbox items and learning.
    Digest,
    /// Research questions that could not be answered earlier.
    Learn {
        /// Maximum number of gaps to research.
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show memory persistence, counts and the inbox.
    Status {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
        /// Disable colors.
        #[arg(long)]
        plain: bool,
    },
    /// Print the effective configuration as TOML.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup
    let loaded = match &cli.config {
        Some(path) => lumen_config::load_and_validate_path(path),
        None => lumen_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            lumen_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.agent.log_level);

    if let Err(e) = run(cli.command, &config).await {
        eprintln!("{}: {e}", "error".red());
        std::process::exit(1);
    }
}

async fn run(command: Option<Commands>, config: &LumenConfig) -> Result<(), LumenError> {
    match command {
        Some(Commands::Shell) | None => shell::run_shell(config).await,
        Some(Commands::Ask { text }) => shell::run_ask(config, &text.join(" ")).await,
        Some(Commands::Consolidate) => jobs::run_consolidate(config).await,
        Some(Commands::Digest) => jobs::run_digest(config).await,
        Some(Commands::Learn { limit }) => jobs::run_learn(config, limit).await,
        Some(Commands::Status { json, plain }) => status::run_status(config, json, plain).await,
        Some(Commands::Config) => {
            let rendered = toml::to_string_pretty(config)
                .map_err(|e| LumenError::Config(format!("failed to render config: {e}")))?;
            print!("{rendered}");
            Ok(())
        }
    }
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `agent.log_level` applies to Lumen's
/// own targets and everything else logs warnings only.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("lumen={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}
