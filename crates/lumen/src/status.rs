// SPDX-FileCopyrightText: 2026 Lumen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `lumen status` command implementation.
//!
//! Reports whether memory is persistent, how much it holds, and the most
//! recent items waiting in the inbox.

use std::io::IsTerminal;

use lumen_config::model::LumenConfig;
use lumen_core::LumenError;
use lumen_memory::FactStore;
use serde::Serialize;

use crate::permissions::PromptAuthorizer;

/// Inbox items shown by default.
const INBOX_PREVIEW: usize = 5;

/// Structured status output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub persistent: bool,
    pub database: String,
    pub facts: i64,
    pub events: i64,
    pub relations: i64,
    pub inbox: Vec<String>,
}

/// Gather status from an open store.
pub async fn collect_status(
    store: &FactStore,
    database: String,
    inbox_limit: usize,
) -> Result<StatusResponse, LumenError> {
    let stats = store.stats().await?;
    let inbox = store
        .get_events(Some("inbox"))
        .await?
        .into_iter()
        .take(inbox_limit)
        .map(|e| e.content)
        .collect();
    Ok(StatusResponse {
        persistent: store.is_persistent(),
        database,
        facts: stats.facts,
        events: stats.events,
        relations: stats.relations,
        inbox,
    })
}

/// Run the `lumen status` command.
///
/// If `--json` is passed, outputs structured JSON for scripting.
/// If `--plain` is passed or stdout is not a TTY, disables colors.
pub async fn run_status(config: &LumenConfig, json: bool, plain: bool) -> Result<(), LumenError> {
    let authorizer = PromptAuthorizer::new(&config.security);
    let store = FactStore::open(&config.storage, &authorizer).await?;
    let database = config.storage.database_path().display().to_string();
    let status = collect_status(&store, database, INBOX_PREVIEW).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&status).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        let use_color = !plain && std::io::stdout().is_terminal();
        print_status(&config.agent.name, &status, use_color);
    }
    store.close().await
}

fn print_status(name: &str, status: &StatusResponse, use_color: bool) {
    println!();
    println!("  {name} status");
    println!("  {}", "-".repeat(35));

    if use_color {
        use colored::Colorize;
        if status.persistent {
            println!("    Memory:    {} {}", "✓".green(), "persistent".green());
        } else {
            println!("    Memory:    {} {}", "!".yellow(), "volatile".yellow());
        }
    } else if status.persistent {
        println!("    Memory:    [OK] persistent");
    } else {
        println!("    Memory:    [WARN] volatile");
    }
    println!("    Database:  {}", status.database);
    println!("    Facts:     {}", status.facts);
    println!("    Events:    {}", status.events);
    println!("    Relations: {}", status.relations);

    if !status.inbox.is_empty() {
        println!();
        println!("  Inbox (most recent first)");
        for item in &status.inbox {
            println!("    - {item}");
        }
    }
    println!();
}
