// SPDX-FileCopyrightText: 2026 Lumen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `lumen consolidate`, `lumen digest` and `lumen learn` command implementations.

use colored::Colorize;
use lumen_agent::{run_daily_summary, run_gap_research, run_nightly};
use lumen_config::model::LumenConfig;
use lumen_core::LumenError;
use lumen_memory::FactStore;
use tracing::info;

use crate::permissions::PromptAuthorizer;
use crate::research::WikipediaResearcher;

async fn open_store(config: &LumenConfig) -> Result<FactStore, LumenError> {
    let authorizer = PromptAuthorizer::new(&config.security);
    FactStore::open(&config.storage, &authorizer).await
}

/// Run the nightly consolidation job once.
pub async fn run_consolidate(config: &LumenConfig) -> Result<(), LumenError> {
    let store = open_store(config).await?;
    let report = run_nightly(&store, config.memory.summary_max_items).await?;
    info!(
        summary = report.summary.as_str(),
        vectors = report.vectors_updated,
        relations = report.relations_added,
        "consolidation finished"
    );
    println!(
        "{} {} (vectors={}, relations={})",
        "consolidated:".green(),
        report.summary,
        report.vectors_updated,
        report.relations_added
    );
    if report.vectors_failed > 0 {
        eprintln!(
            "{}",
            format!("{} fact vectors could not be stored", report.vectors_failed).yellow()
        );
    }
    store.close().await
}

/// Write and print today's digest.
pub async fn run_digest(config: &LumenConfig) -> Result<(), LumenError> {
    let store = open_store(config).await?;
    let digest = run_daily_summary(&store, config.memory.summary_max_items).await?;
    println!("{digest}");
    store.close().await
}

/// Research open knowledge gaps. `limit` overrides `memory.gap_research_limit`.
pub async fn run_learn(config: &LumenConfig, limit: Option<usize>) -> Result<(), LumenError> {
    if !config.research.enabled {
        eprintln!(
            "{}",
            "research is disabled; set research.enabled = true to learn".yellow()
        );
        return Ok(());
    }
    let store = open_store(config).await?;
    let researcher = WikipediaResearcher::new(&config.research)?;
    let limit = limit.unwrap_or(config.memory.gap_research_limit);
    let learned = run_gap_research(&store, &researcher, limit).await?;
    println!("{} {learned} gap(s)", "learned:".green());
    store.close().await
}
