// SPDX-FileCopyrightText: 2026 Lumen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Background jobs: research unanswered questions, run the nightly
//! consolidation and write the daily digest.
//!
//! Every run, successful or not, leaves a `job` event of the form
//! `name=<job> status=<ok|error> duration_ms=<n> | <detail>`.

use std::time::Instant;

use lumen_core::{LumenError, Researcher};
use lumen_memory::{ConsolidationReport, FactStore, consolidate};
use tracing::{info, warn};

use crate::orchestrator::{CHAT, INBOX, citation_sources, learned_key};

/// Question recorded by an unanswered-question inbox event.
fn question_from_inbox(content: &str) -> Option<&str> {
    content
        .strip_prefix("question:")
        .map(str::trim)
        .filter(|q| !q.is_empty())
}

/// Question of a logged exchange whose answer admitted not knowing.
fn question_from_chat(content: &str) -> Option<&str> {
    let rest = content.strip_prefix("user:")?;
    let (question, answer) = rest.split_once("| agent:")?;
    if !answer.to_lowercase().contains("don't know") {
        return None;
    }
    Some(question.trim()).filter(|q| !q.is_empty())
}

/// Event kind for job status lines.
pub const JOB: &str = "job";
/// Event kind for daily digests.
pub const SUMMARY: &str = "summary";

/// Up to `limit` distinct questions that were never answered nor learned
/// since, most recent first.
pub async fn find_gaps(store: &FactStore, limit: usize) -> Result<Vec<String>, LumenError> {
    let mut gaps: Vec<String> = Vec::new();
    if limit == 0 {
        return Ok(gaps);
    }
    for event in store.get_events(None).await? {
        let question = match event.kind.as_str() {
            INBOX => question_from_inbox(&event.content),
            CHAT => question_from_chat(&event.content),
            _ => None,
        };
        let Some(question) = question else {
            continue;
        };
        if gaps.iter().any(|g| g.eq_ignore_ascii_case(question)) {
            continue;
        }
        if !store.get_facts(Some(&learned_key(question))).await?.is_empty() {
            continue;
        }
        gaps.push(question.to_string());
        if gaps.len() == limit {
            break;
        }
    }
    Ok(gaps)
}

/// Append a job status event.
async fn record_job<T>(
    store: &FactStore,
    name: &str,
    started: Instant,
    result: &Result<T, LumenError>,
    detail: impl FnOnce(&T) -> String,
) -> Result<(), LumenError> {
    let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let (status, detail) = match result {
        Ok(value) => ("ok", detail(value)),
        Err(e) => ("error", e.to_string()),
    };
    info!(job = name, status, duration_ms, "job finished");
    store
        .log_event(
            JOB,
            &format!("name={name} status={status} duration_ms={duration_ms} | {detail}"),
        )
        .await?;
    Ok(())
}

/// Research up to `limit` unlearned gaps. Returns how many were learned.
pub async fn run_gap_research(
    store: &FactStore,
    researcher: &dyn Researcher,
    limit: usize,
) -> Result<usize, LumenError> {
    let started = Instant::now();
    let result = research_gaps(store, researcher, limit).await;
    record_job(store, "research", started, &result, |n| format!("learned={n}")).await?;
    result
}

async fn research_gaps(
    store: &FactStore,
    researcher: &dyn Researcher,
    limit: usize,
) -> Result<usize, LumenError> {
    let mut learned = 0;
    for question in find_gaps(store, limit).await? {
        let answer = match researcher.aggregate(&question).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!(question = question.as_str(), error = %e, "gap research failed");
                continue;
            }
        };
        if answer.is_empty() {
            continue;
        }

        let sources = citation_sources(&answer);
        store
            .add_fact_with_sources(&learned_key(&question), answer.summary.trim(), &sources)
            .await?;
        let url = sources.first().map(|(url, _)| url.as_str()).unwrap_or("");
        store
            .log_event("learning", &format!("query: {question} | source: {url}"))
            .await?;
        learned += 1;
    }
    Ok(learned)
}

/// Consolidate memory and record the run as a `job` event.
pub async fn run_nightly(
    store: &FactStore,
    max_items: usize,
) -> Result<ConsolidationReport, LumenError> {
    let started = Instant::now();
    let result = consolidate(store, max_items).await;
    record_job(store, "nightly", started, &result, |report| {
        format!(
            "{} vectors={} relations={}",
            report.summary, report.vectors_updated, report.relations_added
        )
    })
    .await?;
    result
}

/// Summarize today's activity (UTC) in one line, persist it as the
/// `summary:<YYYY-MM-DD>` fact and log it as a `summary` event.
///
/// At most `max_items` open inbox items are listed.
pub async fn run_daily_summary(store: &FactStore, max_items: usize) -> Result<String, LumenError> {
    let started = Instant::now();
    let result = daily_summary(store, max_items).await;
    record_job(store, "daily-summary", started, &result, |digest| {
        format!("chars={}", digest.len())
    })
    .await?;
    result
}

async fn daily_summary(store: &FactStore, max_items: usize) -> Result<String, LumenError> {
    let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
    let events: Vec<_> = store
        .get_events(None)
        .await?
        .into_iter()
        .filter(|e| e.created_at.starts_with(&today))
        .collect();
    let count = |kind: &str| events.iter().filter(|e| e.kind == kind).count();
    let open: Vec<&str> = events
        .iter()
        .filter(|e| e.kind == INBOX)
        .take(max_items)
        .map(|e| e.content.as_str())
        .collect();

    let digest = format_digest(count(CHAT), count(INBOX), count("learning"), &open);
    store
        .add_fact(&format!("summary:{today}"), &digest, None)
        .await?;
    store.log_event(SUMMARY, &digest).await?;
    Ok(digest)
}

fn format_digest(chats: usize, inbox: usize, learned: usize, open: &[&str]) -> String {
    let mut digest = format!("Daily digest: chats={chats}; inbox={inbox}; learned={learned}");
    if !open.is_empty() {
        digest.push_str(" | open: ");
        digest.push_str(&open.join("; "));
    }
    digest
}
