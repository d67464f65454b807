// SPDX-FileCopyrightText: 2026 Lumen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Batch consolidation: session summary, vector refresh and relation mining.
//!
//! Safe to re-run. Relation inserts are idempotent and vector upserts
//! replace in place. Per-fact failures are logged and skipped.

use lumen_core::{Fact, LumenError};
use tracing::{debug, info, warn};

use crate::encoder;
use crate::store::FactStore;

/// Key prefix recognized by relation mining.
pub const CAPITAL_KEY_PREFIX: &str = "capital:";
pub const CAPITAL_OF: &str = "capital_of";
pub const IS_CAPITAL_OF: &str = "is_capital_of";

/// What a consolidation pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsolidationReport {
    pub summary: String,
    pub vectors_updated: usize,
    pub vectors_failed: usize,
    pub relations_added: usize,
}

/// One-line count summary, each count capped at `max_items`.
pub fn summarize(fact_count: i64, event_count: i64, max_items: usize) -> String {
    let cap = i64::try_from(max_items).unwrap_or(i64::MAX);
    let mut parts = Vec::new();
    if fact_count > 0 {
        parts.push(format!("facts={}", fact_count.min(cap)));
    }
    if event_count > 0 {
        parts.push(format!("events={}", event_count.min(cap)));
    }
    if parts.is_empty() {
        return "idle".to_string();
    }
    parts.join("; ")
}

/// Title-case a name. Runs of whitespace collapse to one space so the same
/// place always maps to the same graph node; letters after `-` and `'` are
/// capitalized too ("guinea-bissau" becomes "Guinea-Bissau").
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut out = String::with_capacity(word.len());
            let mut at_start = true;
            for c in word.chars() {
                if at_start {
                    out.extend(c.to_uppercase());
                } else {
                    out.extend(c.to_lowercase());
                }
                at_start = matches!(c, '-' | '\'');
            }
            out
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// `(Country, City)` for a `capital:<country>` fact, title-cased.
fn capital_pair(fact: &Fact) -> Option<(String, String)> {
    let country = fact.key.strip_prefix(CAPITAL_KEY_PREFIX)?.trim();
    let city = fact.value.trim();
    if country.is_empty() || city.is_empty() {
        return None;
    }
    Some((title_case(country), title_case(city)))
}

/// Run one consolidation pass over `store`.
///
/// Only the summary event write and the initial reads can fail the pass.
pub async fn consolidate(
    store: &FactStore,
    max_items: usize,
) -> Result<ConsolidationReport, LumenError> {
    let stats = store.stats().await?;
    let summary = summarize(stats.facts, stats.events, max_items);
    let stamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S");
    store
        .log_event("consolidation", &format!("{stamp} | {summary}"))
        .await?;

    let mut report = ConsolidationReport {
        summary,
        ..Default::default()
    };

    let facts = store.get_facts(None).await?;
    for fact in &facts {
        let vector = encoder::encode(&fact.value);
        if vector.is_empty() {
            debug!(fact_id = fact.id, "fact has no features; no vector stored");
            continue;
        }
        match store.upsert_fact_vector(fact.id, &vector).await {
            Ok(()) => report.vectors_updated += 1,
            Err(e) => {
                report.vectors_failed += 1;
                warn!(fact_id = fact.id, error = %e, "vector refresh failed; skipping fact");
            }
        }
    }

    let relations_before = store.stats().await?.relations;
    for fact in &facts {
        let Some((country, city)) = capital_pair(fact) else {
            continue;
        };
        let forward = store.add_relation(&country, CAPITAL_OF, &city, None).await;
        let inverse = store.add_relation(&city, IS_CAPITAL_OF, &country, None).await;
        for result in [forward, inverse] {
            if let Err(e) = result {
                debug!(fact_id = fact.id, error = %e, "relation insert skipped");
            }
        }
    }
    // Inserts are idempotent, so only the growth of the table is new.
    let relations_after = store.stats().await?.relations;
    report.relations_added = usize::try_from(relations_after - relations_before).unwrap_or(0);

    info!(
        summary = report.summary.as_str(),
        vectors = report.vectors_updated,
        relations = report.relations_added,
        "consolidation complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_caps_counts_and_defaults_to_idle() {
        assert_eq!(summarize(0, 0, 5), "idle");
        assert_eq!(summarize(12, 3, 5), "facts=5; events=3");
        assert_eq!(summarize(0, 9, 5), "events=5");
        assert_eq!(summarize(2, 0, 5), "facts=2");
    }

    #[test]
    fn title_case_handles_multiword_names() {
        assert_eq!(title_case("new  zealand"), "New Zealand");
        assert_eq!(title_case("pARIS"), "Paris");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn title_case_capitalizes_after_hyphen_and_apostrophe() {
        assert_eq!(title_case("guinea-bissau"), "Guinea-Bissau");
        assert_eq!(title_case("cote d'ivoire"), "Cote D'Ivoire");
        assert_eq!(title_case("port-au-prince"), "Port-Au-Prince");
    }

    #[test]
    fn capital_pair_requires_pattern_and_values() {
        let fact = |key: &str, value: &str| Fact {
            id: 1,
            key: key.to_string(),
            value: value.to_string(),
            source_id: None,
            created_at: String::new(),
        };
        assert_eq!(
            capital_pair(&fact("capital:france", "paris")),
            Some(("France".to_string(), "Paris".to_string()))
        );
        assert_eq!(capital_pair(&fact("capital:", "paris")), None);
        assert_eq!(capital_pair(&fact("learned:x", "y")), None);
        assert_eq!(capital_pair(&fact("capital:peru", "  ")), None);
    }

    #[tokio::test]
    async fn summary_event_is_logged() {
        let store = FactStore::in_memory().await.unwrap();
        let report = consolidate(&store, 5).await.unwrap();
        assert_eq!(report.summary, "idle");
        let events = store.get_events(Some("consolidation")).await.unwrap();
        assert_eq!(events.len(), 1);
        assert!(events[0].content.ends_with(" | idle"));
    }

    #[tokio::test]
    async fn rerun_counts_only_new_relations() {
        let store = FactStore::in_memory().await.unwrap();
        store.add_fact("capital:peru", "lima", None).await.unwrap();
        assert_eq!(consolidate(&store, 5).await.unwrap().relations_added, 2);
        assert_eq!(consolidate(&store, 5).await.unwrap().relations_added, 0);

        store.add_fact("capital:chile", "santiago", None).await.unwrap();
        assert_eq!(consolidate(&store, 5).await.unwrap().relations_added, 2);
        assert_eq!(store.stats().await.unwrap().relations, 4);
    }

    #[tokio::test]
    async fn featureless_facts_get_no_vector() {
        let store = FactStore::in_memory().await.unwrap();
        let blank = store.add_fact("note:dash", "-- !!", None).await.unwrap();
        let word = store.add_fact("note:word", "lighthouse", None).await.unwrap();

        let report = consolidate(&store, 5).await.unwrap();
        assert_eq!(report.vectors_updated, 1);
        assert!(store.get_fact_vector(blank).await.unwrap().is_none());
        assert!(store.get_fact_vector(word).await.unwrap().is_some());
    }
}
