// SPDX-FileCopyrightText: 2026 Lumen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end behavior of the fact store and consolidator.

use std::path::Path;

use async_trait::async_trait;
use lumen_config::model::StorageConfig;
use lumen_core::{Authorizer, Decision};
use lumen_memory::consolidator::{CAPITAL_OF, IS_CAPITAL_OF};
use lumen_memory::{FactStore, consolidate};

struct Approve;

#[async_trait]
impl Authorizer for Approve {
    async fn authorize(&self, _action: &str, _resource: &str, _path: Option<&Path>) -> Decision {
        Decision::Approved
    }
}

fn sources(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(u, t)| (u.to_string(), t.to_string()))
        .collect()
}

#[tokio::test]
async fn citation_round_trip_is_most_recent_first() {
    let store = FactStore::in_memory().await.unwrap();
    store
        .add_fact_with_sources(
            "capital:france",
            "Paris",
            &sources(&[("https://u1.example", "t1"), ("https://u2.example", "t2")]),
        )
        .await
        .unwrap();
    assert_eq!(
        store.get_citation_urls_for_key("capital:france", 5).await.unwrap(),
        vec!["https://u2.example".to_string(), "https://u1.example".to_string()]
    );
}

#[tokio::test]
async fn relation_insert_twice_yields_one_row() {
    let store = FactStore::in_memory().await.unwrap();
    let a = store.add_relation("Japan", "capital_of", "Tokyo", None).await.unwrap();
    let b = store.add_relation("Japan", "capital_of", "Tokyo", None).await.unwrap();
    assert_eq!(a, b);
    let rows = store
        .get_relations(Some("Japan"), Some("capital_of"), Some("Tokyo"))
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn semantic_ranking_after_consolidation() {
    let store = FactStore::in_memory().await.unwrap();
    let espresso = store
        .add_fact("pref:coffee", "User likes double espresso with one sugar", None)
        .await
        .unwrap();
    let tea = store
        .add_fact("pref:tea", "Tea with lemon is preferred", None)
        .await
        .unwrap();
    let paris = store
        .add_fact("note:paris", "Paris is the capital of France", None)
        .await
        .unwrap();
    consolidate(&store, 5).await.unwrap();

    let hits = store
        .query_semantic("favorite coffee order double espresso", 3)
        .await
        .unwrap();
    assert_eq!(hits[0].0.id, espresso);
    assert!(hits[0].1 > 0.0);

    let score_of = |id: i64| {
        hits.iter()
            .find(|(f, _)| f.id == id)
            .map(|(_, s)| *s)
            .unwrap_or(0.0)
    };
    assert!(score_of(paris) <= score_of(espresso));
    assert!(score_of(paris) <= score_of(tea));
}

#[tokio::test]
async fn consolidation_mines_capital_relations_idempotently() {
    let store = FactStore::in_memory().await.unwrap();
    store.add_fact("capital:france", "paris", None).await.unwrap();
    store.add_fact("learned:why is the sky blue", "scattering", None).await.unwrap();

    consolidate(&store, 5).await.unwrap();
    consolidate(&store, 5).await.unwrap();

    let forward = store
        .get_relations(Some("France"), Some(CAPITAL_OF), Some("Paris"))
        .await
        .unwrap();
    let inverse = store
        .get_relations(Some("Paris"), Some(IS_CAPITAL_OF), Some("France"))
        .await
        .unwrap();
    assert_eq!(forward.len(), 1);
    assert_eq!(inverse.len(), 1);
    assert_eq!(store.get_relations(None, None, None).await.unwrap().len(), 2);

    assert_eq!(
        store.neighbors("France").await.unwrap(),
        vec![(CAPITAL_OF.to_string(), "Paris".to_string())]
    );
    assert_eq!(
        store.inverse_neighbors("France").await.unwrap(),
        vec![("Paris".to_string(), IS_CAPITAL_OF.to_string())]
    );
    assert_eq!(store.get_events(Some("consolidation")).await.unwrap().len(), 2);
}

#[tokio::test]
async fn consolidation_writes_a_vector_per_fact() {
    let store = FactStore::in_memory().await.unwrap();
    let a = store.add_fact("k", "first", None).await.unwrap();
    let b = store.add_fact("k", "second", None).await.unwrap();
    let report = consolidate(&store, 5).await.unwrap();
    assert_eq!(report.vectors_updated, 2);
    assert_eq!(report.summary, "facts=2");
    assert!(store.get_fact_vector(a).await.unwrap().is_some());
    assert!(store.get_fact_vector(b).await.unwrap().is_some());
}

#[tokio::test]
async fn durable_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = StorageConfig {
        data_dir: dir.path().to_string_lossy().to_string(),
        database_file: "memory.db".to_string(),
        wal_mode: true,
    };

    {
        let store = FactStore::open(&config, &Approve).await.unwrap();
        assert!(store.is_persistent());
        store.add_fact("capital:peru", "Lima", None).await.unwrap();
        store.set_pref("units", "metric").await.unwrap();
        store.close().await.unwrap();
    }

    let store = FactStore::open(&config, &Approve).await.unwrap();
    let facts = store.get_facts(Some("capital:peru")).await.unwrap();
    assert_eq!(facts[0].value, "Lima");
    assert_eq!(store.get_pref("units").await.unwrap().as_deref(), Some("metric"));
}

#[tokio::test]
async fn reads_of_missing_things_are_empty() {
    let store = FactStore::in_memory().await.unwrap();
    assert!(store.get_facts(Some("nope")).await.unwrap().is_empty());
    assert!(store.get_events(Some("nope")).await.unwrap().is_empty());
    assert!(store.get_source(1).await.unwrap().is_none());
    assert!(store.get_pref("nope").await.unwrap().is_none());
    assert!(store.get_fact_vector(1).await.unwrap().is_none());
    assert!(store.neighbors("Nowhere").await.unwrap().is_empty());
}
