// SPDX-FileCopyrightText: 2026 Lumen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fact store: the long-term memory facade over the SQLite database.
//!
//! Every operation is a single call on the storage writer thread and
//! completes before the next one is issued. Lookups that find nothing return
//! empty results; unexpected storage faults on writes are propagated.

use lumen_config::model::StorageConfig;
use lumen_core::{Authorizer, Event, Fact, FeatureVector, LumenError, Relation, Source};
use lumen_storage::Database;
use lumen_storage::queries::{events, facts, prefs, relations, sources, vectors};
use tracing::debug;

use crate::encoder;

/// Row counts across the memory tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub facts: i64,
    pub events: i64,
    pub relations: i64,
}

pub struct FactStore {
    db: Database,
}

impl FactStore {
    /// Open the store, letting `authorizer` decide whether it is durable.
    ///
    /// Denial or an unusable location yields a volatile store, not an error.
    pub async fn open(
        config: &StorageConfig,
        authorizer: &dyn Authorizer,
    ) -> Result<Self, LumenError> {
        let db = Database::open_authorized(config, authorizer).await?;
        Ok(Self { db })
    }

    /// A volatile store for tests and one-off sessions.
    pub async fn in_memory() -> Result<Self, LumenError> {
        Ok(Self {
            db: Database::open_in_memory().await?,
        })
    }

    pub fn from_database(db: Database) -> Self {
        Self { db }
    }

    pub fn is_persistent(&self) -> bool {
        self.db.is_persistent()
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    // --- facts and sources ---

    pub async fn add_fact(
        &self,
        key: &str,
        value: &str,
        source_id: Option<i64>,
    ) -> Result<i64, LumenError> {
        facts::insert_fact(&self.db, key, value, source_id).await
    }

    /// Facts under `key` (all facts when `None`), most recent first.
    pub async fn get_facts(&self, key: Option<&str>) -> Result<Vec<Fact>, LumenError> {
        facts::get_facts(&self.db, key).await
    }

    pub async fn add_source(&self, url: &str, title: &str) -> Result<i64, LumenError> {
        sources::insert_source(&self.db, url, title).await
    }

    pub async fn get_source(&self, id: i64) -> Result<Option<Source>, LumenError> {
        sources::get_source(&self.db, id).await
    }

    /// One source row and one fact row per `(url, title)` pair, all sharing
    /// `key`/`value`. Returns the id of the last fact written. An empty
    /// source list writes a single sourceless fact.
    pub async fn add_fact_with_sources(
        &self,
        key: &str,
        value: &str,
        sources: &[(String, String)],
    ) -> Result<i64, LumenError> {
        facts::insert_fact_with_sources(&self.db, key, value, sources).await
    }

    /// Up to `limit` distinct URLs cited under `key`, newest fact first.
    pub async fn get_citation_urls_for_key(
        &self,
        key: &str,
        limit: usize,
    ) -> Result<Vec<String>, LumenError> {
        facts::citation_urls_for_key(&self.db, key, limit).await
    }

    // --- events and preferences ---

    pub async fn log_event(&self, kind: &str, content: &str) -> Result<i64, LumenError> {
        events::insert_event(&self.db, kind, content).await
    }

    pub async fn get_events(&self, kind: Option<&str>) -> Result<Vec<Event>, LumenError> {
        events::get_events(&self.db, kind).await
    }

    pub async fn set_pref(&self, key: &str, value: &str) -> Result<(), LumenError> {
        prefs::set_pref(&self.db, key, value).await
    }

    pub async fn get_pref(&self, key: &str) -> Result<Option<String>, LumenError> {
        prefs::get_pref(&self.db, key).await
    }

    // --- vectors ---

    pub async fn upsert_fact_vector(
        &self,
        fact_id: i64,
        vector: &FeatureVector,
    ) -> Result<(), LumenError> {
        vectors::upsert_vector(&self.db, fact_id, vector).await
    }

    pub async fn get_fact_vector(&self, fact_id: i64) -> Result<Option<FeatureVector>, LumenError> {
        vectors::get_vector(&self.db, fact_id).await
    }

    /// Rank facts by similarity to `text`.
    ///
    /// Facts without a stored vector are encoded on the fly (not persisted).
    /// Non-positive scores are dropped; ties keep most-recent-first order.
    pub async fn query_semantic(
        &self,
        text: &str,
        top_k: usize,
    ) -> Result<Vec<(Fact, f32)>, LumenError> {
        let query = encoder::encode(text);
        if query.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }

        let all_facts = self.get_facts(None).await?;
        let stored = vectors::all_vectors(&self.db).await?;
        let mut computed = 0usize;

        let mut scored: Vec<(Fact, f32)> = all_facts
            .into_iter()
            .filter_map(|fact| {
                let score = match stored.get(&fact.id) {
                    Some(vector) => encoder::similarity(&query, vector),
                    None => {
                        computed += 1;
                        encoder::similarity(&query, &encoder::encode(&fact.value))
                    }
                };
                (score > 0.0).then_some((fact, score))
            })
            .collect();

        // Vec::sort_by is stable, preserving recency among equal scores.
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(top_k);
        debug!(
            hits = scored.len(),
            on_the_fly = computed,
            "semantic query ranked facts"
        );
        Ok(scored)
    }

    // --- relations ---

    /// Idempotent edge insert; returns the new or existing row id.
    ///
    /// Callers that treat relations as best-effort discard the error.
    pub async fn add_relation(
        &self,
        subject: &str,
        predicate: &str,
        object: &str,
        source_id: Option<i64>,
    ) -> Result<i64, LumenError> {
        relations::insert_relation(&self.db, subject, predicate, object, source_id).await
    }

    pub async fn get_relations(
        &self,
        subject: Option<&str>,
        predicate: Option<&str>,
        object: Option<&str>,
    ) -> Result<Vec<Relation>, LumenError> {
        relations::get_relations(&self.db, subject, predicate, object).await
    }

    /// Outgoing one-hop edges as (predicate, object), most recent first.
    pub async fn neighbors(&self, subject: &str) -> Result<Vec<(String, String)>, LumenError> {
        relations::neighbors(&self.db, subject).await
    }

    /// Incoming one-hop edges as (subject, predicate), most recent first.
    pub async fn inverse_neighbors(
        &self,
        object: &str,
    ) -> Result<Vec<(String, String)>, LumenError> {
        relations::inverse_neighbors(&self.db, object).await
    }

    pub async fn stats(&self) -> Result<StoreStats, LumenError> {
        Ok(StoreStats {
            facts: facts::count_facts(&self.db).await?,
            events: events::count_events(&self.db).await?,
            relations: relations::count_relations(&self.db).await?,
        })
    }

    /// Flush the write-ahead log of a durable store.
    pub async fn close(&self) -> Result<(), LumenError> {
        self.db.checkpoint().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn semantic_query_drops_unrelated_and_truncates() {
        let store = FactStore::in_memory().await.unwrap();
        store.add_fact("a", "espresso with sugar", None).await.unwrap();
        store.add_fact("b", "double espresso", None).await.unwrap();
        store.add_fact("c", "zzz", None).await.unwrap();

        let hits = store.query_semantic("espresso", 5).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|(_, s)| *s > 0.0));
        assert!(hits.windows(2).all(|w| w[0].1 >= w[1].1));

        assert_eq!(store.query_semantic("espresso", 1).await.unwrap().len(), 1);
        assert!(store.query_semantic("espresso", 0).await.unwrap().is_empty());
        assert!(store.query_semantic("", 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn equal_scores_prefer_recent_fact() {
        let store = FactStore::in_memory().await.unwrap();
        let older = store.add_fact("x", "green tea", None).await.unwrap();
        let newer = store.add_fact("y", "green tea", None).await.unwrap();
        let hits = store.query_semantic("green tea", 2).await.unwrap();
        assert_eq!(hits[0].0.id, newer);
        assert_eq!(hits[1].0.id, older);
    }

    #[tokio::test]
    async fn on_the_fly_vectors_are_not_persisted() {
        let store = FactStore::in_memory().await.unwrap();
        let id = store.add_fact("k", "paris", None).await.unwrap();
        store.query_semantic("paris", 3).await.unwrap();
        assert!(store.get_fact_vector(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn stored_vector_wins_over_fact_text() {
        let store = FactStore::in_memory().await.unwrap();
        let id = store.add_fact("k", "unrelated words", None).await.unwrap();
        store
            .upsert_fact_vector(id, &encoder::encode("mountain bike"))
            .await
            .unwrap();
        let hits = store.query_semantic("mountain bike", 3).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert!((hits[0].1 - 1.0).abs() < 1e-4);
    }

    #[tokio::test]
    async fn stats_count_every_table() {
        let store = FactStore::in_memory().await.unwrap();
        store.add_fact("k", "v", None).await.unwrap();
        store.log_event("chat", "hi").await.unwrap();
        store.add_relation("A", "p", "B", None).await.unwrap();
        assert_eq!(
            store.stats().await.unwrap(),
            StoreStats {
                facts: 1,
                events: 1,
                relations: 1
            }
        );
        assert!(!store.is_persistent());
    }
}
