// SPDX-FileCopyrightText: 2026 Lumen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-fact sparse feature vectors, stored as JSON objects.

use std::collections::HashMap;

use lumen_core::{FeatureVector, LumenError};
use rusqlite::params;
use tracing::warn;

use crate::database::{Database, map_tr_err};

/// Insert or replace the vector for `fact_id`.
pub async fn upsert_vector(
    db: &Database,
    fact_id: i64,
    vector: &FeatureVector,
) -> Result<(), LumenError> {
    let encoded = serde_json::to_string(vector)?;
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO fact_vectors (fact_id, vector) VALUES (?1, ?2)
                 ON CONFLICT(fact_id) DO UPDATE SET vector = excluded.vector",
                params![fact_id, encoded],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// The stored vector for `fact_id`, if any.
pub async fn get_vector(db: &Database, fact_id: i64) -> Result<Option<FeatureVector>, LumenError> {
    let raw: Option<String> = db
        .connection()
        .call(move |conn| {
            match conn.query_row(
                "SELECT vector FROM fact_vectors WHERE fact_id = ?1",
                params![fact_id],
                |row| row.get(0),
            ) {
                Ok(v) => Ok(Some(v)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)?;
    raw.map(|r| serde_json::from_str(&r).map_err(LumenError::from))
        .transpose()
}

/// Every stored vector keyed by fact id.
///
/// Rows that no longer decode are skipped with a warning so one corrupt
/// vector cannot take down a semantic query.
pub async fn all_vectors(db: &Database) -> Result<HashMap<i64, FeatureVector>, LumenError> {
    let rows: Vec<(i64, String)> = db
        .connection()
        .call(|conn| {
            let mut stmt = conn.prepare("SELECT fact_id, vector FROM fact_vectors")?;
            let rows = stmt
                .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await
        .map_err(map_tr_err)?;

    Ok(rows
        .into_iter()
        .filter_map(|(fact_id, raw)| match serde_json::from_str(&raw) {
            Ok(vector) => Some((fact_id, vector)),
            Err(e) => {
                warn!(fact_id, error = %e, "skipping undecodable fact vector");
                None
            }
        })
        .collect())
}
