// SPDX-FileCopyrightText: 2026 Lumen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provenance records. Duplicate URLs are allowed.

use lumen_core::{LumenError, Source};
use rusqlite::params;

use crate::database::{Database, map_tr_err};

/// Insert a source and return its id.
pub async fn insert_source(db: &Database, url: &str, title: &str) -> Result<i64, LumenError> {
    let url = url.to_string();
    let title = title.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO sources (url, title) VALUES (?1, ?2)",
                params![url, title],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

/// Get a source by id.
pub async fn get_source(db: &Database, id: i64) -> Result<Option<Source>, LumenError> {
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                "SELECT id, url, title FROM sources WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Source {
                        id: row.get(0)?,
                        url: row.get(1)?,
                        title: row.get(2)?,
                    })
                },
            );
            match result {
                Ok(source) => Ok(Some(source)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_then_get() {
        let db = Database::open_in_memory().await.unwrap();
        let id = insert_source(&db, "https://en.wikipedia.org/wiki/Paris", "Paris")
            .await
            .unwrap();
        let source = get_source(&db, id).await.unwrap().unwrap();
        assert_eq!(source.url, "https://en.wikipedia.org/wiki/Paris");
        assert_eq!(source.title, "Paris");
    }

    #[tokio::test]
    async fn missing_source_is_none() {
        let db = Database::open_in_memory().await.unwrap();
        assert!(get_source(&db, 42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_urls_get_distinct_ids() {
        let db = Database::open_in_memory().await.unwrap();
        let a = insert_source(&db, "https://x.org", "X").await.unwrap();
        let b = insert_source(&db, "https://x.org", "X").await.unwrap();
        assert_ne!(a, b);
    }
}
