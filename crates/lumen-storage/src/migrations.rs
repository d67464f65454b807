// SPDX-FileCopyrightText: 2026 Lumen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded schema migrations.
//!
//! SQL files under `migrations/` are compiled in with `embed_migrations!`
//! and applied every time a database is opened.

use lumen_core::LumenError;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Apply pending migrations. Refinery records applied versions in
/// `refinery_schema_history`, so this is safe to call on every open.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), LumenError> {
    let report = embedded::migrations::runner()
        .run(conn)
        .map_err(|e| LumenError::Storage {
            source: Box::new(e),
        })?;
    for migration in report.applied_migrations() {
        tracing::debug!(migration = %migration, "applied migration");
    }
    Ok(())
}
