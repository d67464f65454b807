// SPDX-FileCopyrightText: 2026 Lumen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Lumen memory engine.
//!
//! Provides a single-writer connection via `tokio-rusqlite`, embedded
//! migrations, and typed query functions for facts, sources, events,
//! preferences, feature vectors and knowledge-graph relations.

pub mod database;
pub mod migrations;
pub mod queries;

pub use database::Database;
