// SPDX-FileCopyrightText: 2026 Lumen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Long-term memory engine for the Lumen assistant.
//!
//! - [`encoder`]: deterministic sparse feature vectors and similarity.
//! - [`store::FactStore`]: facts, sources, events, preferences, vectors and
//!   knowledge-graph relations over SQLite.
//! - [`consolidator`]: the batch pass that refreshes vectors and mines
//!   relations.
//! - [`recency::RecencyBuffer`]: the in-process short-term buffer.

pub mod consolidator;
pub mod encoder;
pub mod recency;
pub mod store;

pub use consolidator::{ConsolidationReport, consolidate};
pub use recency::RecencyBuffer;
pub use store::{FactStore, StoreStats};
