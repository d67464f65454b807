// SPDX-FileCopyrightText: 2026 Lumen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules, one per table.

pub mod events;
pub mod facts;
pub mod prefs;
pub mod relations;
pub mod sources;
pub mod vectors;
