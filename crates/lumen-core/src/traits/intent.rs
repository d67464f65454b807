// SPDX-FileCopyrightText: 2026 Lumen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intent parser trait.

use crate::types::Interpretation;

/// Turns raw utterances into an intent plus string slots.
pub trait IntentParser: Send + Sync {
    fn interpret(&self, text: &str) -> Interpretation;
}
