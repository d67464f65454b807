// SPDX-FileCopyrightText: 2026 Lumen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dialogue layer for the Lumen assistant.
//!
//! Turns utterances into replies: rule-based intent parsing, a single
//! pending-confirmation slot, pronoun resolution against the last command
//! target, and memory-first question answering with research fallback.

pub mod gaps;
pub mod nlu;
pub mod orchestrator;
pub mod reply;
pub mod session;
pub mod trace;

pub use gaps::{find_gaps, run_daily_summary, run_gap_research, run_nightly};
pub use nlu::RuleInterpreter;
pub use orchestrator::{DialogueOrchestrator, DialogueSettings};
pub use session::{LastObject, PendingAction, SessionState};
pub use trace::Trace;
