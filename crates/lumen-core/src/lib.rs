// SPDX-FileCopyrightText: 2026 Lumen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Lumen assistant.
//!
//! Provides the error type, the domain records shared between the memory
//! engine and the dialogue layer, and the collaborator traits the dialogue
//! core is written against.

pub mod error;
pub mod traits;
pub mod types;

pub use error::LumenError;
pub use traits::{Authorizer, CommandRunner, IntentParser, Researcher};
pub use types::{
    Citation, CommandOutcome, CommandRequest, Decision, Event, Fact, FeatureVector, Intent,
    Interpretation, Relation, ResearchAnswer, Role, Source,
};
