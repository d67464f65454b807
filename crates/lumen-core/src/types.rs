// SPDX-FileCopyrightText: 2026 Lumen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across Lumen crates and collaborator boundaries.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

// --- Memory records ---

/// A stored (key, value) assertion with optional provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    pub id: i64,
    /// Caller-defined namespace, e.g. `capital:france` or `learned:<question>`.
    pub key: String,
    pub value: String,
    pub source_id: Option<i64>,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
}

/// A provenance record a fact can cite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub id: i64,
    pub url: String,
    pub title: String,
}

/// An append-only log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    /// Free-form category: `chat`, `inbox`, `learning`, `job`, `consolidation`, ...
    pub kind: String,
    pub content: String,
    pub created_at: String,
}

/// A directed (subject, predicate, object) knowledge-graph edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub id: i64,
    pub subject: String,
    pub predicate: String,
    pub object: String,
    pub source_id: Option<i64>,
    pub created_at: String,
}

/// Sparse feature vector: feature name -> non-negative weight.
///
/// Vectors produced by the encoder are L2-normalized. Serialized as a plain
/// JSON object so the stored form stays readable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector(BTreeMap<String, f32>);

impl FeatureVector {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn from_map(map: BTreeMap<String, f32>) -> Self {
        Self(map)
    }

    pub fn get(&self, feature: &str) -> Option<f32> {
        self.0.get(feature).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &f32)> {
        self.0.iter()
    }

    /// Euclidean norm of the weights.
    pub fn norm(&self) -> f32 {
        self.0.values().map(|w| w * w).sum::<f32>().sqrt()
    }

    /// Dot product, iterating the smaller map and probing the larger one.
    pub fn dot(&self, other: &FeatureVector) -> f32 {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small
            .0
            .iter()
            .filter_map(|(feature, w)| large.0.get(feature).map(|v| w * v))
            .sum()
    }

    pub fn into_inner(self) -> BTreeMap<String, f32> {
        self.0
    }
}

// --- Intent records (NLU collaborator contract) ---

/// Coarse intent class assigned to an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    Command,
    Question,
    Confirm,
    Chat,
}

/// Output of the intent parser: intent plus string-valued slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interpretation {
    pub intent: Intent,
    pub text: String,
    #[serde(default)]
    pub slots: BTreeMap<String, String>,
}

impl Interpretation {
    pub fn new(intent: Intent, text: impl Into<String>) -> Self {
        Self {
            intent,
            text: text.into(),
            slots: BTreeMap::new(),
        }
    }

    /// Builder-style slot insertion.
    pub fn with_slot(mut self, name: &str, value: impl Into<String>) -> Self {
        self.slots.insert(name.to_string(), value.into());
        self
    }

    pub fn slot(&self, name: &str) -> Option<&str> {
        self.slots.get(name).map(String::as_str)
    }
}

// --- Command collaborator contract ---

/// A typed command the assistant can execute or defer for confirmation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CommandRequest {
    OpenUrl { url: String },
    OpenFile { path: String },
    OpenApp { name: String },
    CreateFile { path: String },
    SetReminder { seconds: u64, message: String },
}

impl CommandRequest {
    /// Stable action name, matching the `action` slot vocabulary.
    pub fn action(&self) -> &'static str {
        match self {
            CommandRequest::OpenUrl { .. } => "open_url",
            CommandRequest::OpenFile { .. } => "open_file",
            CommandRequest::OpenApp { .. } => "open_app",
            CommandRequest::CreateFile { .. } => "create_file",
            CommandRequest::SetReminder { .. } => "set_reminder",
        }
    }

    /// Object slots (path/url/app) this command targets, for later "it" references.
    pub fn object_slots(&self) -> Vec<(&'static str, String)> {
        match self {
            CommandRequest::OpenUrl { url } => vec![("url", url.clone())],
            CommandRequest::OpenFile { path } | CommandRequest::CreateFile { path } => {
                vec![("path", path.clone())]
            }
            CommandRequest::OpenApp { name } => vec![("app", name.clone())],
            CommandRequest::SetReminder { .. } => Vec::new(),
        }
    }
}

/// Leading marker of a command collaborator reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    DryRun,
    Approved,
    Denied,
    Error,
    Cancelled,
    Scheduled,
    Ok,
    /// Reply carried no recognized marker.
    Unmarked,
}

impl CommandOutcome {
    const MARKERS: [(&'static str, CommandOutcome); 7] = [
        ("[dry-run]", CommandOutcome::DryRun),
        ("[approved]", CommandOutcome::Approved),
        ("[denied]", CommandOutcome::Denied),
        ("[error]", CommandOutcome::Error),
        ("[cancelled]", CommandOutcome::Cancelled),
        ("[scheduled]", CommandOutcome::Scheduled),
        ("[ok]", CommandOutcome::Ok),
    ];

    /// Classify a reply by its prefix only.
    pub fn from_reply(reply: &str) -> Self {
        let reply = reply.trim_start();
        Self::MARKERS
            .iter()
            .find(|(marker, _)| reply.starts_with(marker))
            .map(|(_, outcome)| *outcome)
            .unwrap_or(CommandOutcome::Unmarked)
    }

    /// Denials and errors are recorded for later triage.
    pub fn needs_triage(&self) -> bool {
        matches!(self, CommandOutcome::Denied | CommandOutcome::Error)
    }
}

// --- Research collaborator contract ---

/// One cited search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub name: String,
    pub snippet: String,
    pub url: String,
}

/// Summary plus citations returned by the research collaborator.
///
/// An empty summary means nothing was found.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResearchAnswer {
    pub summary: String,
    pub citations: Vec<Citation>,
}

impl ResearchAnswer {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.summary.trim().is_empty()
    }
}

// --- Authorization collaborator contract ---

/// Outcome of an authorization request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
pub enum Decision {
    Approved,
    Denied,
}

impl Decision {
    pub fn is_approved(&self) -> bool {
        matches!(self, Decision::Approved)
    }
}

/// Speaker of a recency-buffer entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    User,
    Agent,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Agent => write!(f, "agent"),
        }
    }
}
