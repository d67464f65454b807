// SPDX-FileCopyrightText: 2026 Lumen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cross-turn dialogue state: the single pending confirmation and the most
//! recent command target.
//!
//! Pending transitions: an ambiguous or underspecified command sets it, a
//! confirmation (yes or no) always clears it. Nothing else touches it.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use lumen_core::CommandRequest;
use regex::Regex;

static IT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bit\b").unwrap());

/// The deferred operation awaiting yes/no.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingAction {
    /// An ambiguous request; confirming it runs nothing.
    Clarify { request: String },
    /// A fully specified command held back for confirmation.
    Run(CommandRequest),
}

impl fmt::Display for PendingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PendingAction::Clarify { .. } => write!(f, "clarify"),
            PendingAction::Run(request) => write!(f, "run:{}", request.action()),
        }
    }
}

/// Object slots (url, path, app) of the last successful command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LastObject(BTreeMap<String, String>);

impl LastObject {
    pub fn from_request(request: &CommandRequest) -> Option<Self> {
        let slots: BTreeMap<String, String> = request
            .object_slots()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        (!slots.is_empty()).then_some(Self(slots))
    }

    pub fn get(&self, slot: &str) -> Option<&str> {
        self.0.get(slot).map(String::as_str)
    }
}

/// Heuristic coreference test: the isolated word "it".
pub fn mentions_it(text: &str) -> bool {
    IT_RE.is_match(text)
}

#[derive(Debug, Default)]
pub struct SessionState {
    pending: Option<PendingAction>,
    last_object: Option<LastObject>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Option<&PendingAction> {
        self.pending.as_ref()
    }

    pub fn set_pending(&mut self, action: PendingAction) {
        self.pending = Some(action);
    }

    pub fn take_pending(&mut self) -> Option<PendingAction> {
        self.pending.take()
    }

    pub fn last_object(&self) -> Option<&LastObject> {
        self.last_object.as_ref()
    }

    pub fn remember(&mut self, request: &CommandRequest) {
        if let Some(object) = LastObject::from_request(request) {
            self.last_object = Some(object);
        }
    }

    /// Copy last-object slots into `slots` where absent. Returns how many
    /// were filled; explicit slots are never overwritten.
    pub fn merge_last_object(&self, slots: &mut BTreeMap<String, String>) -> usize {
        let Some(LastObject(object)) = &self.last_object else {
            return 0;
        };
        let mut filled = 0;
        for (name, value) in object {
            if !slots.contains_key(name) {
                slots.insert(name.clone(), value.clone());
                filled += 1;
            }
        }
        filled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_must_be_a_whole_word() {
        assert!(mentions_it("open it"));
        assert!(mentions_it("It is fine"));
        assert!(!mentions_it("edit the item"));
    }

    #[test]
    fn merge_fills_missing_slots_only() {
        let mut state = SessionState::new();
        state.remember(&CommandRequest::OpenUrl {
            url: "https://example.com".into(),
        });

        let mut slots = BTreeMap::new();
        slots.insert("action".to_string(), "open".to_string());
        assert_eq!(state.merge_last_object(&mut slots), 1);
        assert_eq!(slots.get("url").map(String::as_str), Some("https://example.com"));

        let mut explicit = BTreeMap::new();
        explicit.insert("url".to_string(), "https://other.org".to_string());
        assert_eq!(state.merge_last_object(&mut explicit), 0);
        assert_eq!(explicit["url"], "https://other.org");
    }

    #[test]
    fn reminders_do_not_replace_last_object() {
        let mut state = SessionState::new();
        state.remember(&CommandRequest::OpenApp { name: "gedit".into() });
        state.remember(&CommandRequest::SetReminder {
            seconds: 5,
            message: "tea".into(),
        });
        assert_eq!(state.last_object().and_then(|o| o.get("app")), Some("gedit"));
    }

    #[test]
    fn pending_is_taken_once() {
        let mut state = SessionState::new();
        state.set_pending(PendingAction::Clarify {
            request: "open it".into(),
        });
        assert_eq!(state.pending().map(|p| p.to_string()).as_deref(), Some("clarify"));
        assert!(state.take_pending().is_some());
        assert!(state.take_pending().is_none());
    }
}
