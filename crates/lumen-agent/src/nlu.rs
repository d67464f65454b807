// SPDX-FileCopyrightText: 2026 Lumen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyword and regex intent rules.
//!
//! Rules are tried in order and the first match wins: confirmations,
//! reminders, open commands, file creation, questions, then chat.

use std::sync::LazyLock;

use lumen_core::{Intent, IntentParser, Interpretation};
use regex::Regex;

static YES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(yes|y|sure|ok|okay)\b").unwrap());
static NO_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^(no|n|nah|nope)\b").unwrap());
static REMIND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)remind\s+me\s+in\s+(\d+)\s*(seconds?|minutes?|hours?)(?:\s+to\s+(.+))?")
        .unwrap()
});
static URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)https?://\S+").unwrap());
static OPEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^(open|launch)\b").unwrap());
static APP_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:open|launch)\s+([A-Za-z0-9._-]+)$").unwrap());
static CREATE_FILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bcreate\s+file\b").unwrap());
static QUOTED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]+)"|'([^']+)'"#).unwrap());
static DRIVE_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"([A-Za-z]:\\[^\s'"<>|?*]+)"#).unwrap());
static QUESTION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\?\s*$").unwrap());
static CAPITAL_OF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)capital\s+of\s+([A-Za-z\s]+)").unwrap());

/// Pronouns that never name an app on their own.
const PRONOUNS: &[&str] = &["it", "this", "that", "them"];

/// A quoted string or a drive-letter path.
fn extract_path(text: &str) -> Option<String> {
    if let Some(caps) = QUOTED_RE.captures(text) {
        return caps
            .get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().to_string());
    }
    DRIVE_PATH_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn reminder_seconds(quantity: u64, unit: &str) -> u64 {
    let unit = unit.to_ascii_lowercase();
    let scale = if unit.starts_with("minute") {
        60
    } else if unit.starts_with("hour") {
        3600
    } else {
        1
    };
    quantity.saturating_mul(scale)
}

/// The default rule-based intent parser.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleInterpreter;

impl RuleInterpreter {
    pub fn new() -> Self {
        Self
    }
}

impl IntentParser for RuleInterpreter {
    fn interpret(&self, text: &str) -> Interpretation {
        let t = text.trim();

        if YES_RE.is_match(t) {
            return Interpretation::new(Intent::Confirm, t).with_slot("value", "yes");
        }
        if NO_RE.is_match(t) {
            return Interpretation::new(Intent::Confirm, t).with_slot("value", "no");
        }

        if let Some(caps) = REMIND_RE.captures(t) {
            let quantity = caps[1].parse::<u64>().unwrap_or(0);
            let seconds = reminder_seconds(quantity, &caps[2]);
            let mut result = Interpretation::new(Intent::Command, t)
                .with_slot("action", "set_reminder")
                .with_slot("in_seconds", seconds.to_string());
            if let Some(message) = caps.get(3).map(|m| m.as_str().trim()).filter(|m| !m.is_empty())
            {
                result = result.with_slot("message", message);
            }
            return result;
        }

        if let Some(url) = URL_RE.find(t) {
            return Interpretation::new(Intent::Command, t)
                .with_slot("action", "open_url")
                .with_slot("url", url.as_str());
        }

        if OPEN_RE.is_match(t) {
            let command = Interpretation::new(Intent::Command, t);
            if let Some(path) = extract_path(t) {
                return command.with_slot("action", "open_file").with_slot("path", path);
            }
            let app = APP_NAME_RE
                .captures(t)
                .map(|c| c[1].to_string())
                .filter(|app| {
                    let lower = app.to_ascii_lowercase();
                    !PRONOUNS.contains(&lower.as_str()) && lower != "file"
                });
            if let Some(app) = app {
                return command.with_slot("action", "open_app").with_slot("app", app);
            }
            return command.with_slot("action", "open");
        }

        if CREATE_FILE_RE.is_match(t) {
            let command = Interpretation::new(Intent::Command, t).with_slot("action", "create_file");
            return match extract_path(t) {
                Some(path) => command.with_slot("path", path),
                None => command,
            };
        }

        if QUESTION_RE.is_match(t) {
            let mut question = Interpretation::new(Intent::Question, t);
            if let Some(caps) = CAPITAL_OF_RE.captures(t) {
                let country = caps[1].trim().to_lowercase();
                if !country.is_empty() {
                    question = question
                        .with_slot("qtype", "capital_of")
                        .with_slot("country", country);
                }
            }
            return question;
        }

        Interpretation::new(Intent::Chat, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Interpretation {
        RuleInterpreter::new().interpret(text)
    }

    #[test]
    fn confirmations() {
        assert_eq!(parse("Yes please").slot("value"), Some("yes"));
        assert_eq!(parse("nope").slot("value"), Some("no"));
        assert_eq!(parse("ok").intent, Intent::Confirm);
        // "yesterday" is not a confirmation.
        assert_ne!(parse("yesterday was fun").intent, Intent::Confirm);
    }

    #[test]
    fn reminders_scale_units() {
        let r = parse("remind me in 2 minutes to stretch");
        assert_eq!(r.intent, Intent::Command);
        assert_eq!(r.slot("action"), Some("set_reminder"));
        assert_eq!(r.slot("in_seconds"), Some("120"));
        assert_eq!(r.slot("message"), Some("stretch"));

        let r = parse("remind me in 1 hour");
        assert_eq!(r.slot("in_seconds"), Some("3600"));
        assert_eq!(r.slot("message"), None);
    }

    #[test]
    fn open_variants() {
        let r = parse("open https://example.com/page");
        assert_eq!(r.slot("action"), Some("open_url"));
        assert_eq!(r.slot("url"), Some("https://example.com/page"));

        let r = parse(r#"open the file "notes/todo.txt""#);
        assert_eq!(r.slot("action"), Some("open_file"));
        assert_eq!(r.slot("path"), Some("notes/todo.txt"));

        let r = parse(r"open C:\Users\me\report.docx");
        assert_eq!(r.slot("path"), Some(r"C:\Users\me\report.docx"));

        let r = parse("launch firefox");
        assert_eq!(r.slot("action"), Some("open_app"));
        assert_eq!(r.slot("app"), Some("firefox"));

        assert_eq!(parse("open it").slot("action"), Some("open"));
        assert_eq!(parse("open the thing for me").slot("action"), Some("open"));
    }

    #[test]
    fn create_file_with_and_without_path() {
        let r = parse("create file 'draft.md'");
        assert_eq!(r.slot("action"), Some("create_file"));
        assert_eq!(r.slot("path"), Some("draft.md"));
        assert_eq!(parse("please create file").slot("path"), None);
    }

    #[test]
    fn capital_questions_get_structured_slots() {
        let r = parse("What is the capital of New Zealand?");
        assert_eq!(r.intent, Intent::Question);
        assert_eq!(r.slot("qtype"), Some("capital_of"));
        assert_eq!(r.slot("country"), Some("new zealand"));

        let r = parse("Why is the sky blue?");
        assert_eq!(r.intent, Intent::Question);
        assert!(r.slots.is_empty());
    }

    #[test]
    fn everything_else_is_chat() {
        let r = parse("  thanks, that was helpful ");
        assert_eq!(r.intent, Intent::Chat);
        assert_eq!(r.text, "thanks, that was helpful");
    }
}
