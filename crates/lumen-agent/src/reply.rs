// SPDX-FileCopyrightText: 2026 Lumen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reply templates.

pub const DONT_KNOW: &str = "I don't know yet. I can research that if you want.";
pub const CHAT_ACK: &str = "Got it.";
pub const UNKNOWN_COMMAND: &str = "I don't recognize that command yet.";
pub const CLARIFY_OPEN: &str =
    "What should I open? Give me a URL, a file path or an app name.";
pub const NOTHING_PENDING: &str = "[ok] Nothing is waiting for confirmation.";
pub const CONFIRMED: &str = "[ok]";
pub const CANCELLED: &str = "[cancelled] Okay, I won't do that.";
pub const COMMAND_FAILED: &str = "[error] Something went wrong while running that command.";

/// Ask before running a deferred command.
pub fn confirm_prompt(description: &str) -> String {
    format!("{description}? (yes/no)")
}

/// Append a `Sources:` line when there is anything to cite.
pub fn with_citations(text: &str, urls: &[String]) -> String {
    if urls.is_empty() {
        return text.to_string();
    }
    format!("{text}\nSources: {}", urls.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn citations_are_optional() {
        assert_eq!(with_citations("Paris", &[]), "Paris");
        assert_eq!(
            with_citations("Paris", &["https://a".to_string(), "https://b".to_string()]),
            "Paris\nSources: https://a, https://b"
        );
    }
}
