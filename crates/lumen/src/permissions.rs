// SPDX-FileCopyrightText: 2026 Lumen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Permission prompts for privileged actions.
//!
//! Every decision is written to the `lumen::audit` log target.

use std::io::{BufRead, IsTerminal, Write};
use std::path::Path;

use async_trait::async_trait;
use lumen_config::model::SecurityConfig;
use lumen_core::{Authorizer, Decision};
use tracing::{info, warn};

/// Asks the operator on the terminal, or answers with the configured default
/// when running non-interactively or without a TTY.
pub struct PromptAuthorizer {
    noninteractive: bool,
    default: Decision,
}

impl PromptAuthorizer {
    pub fn new(config: &SecurityConfig) -> Self {
        Self {
            noninteractive: config.noninteractive,
            default: parse_decision(&config.permission_default),
        }
    }

    /// An authorizer that never prompts.
    #[cfg(test)]
    pub fn fixed(default: Decision) -> Self {
        Self {
            noninteractive: true,
            default,
        }
    }
}

#[async_trait]
impl Authorizer for PromptAuthorizer {
    async fn authorize(&self, action: &str, resource: &str, path: Option<&Path>) -> Decision {
        let interactive = !self.noninteractive && std::io::stdin().is_terminal();
        let decision = if interactive {
            let question = match path {
                Some(p) => format!("Allow {action} on {resource} ({})? [y/N] ", p.display()),
                None => format!("Allow {action} on {resource}? [y/N] "),
            };
            match tokio::task::spawn_blocking(move || ask(&question)).await {
                Ok(decision) => decision,
                Err(e) => {
                    warn!(error = %e, "permission prompt failed");
                    Decision::Denied
                }
            }
        } else {
            self.default
        };

        let path = path.map(|p| p.display().to_string()).unwrap_or_default();
        info!(
            target: "lumen::audit",
            decision = %decision,
            action,
            resource,
            path = path.as_str(),
            interactive,
            "permission decision"
        );
        decision
    }
}

fn ask(question: &str) -> Decision {
    eprint!("{question}");
    let _ = std::io::stderr().flush();
    let mut line = String::new();
    match std::io::stdin().lock().read_line(&mut line) {
        Ok(_) => parse_answer(&line),
        Err(_) => Decision::Denied,
    }
}

/// Only an explicit yes approves.
pub fn parse_answer(line: &str) -> Decision {
    match line.trim().to_lowercase().as_str() {
        "y" | "yes" => Decision::Approved,
        _ => Decision::Denied,
    }
}

fn parse_decision(value: &str) -> Decision {
    if value.trim().eq_ignore_ascii_case("approve") {
        Decision::Approved
    } else {
        Decision::Denied
    }
}
