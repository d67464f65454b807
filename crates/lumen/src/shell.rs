// SPDX-FileCopyrightText: 2026 Lumen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `lumen shell` and `lumen ask` command implementations.
//!
//! Both drive the dialogue orchestrator with the local collaborators. The
//! shell keeps one orchestrator for the whole session so pending
//! confirmations and "it" references carry across turns.

use std::sync::Arc;

use colored::Colorize;
use lumen_agent::{DialogueOrchestrator, RuleInterpreter};
use lumen_config::model::LumenConfig;
use lumen_core::{Authorizer, LumenError};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::warn;

use crate::commands::LocalCommands;
use crate::permissions::PromptAuthorizer;
use crate::research::WikipediaResearcher;

/// Wire an orchestrator to the local collaborators.
pub fn build_orchestrator(config: &LumenConfig) -> Result<DialogueOrchestrator, LumenError> {
    let authorizer: Arc<dyn Authorizer> = Arc::new(PromptAuthorizer::new(&config.security));
    let commands = Arc::new(LocalCommands::new(
        authorizer.clone(),
        &config.storage.data_dir,
    ));
    let research = Arc::new(WikipediaResearcher::new(&config.research)?);
    Ok(DialogueOrchestrator::new(
        config,
        Arc::new(RuleInterpreter::new()),
        commands,
        research,
        authorizer,
    ))
}

/// Run one turn and record it as a chat exchange.
pub async fn converse(orchestrator: &mut DialogueOrchestrator, text: &str) -> String {
    let reply = orchestrator.handle(text).await;
    if let Err(e) = orchestrator.record_exchange(text, &reply).await {
        warn!(error = %e, "failed to record chat exchange");
    }
    reply
}

/// Runs `lumen ask <text>`.
pub async fn run_ask(config: &LumenConfig, text: &str) -> Result<(), LumenError> {
    let mut orchestrator = build_orchestrator(config)?;
    println!("{}", converse(&mut orchestrator, text).await);
    orchestrator.store().await?.close().await
}

/// Runs the `lumen shell` interactive REPL.
pub async fn run_shell(config: &LumenConfig) -> Result<(), LumenError> {
    let mut orchestrator = build_orchestrator(config)?;
    // Open memory (and ask about persistence) before the first prompt.
    let store = orchestrator.store().await?;

    let mut rl = DefaultEditor::new()
        .map_err(|e| LumenError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", format!("{} shell", config.agent.name).bold().green());
    if !store.is_persistent() {
        println!("{}", "memory is not persistent for this session".yellow());
    }
    println!("Type {} to exit.\n", "/quit".yellow());

    let prompt = format!("{}> ", config.agent.name.green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed == "/quit" || trimmed == "/exit" {
                    break;
                }
                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(&line);
                let reply = converse(&mut orchestrator, trimmed).await;
                if reply.starts_with("[error]") {
                    eprintln!("{}", reply.red());
                } else {
                    println!("{reply}");
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C
                break;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D
                break;
            }
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    store.close().await?;
    println!("{}", "goodbye".dimmed());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn volatile_config(dir: &std::path::Path) -> LumenConfig {
        let mut config = LumenConfig::default();
        config.agent.verbose_trace = false;
        config.storage.data_dir = dir.join("missing").to_string_lossy().to_string();
        config.security.noninteractive = true;
        config
    }

    #[tokio::test]
    async fn conversations_are_logged_as_chat_events() {
        let dir = tempfile::tempdir().unwrap();
        let mut orchestrator = build_orchestrator(&volatile_config(dir.path())).unwrap();

        let reply = converse(&mut orchestrator, "open https://example.com").await;
        assert_eq!(reply, "[dry-run] Would open URL: https://example.com");

        let store = orchestrator.store().await.unwrap();
        assert!(!store.is_persistent());
        let chat = store.get_events(Some("chat")).await.unwrap();
        assert_eq!(chat.len(), 1);
        assert_eq!(
            chat[0].content,
            "user: open https://example.com | agent: [dry-run] Would open URL: https://example.com"
        );
    }

    #[tokio::test]
    async fn denied_file_creation_lands_in_inbox() {
        let dir = tempfile::tempdir().unwrap();
        let mut orchestrator = build_orchestrator(&volatile_config(dir.path())).unwrap();

        let reply = converse(&mut orchestrator, "create file 'notes.txt'").await;
        assert_eq!(reply, "[denied] create_file notes.txt");
        let inbox = orchestrator
            .store()
            .await
            .unwrap()
            .get_events(Some("inbox"))
            .await
            .unwrap();
        assert_eq!(inbox.len(), 1);
    }
}
