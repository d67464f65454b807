// SPDX-FileCopyrightText: 2026 Lumen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end dialogue tests.
//!
//! `TestHarness` wires a [`DialogueOrchestrator`] to the rule-based intent
//! parser, mock collaborators and an in-memory fact store, and keeps handles
//! to all of them for assertions.

use std::sync::Arc;

use lumen_agent::{DialogueOrchestrator, RuleInterpreter};
use lumen_config::model::LumenConfig;
use lumen_core::{LumenError, ResearchAnswer};
use lumen_memory::FactStore;

use crate::mock_authorizer::StaticAuthorizer;
use crate::mock_commands::MockCommands;
use crate::mock_research::MockResearcher;

/// Builder for test environments.
pub struct TestHarnessBuilder {
    answers: Vec<ResearchAnswer>,
    command_replies: Vec<String>,
    verbose_trace: bool,
    config: LumenConfig,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            answers: Vec::new(),
            command_replies: Vec::new(),
            verbose_trace: false,
            config: LumenConfig::default(),
        }
    }

    /// Queue research answers, returned in order.
    pub fn with_research_answers(mut self, answers: Vec<ResearchAnswer>) -> Self {
        self.answers = answers;
        self
    }

    /// Queue command replies, returned in order.
    pub fn with_command_replies(mut self, replies: Vec<&str>) -> Self {
        self.command_replies = replies.into_iter().map(str::to_string).collect();
        self
    }

    /// Append `(trace: ...)` to replies.
    pub fn with_trace(mut self, verbose: bool) -> Self {
        self.verbose_trace = verbose;
        self
    }

    pub fn with_config(mut self, config: LumenConfig) -> Self {
        self.config = config;
        self
    }

    pub async fn build(mut self) -> Result<TestHarness, LumenError> {
        self.config.agent.verbose_trace = self.verbose_trace;
        let store = Arc::new(FactStore::in_memory().await?);
        let research = Arc::new(MockResearcher::with_answers(self.answers));
        let commands = Arc::new(MockCommands::with_replies(self.command_replies));
        let authorizer = Arc::new(StaticAuthorizer::deny());

        let orchestrator = DialogueOrchestrator::new(
            &self.config,
            Arc::new(RuleInterpreter::new()),
            commands.clone(),
            research.clone(),
            authorizer.clone(),
        )
        .with_store(store.clone());

        Ok(TestHarness {
            orchestrator,
            store,
            research,
            commands,
            authorizer,
            config: self.config,
        })
    }
}

/// A complete dialogue stack over mocks and a volatile store.
pub struct TestHarness {
    pub orchestrator: DialogueOrchestrator,
    /// Same store the orchestrator writes to.
    pub store: Arc<FactStore>,
    pub research: Arc<MockResearcher>,
    pub commands: Arc<MockCommands>,
    pub authorizer: Arc<StaticAuthorizer>,
    pub config: LumenConfig,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Harness with default settings and no queued answers.
    pub async fn new() -> Result<Self, LumenError> {
        Self::builder().build().await
    }

    /// Run one turn through the orchestrator.
    pub async fn send(&mut self, text: &str) -> String {
        self.orchestrator.handle(text).await
    }
}
