// SPDX-FileCopyrightText: 2026 Lumen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock research collaborator.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use lumen_core::{Citation, LumenError, ResearchAnswer, Researcher};
use tokio::sync::Mutex;

/// Returns queued answers in FIFO order, then empty answers.
pub struct MockResearcher {
    answers: Arc<Mutex<VecDeque<Result<ResearchAnswer, String>>>>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl MockResearcher {
    pub fn new() -> Self {
        Self {
            answers: Arc::new(Mutex::new(VecDeque::new())),
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_answers(answers: Vec<ResearchAnswer>) -> Self {
        Self {
            answers: Arc::new(Mutex::new(answers.into_iter().map(Ok).collect())),
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Convenience answer with one citation per `(name, url)`.
    pub fn answer(summary: &str, citations: &[(&str, &str)]) -> ResearchAnswer {
        ResearchAnswer {
            summary: summary.to_string(),
            citations: citations
                .iter()
                .map(|(name, url)| Citation {
                    name: name.to_string(),
                    snippet: summary.to_string(),
                    url: url.to_string(),
                })
                .collect(),
        }
    }

    pub async fn push_answer(&self, answer: ResearchAnswer) {
        self.answers.lock().await.push_back(Ok(answer));
    }

    /// Queue a failure for the next call.
    pub async fn push_failure(&self, message: &str) {
        self.answers.lock().await.push_back(Err(message.to_string()));
    }

    /// Every query received, in order.
    pub async fn queries(&self) -> Vec<String> {
        self.queries.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.queries.lock().await.len()
    }
}

impl Default for MockResearcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Researcher for MockResearcher {
    async fn aggregate(&self, text: &str) -> Result<ResearchAnswer, LumenError> {
        self.queries.lock().await.push(text.to_string());
        match self.answers.lock().await.pop_front() {
            Some(Ok(answer)) => Ok(answer),
            Some(Err(message)) => Err(LumenError::collaborator(message)),
            None => Ok(ResearchAnswer::empty()),
        }
    }
}
