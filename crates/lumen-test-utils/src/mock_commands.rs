// SPDX-FileCopyrightText: 2026 Lumen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock command collaborator.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use lumen_core::{CommandRequest, CommandRunner, LumenError};
use tokio::sync::Mutex;

/// Replies with queued strings, or `[ok] <action>` once the queue is empty.
pub struct MockCommands {
    replies: Arc<Mutex<VecDeque<Result<String, String>>>>,
    requests: Arc<Mutex<Vec<CommandRequest>>>,
}

impl MockCommands {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_replies(replies: Vec<String>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into_iter().map(Ok).collect())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn push_reply(&self, reply: &str) {
        self.replies.lock().await.push_back(Ok(reply.to_string()));
    }

    /// Make the next call fail instead of replying.
    pub async fn push_failure(&self, message: &str) {
        self.replies.lock().await.push_back(Err(message.to_string()));
    }

    /// Every request received, in order.
    pub async fn requests(&self) -> Vec<CommandRequest> {
        self.requests.lock().await.clone()
    }
}

impl Default for MockCommands {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for MockCommands {
    async fn run(&self, request: &CommandRequest) -> Result<String, LumenError> {
        self.requests.lock().await.push(request.clone());
        match self.replies.lock().await.pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(LumenError::collaborator(message)),
            None => Ok(format!("[ok] {}", request.action())),
        }
    }
}
