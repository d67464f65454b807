// SPDX-FileCopyrightText: 2026 Lumen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authorizer that always gives the same answer.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use lumen_core::{Authorizer, Decision};
use tokio::sync::Mutex;

pub struct StaticAuthorizer {
    decision: Decision,
    requests: Arc<Mutex<Vec<(String, String)>>>,
}

impl StaticAuthorizer {
    pub fn new(decision: Decision) -> Self {
        Self {
            decision,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn approve() -> Self {
        Self::new(Decision::Approved)
    }

    pub fn deny() -> Self {
        Self::new(Decision::Denied)
    }

    /// `(action, resource)` of every request, in order.
    pub async fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl Authorizer for StaticAuthorizer {
    async fn authorize(&self, action: &str, resource: &str, _path: Option<&Path>) -> Decision {
        self.requests
            .lock()
            .await
            .push((action.to_string(), resource.to_string()));
        self.decision
    }
}
