// SPDX-FileCopyrightText: 2026 Lumen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Research collaborator trait.

use async_trait::async_trait;

use crate::error::LumenError;
use crate::types::ResearchAnswer;

/// Looks a question up externally and returns a summary with citations.
///
/// Implementations bound their own latency; callers impose no timeout.
#[async_trait]
pub trait Researcher: Send + Sync {
    async fn aggregate(&self, text: &str) -> Result<ResearchAnswer, LumenError>;
}
