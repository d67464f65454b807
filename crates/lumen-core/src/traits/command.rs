// SPDX-FileCopyrightText: 2026 Lumen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command collaborator trait.

use async_trait::async_trait;

use crate::error::LumenError;
use crate::types::CommandRequest;

/// Executes user-requested actions.
///
/// Replies begin with one of the markers `[dry-run]`, `[approved]`,
/// `[denied]`, `[error]`, `[cancelled]`, `[scheduled]` or `[ok]`. Callers
/// inspect only that prefix. An `Err` is an execution fault, distinct from
/// an `[error]` reply.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, request: &CommandRequest) -> Result<String, LumenError>;
}
