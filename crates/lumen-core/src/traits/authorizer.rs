// SPDX-FileCopyrightText: 2026 Lumen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authorization collaborator for privileged actions.

use std::path::Path;

use async_trait::async_trait;

use crate::types::Decision;

/// Grants or denies privileged actions such as opening persistent memory
/// or creating files.
#[async_trait]
pub trait Authorizer: Send + Sync {
    /// Decide whether `action` may be performed on `resource`.
    async fn authorize(&self, action: &str, resource: &str, path: Option<&Path>) -> Decision;
}
