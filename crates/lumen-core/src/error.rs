// SPDX-FileCopyrightText: 2026 Lumen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Lumen assistant.

use thiserror::Error;

/// The primary error type used across Lumen crates and collaborator traits.
#[derive(Debug, Error)]
pub enum LumenError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An external collaborator (command runner, researcher, authorizer) failed.
    #[error("collaborator error: {message}")]
    Collaborator {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Caller supplied input the operation cannot accept.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl LumenError {
    /// Shorthand for a collaborator failure without an underlying cause.
    pub fn collaborator(message: impl Into<String>) -> Self {
        LumenError::Collaborator {
            message: message.into(),
            source: None,
        }
    }

    /// Returns true for storage-layer faults.
    pub fn is_storage(&self) -> bool {
        matches!(self, LumenError::Storage { .. })
    }
}

impl From<serde_json::Error> for LumenError {
    fn from(e: serde_json::Error) -> Self {
        LumenError::Storage {
            source: Box::new(e),
        }
    }
}
