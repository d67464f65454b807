// SPDX-FileCopyrightText: 2026 Lumen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions.
//!
//! The dialogue core talks to intent parsing, command execution, research
//! and authorization only through these narrow contracts. Async traits use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod authorizer;
pub mod command;
pub mod intent;
pub mod research;

pub use authorizer::Authorizer;
pub use command::CommandRunner;
pub use intent::IntentParser;
pub use research::Researcher;
