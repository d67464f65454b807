// SPDX-FileCopyrightText: 2026 Lumen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Lumen integration tests.
//!
//! Deterministic stand-ins for every collaborator plus a harness that wires
//! them to an orchestrator over an in-memory store.
//!
//! # Components
//!
//! - [`MockResearcher`] - queued research answers, records every query
//! - [`MockCommands`] - scripted command replies, records every request
//! - [`StaticAuthorizer`] - fixed decision, records every request
//! - [`TestHarness`] - orchestrator + store + mocks

pub mod harness;
pub mod mock_authorizer;
pub mod mock_commands;
pub mod mock_research;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_authorizer::StaticAuthorizer;
pub use mock_commands::MockCommands;
pub use mock_research::MockResearcher;
