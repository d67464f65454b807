// SPDX-FileCopyrightText: 2026 Lumen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-turn record of the internal steps taken, shown when verbose.

#[derive(Debug, Default, Clone)]
pub struct Trace {
    steps: Vec<String>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, step: impl Into<String>) {
        self.steps.push(step.into());
    }

    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    pub fn render(&self) -> String {
        self.steps.join(" | ")
    }

    /// `reply` followed by a `(trace: ...)` line.
    pub fn annotate(&self, reply: &str) -> String {
        format!("{reply}\n(trace: {})", self.render())
    }
}
