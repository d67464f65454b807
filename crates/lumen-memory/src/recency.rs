// SPDX-FileCopyrightText: 2026 Lumen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Short-term memory: a bounded buffer of recent exchanges, never persisted.

use std::collections::VecDeque;

use lumen_core::Role;

#[derive(Debug, Clone)]
pub struct RecencyBuffer {
    capacity: usize,
    entries: VecDeque<(Role, String)>,
}

impl RecencyBuffer {
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Append an entry, evicting the oldest when full.
    pub fn push(&mut self, role: Role, text: impl Into<String>) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back((role, text.into()));
    }

    /// Entries oldest first.
    pub fn recent(&self) -> Vec<(Role, String)> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
