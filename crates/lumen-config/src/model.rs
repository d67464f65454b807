// SPDX-FileCopyrightText: 2026 Lumen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Lumen assistant.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level Lumen configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LumenConfig {
    /// Assistant identity and dialogue behavior.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Where long-term memory lives.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Retrieval and consolidation tuning.
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Permission prompt behavior.
    #[serde(default)]
    pub security: SecurityConfig,

    /// External research settings.
    #[serde(default)]
    pub research: ResearchConfig,
}

/// Assistant identity and dialogue behavior.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the assistant.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Append a `(trace: ...)` line listing the internal steps of each turn.
    #[serde(default = "default_true")]
    pub verbose_trace: bool,

    /// Number of (role, text) pairs kept in the in-memory recency buffer.
    #[serde(default = "default_recency_capacity")]
    pub recency_capacity: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
            verbose_trace: default_true(),
            recency_capacity: default_recency_capacity(),
        }
    }
}

fn default_agent_name() -> String {
    "lumen".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_recency_capacity() -> usize {
    10
}

/// Long-term memory storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory holding the memory database. Must already exist for
    /// persistence to be enabled.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// File name of the SQLite database inside `data_dir`.
    #[serde(default = "default_database_file")]
    pub database_file: String,

    /// Enable WAL (Write-Ahead Logging) mode for file-backed databases.
    #[serde(default = "default_true")]
    pub wal_mode: bool,
}

impl StorageConfig {
    /// Full path of the database file.
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.database_file)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            database_file: default_database_file(),
            wal_mode: default_true(),
        }
    }
}

fn default_data_dir() -> String {
    dirs::data_dir()
        .map(|p| p.join("lumen"))
        .unwrap_or_else(|| PathBuf::from("./lumen-data"))
        .to_string_lossy()
        .to_string()
}

fn default_database_file() -> String {
    "memory.db".to_string()
}

/// Retrieval and consolidation tuning.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryConfig {
    /// Default number of results for semantic queries.
    #[serde(default = "default_semantic_top_k")]
    pub semantic_top_k: usize,

    /// Maximum citation URLs attached to an answer from memory.
    #[serde(default = "default_citation_limit")]
    pub citation_limit: usize,

    /// Display cap for counts in the consolidation summary line.
    #[serde(default = "default_summary_max_items")]
    pub summary_max_items: usize,

    /// Knowledge gaps researched per `learn` run.
    #[serde(default = "default_gap_research_limit")]
    pub gap_research_limit: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            semantic_top_k: default_semantic_top_k(),
            citation_limit: default_citation_limit(),
            summary_max_items: default_summary_max_items(),
            gap_research_limit: default_gap_research_limit(),
        }
    }
}

fn default_semantic_top_k() -> usize {
    5
}

fn default_citation_limit() -> usize {
    5
}

fn default_summary_max_items() -> usize {
    5
}

fn default_gap_research_limit() -> usize {
    3
}

/// Permission prompt behavior.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SecurityConfig {
    /// Never prompt; answer every permission request with `permission_default`.
    #[serde(default)]
    pub noninteractive: bool,

    /// Decision used when running non-interactively: `approve` or `deny`.
    #[serde(default = "default_permission_default")]
    pub permission_default: String,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            noninteractive: false,
            permission_default: default_permission_default(),
        }
    }
}

fn default_permission_default() -> String {
    "deny".to_string()
}

/// External research settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ResearchConfig {
    /// Query the research endpoint for questions memory cannot answer.
    #[serde(default)]
    pub enabled: bool,

    /// MediaWiki API endpoint.
    #[serde(default = "default_research_endpoint")]
    pub endpoint: String,

    /// Maximum search results requested per question.
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// HTTP timeout for one research request.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Host suffixes citations may come from. Empty allows any host.
    #[serde(default = "default_domain_allowlist")]
    pub domain_allowlist: Vec<String>,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_research_endpoint(),
            max_results: default_max_results(),
            timeout_secs: default_timeout_secs(),
            domain_allowlist: default_domain_allowlist(),
        }
    }
}

fn default_research_endpoint() -> String {
    "https://en.wikipedia.org/w/api.php".to_string()
}

fn default_max_results() -> usize {
    3
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_domain_allowlist() -> Vec<String> {
    vec!["wikipedia.org".to_string()]
}
