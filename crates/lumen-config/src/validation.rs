// SPDX-FileCopyrightText: 2026 Lumen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::LumenConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &LumenConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    for (field, value) in [
        ("storage.data_dir", &config.storage.data_dir),
        ("storage.database_file", &config.storage.database_file),
    ] {
        if value.trim().is_empty() {
            errors.push(ConfigError::validation(field, format!("{field} must not be empty")));
        }
    }

    for (field, value) in [
        ("agent.recency_capacity", config.agent.recency_capacity),
        ("memory.semantic_top_k", config.memory.semantic_top_k),
        ("memory.citation_limit", config.memory.citation_limit),
    ] {
        if value == 0 {
            errors.push(ConfigError::validation(field, format!("{field} must be at least 1")));
        }
    }

    let default = config.security.permission_default.trim();
    if !default.eq_ignore_ascii_case("approve") && !default.eq_ignore_ascii_case("deny") {
        errors.push(ConfigError::validation(
            "security.permission_default",
            format!("security.permission_default must be `approve` or `deny`, got `{default}`"),
        ));
    }

    let endpoint = config.research.endpoint.trim();
    if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
        errors.push(ConfigError::validation(
            "research.endpoint",
            format!("research.endpoint `{endpoint}` must be an http(s) URL"),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_message(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { field, .. } if field.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&LumenConfig::default()).is_ok());
    }

    #[test]
    fn empty_data_dir_fails_validation() {
        let mut config = LumenConfig::default();
        config.storage.data_dir = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "data_dir"));
    }

    #[test]
    fn zero_capacity_and_top_k_both_reported() {
        let mut config = LumenConfig::default();
        config.agent.recency_capacity = 0;
        config.memory.semantic_top_k = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(has_message(&errors, "recency_capacity"));
        assert!(has_message(&errors, "semantic_top_k"));
    }

    #[test]
    fn unknown_permission_default_rejected() {
        let mut config = LumenConfig::default();
        config.security.permission_default = "maybe".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "permission_default"));
    }

    #[test]
    fn non_http_endpoint_rejected() {
        let mut config = LumenConfig::default();
        config.research.endpoint = "ftp://example.org".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "research.endpoint"));
    }
}
