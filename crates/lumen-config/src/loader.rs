// SPDX-FileCopyrightText: 2026 Lumen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Compiled defaults are overlaid by every `lumen.toml` found on the search
//! path, then by `LUMEN_<SECTION>_<KEY>` environment variables.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;

use crate::model::LumenConfig;

/// File name looked up in every search directory.
pub const CONFIG_FILE: &str = "lumen.toml";

/// Top-level tables of [`LumenConfig`], used to route environment variables.
const SECTIONS: &[&str] = &["agent", "storage", "memory", "security", "research"];

/// Config files in merge order: system, user (XDG), then working directory.
/// Later files override earlier ones. Missing files are skipped.
pub fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![Path::new("/etc/lumen").join(CONFIG_FILE)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("lumen").join(CONFIG_FILE));
    }
    paths.push(PathBuf::from(CONFIG_FILE));
    paths
}

fn defaults() -> Figment {
    Figment::from(Serialized::defaults(LumenConfig::default()))
}

/// Load from the search path with environment overrides.
pub fn load_config() -> Result<LumenConfig, figment::Error> {
    build_figment().extract()
}

/// Load from a TOML string alone. No files, no environment.
pub fn load_config_from_str(toml_content: &str) -> Result<LumenConfig, figment::Error> {
    defaults().merge(Toml::string(toml_content)).extract()
}

/// Load from one explicit file with environment overrides.
pub fn load_config_from_path(path: &Path) -> Result<LumenConfig, figment::Error> {
    defaults()
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The Figment behind [`load_config`], before extraction.
pub fn build_figment() -> Figment {
    search_paths()
        .into_iter()
        .fold(defaults(), |figment, path| figment.merge(Toml::file(path)))
        .merge(env_provider())
}

/// `LUMEN_STORAGE_DATA_DIR` becomes `storage.data_dir`: only the first
/// underscore after a known section name is a separator. Figment hands the
/// mapper the upper-case variable name, so match case-insensitively.
fn env_provider() -> Env {
    Env::prefixed("LUMEN_").map(|key| {
        let key = key.as_str().to_ascii_lowercase();
        SECTIONS
            .iter()
            .find_map(|section| {
                key.strip_prefix(section)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|field| format!("{section}.{field}"))
            })
            .unwrap_or(key)
            .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_override_maps_underscored_keys() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("LUMEN_STORAGE_DATA_DIR", "/tmp/lumen-env");
            jail.set_env("LUMEN_AGENT_VERBOSE_TRACE", "false");
            let config: LumenConfig = Figment::new()
                .merge(Serialized::defaults(LumenConfig::default()))
                .merge(env_provider())
                .extract()?;
            assert_eq!(config.storage.data_dir, "/tmp/lumen-env");
            assert!(!config.agent.verbose_trace);
            Ok(())
        });
    }

    #[test]
    fn env_override_survives_full_load() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("lumen.toml", "[memory]\nsemantic_top_k = 4\n")?;
            jail.set_env("LUMEN_STORAGE_DATA_DIR", "/tmp/lumen-jail");
            jail.set_env("LUMEN_MEMORY_SEMANTIC_TOP_K", "7");
            let config = load_config_from_path(Path::new("lumen.toml"))?;
            assert_eq!(config.storage.data_dir, "/tmp/lumen-jail");
            assert_eq!(config.memory.semantic_top_k, 7);
            Ok(())
        });
    }
}
