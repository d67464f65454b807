// SPDX-FileCopyrightText: 2026 Lumen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Lumen assistant.
//!
//! TOML configuration with strict key checking (`deny_unknown_fields`),
//! XDG file hierarchy lookup, `LUMEN_*` environment overrides and miette
//! diagnostics with typo suggestions.
//!
//! ```no_run
//! use lumen_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("memory at {}", config.storage.database_path().display());
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::LumenConfig;

use std::path::{Path, PathBuf};

/// Load from the search path (plus environment) and validate.
pub fn load_and_validate() -> Result<LumenConfig, Vec<ConfigError>> {
    checked(loader::load_config(), read_sources(loader::search_paths()))
}

/// Load from one file (plus environment) and validate.
pub fn load_and_validate_path(path: &Path) -> Result<LumenConfig, Vec<ConfigError>> {
    checked(
        loader::load_config_from_path(path),
        read_sources(vec![path.to_path_buf()]),
    )
}

/// Load from a TOML string and validate.
pub fn load_and_validate_str(toml_content: &str) -> Result<LumenConfig, Vec<ConfigError>> {
    let sources = vec![("<inline>".to_string(), toml_content.to_string())];
    checked(loader::load_config_from_str(toml_content), sources)
}

/// Validate an extracted config, or turn the extraction error into
/// diagnostics pointing into `sources`.
fn checked(
    loaded: Result<LumenConfig, figment::Error>,
    sources: Vec<(String, String)>,
) -> Result<LumenConfig, Vec<ConfigError>> {
    let config = loaded.map_err(|err| diagnostic::figment_to_config_errors(err, &sources))?;
    validation::validate_config(&config)?;
    Ok(config)
}

/// `(display path, content)` of every readable file. Relative paths are
/// resolved against the working directory, matching what figment reports.
fn read_sources(paths: Vec<PathBuf>) -> Vec<(String, String)> {
    let cwd = std::env::current_dir().unwrap_or_default();
    paths
        .into_iter()
        .map(|p| if p.is_relative() { cwd.join(p) } else { p })
        .filter_map(|p| {
            std::fs::read_to_string(&p)
                .ok()
                .map(|content| (p.display().to_string(), content))
        })
        .collect()
}
