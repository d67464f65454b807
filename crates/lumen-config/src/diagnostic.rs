// SPDX-FileCopyrightText: 2026 Lumen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Config diagnostics rendered with miette.
//!
//! Unknown keys point at the offending line of the TOML file they came from
//! and suggest the closest valid key.

#![allow(unused_assignments)] // emitted by the miette derive

use std::io::IsTerminal;

use figment::error::Kind;
use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme, NamedSource, SourceSpan};
use thiserror::Error;

/// Jaro-Winkler score a valid key must beat to be suggested.
const SUGGESTION_THRESHOLD: f64 = 0.75;

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// `key` is not a field of the table it appears in.
    #[error("`{}` is not a recognized setting", dotted(.section, .key))]
    #[diagnostic(
        code(lumen::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        section: Vec<String>,
        key: String,
        suggestion: Option<String>,
        valid_keys: Vec<String>,
        #[label("unknown key")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("`{key}` has the wrong type: found {found}")]
    #[diagnostic(code(lumen::config::invalid_type), help("use {expected}"))]
    InvalidType {
        key: String,
        found: String,
        expected: String,
    },

    #[error("`{key}` is required")]
    #[diagnostic(code(lumen::config::missing_key), help("set `{key}` in lumen.toml"))]
    MissingKey { key: String },

    /// The file parsed but a value is out of range.
    #[error("{message}")]
    #[diagnostic(code(lumen::config::validation), help("check `{field}` in lumen.toml"))]
    Validation { field: String, message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(lumen::config::other))]
    Other(String),
}

impl ConfigError {
    /// Failed range/format check on `field` (dotted path).
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        ConfigError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

fn dotted(section: &[String], key: &str) -> String {
    section
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(key))
        .collect::<Vec<_>>()
        .join(".")
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &[String]) -> String {
    let valid = valid_keys.join(", ");
    match suggestion {
        Some(s) => format!("did you mean `{s}`? expected one of: {valid}"),
        None => format!("expected one of: {valid}"),
    }
}

/// Convert every error carried by a `figment::Error` into a diagnostic.
///
/// `toml_sources` holds `(path, content)` of the files that were merged, so
/// unknown keys can be labelled in place.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    err.into_iter()
        .map(|error| convert(&error, toml_sources))
        .collect()
}

fn convert(error: &figment::Error, toml_sources: &[(String, String)]) -> ConfigError {
    let path: Vec<String> = error.path.clone();
    match &error.kind {
        Kind::UnknownField(key, expected) => {
            let valid_keys: Vec<String> = expected.iter().map(|k| k.to_string()).collect();
            let suggestion = suggest_key(key, expected);
            let (span, src) = match source_for(error, toml_sources) {
                Some((name, content)) => match find_key_offset(content, &path, key) {
                    Some(offset) => (
                        Some(SourceSpan::new(offset.into(), key.len())),
                        Some(NamedSource::new(name, content.clone())),
                    ),
                    None => (None, None),
                },
                None => (None, None),
            };
            ConfigError::UnknownKey {
                section: path,
                key: key.clone(),
                suggestion,
                valid_keys,
                span,
                src,
            }
        }
        Kind::MissingField(key) => ConfigError::MissingKey {
            key: dotted(&path, key),
        },
        Kind::InvalidType(found, expected) => ConfigError::InvalidType {
            key: path.join("."),
            found: found.to_string(),
            expected: expected.clone(),
        },
        _ => ConfigError::Other(error.to_string()),
    }
}

/// The merged file an error came from. Inline strings have no file origin,
/// so a single given source is assumed to be it.
fn source_for<'a>(
    error: &figment::Error,
    toml_sources: &'a [(String, String)],
) -> Option<&'a (String, String)> {
    let file = error.metadata.as_ref().and_then(|m| match &m.source {
        Some(figment::Source::File(path)) => Some(path.display().to_string()),
        _ => None,
    });
    match file {
        Some(file) => toml_sources.iter().find(|(name, _)| *name == file),
        None if toml_sources.len() == 1 => toml_sources.first(),
        None => None,
    }
}

/// Byte offset of `field` inside the `[section]` table of a TOML document.
///
/// Tracks table headers line by line, so a key with the same name in an
/// earlier table is not mistaken for the offending one.
pub fn find_key_offset(content: &str, section: &[String], field: &str) -> Option<usize> {
    let wanted = section.first().map(String::as_str);
    let mut current: Option<&str> = None;
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        let trimmed = line.trim();
        if let Some(header) = trimmed.strip_prefix('[').and_then(|h| h.strip_suffix(']')) {
            current = Some(header.trim());
        } else if current == wanted {
            let indent = line.len() - line.trim_start().len();
            let assigns = line[indent..]
                .strip_prefix(field)
                .is_some_and(|after| after.trim_start().starts_with('='));
            if assigns {
                return Some(offset + indent);
            }
        }
        offset += line.len();
    }
    None
}

/// Closest valid key, when it is close enough to be a typo.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Print every error to stderr, without colors when stderr is not a terminal.
pub fn render_errors(errors: &[ConfigError]) {
    let theme = if std::io::stderr().is_terminal() {
        GraphicalTheme::unicode()
    } else {
        GraphicalTheme::unicode_nocolor()
    };
    let handler = GraphicalReportHandler::new_themed(theme);

    for error in errors {
        let mut out = String::new();
        match handler.render_report(&mut out, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{out}"),
            Err(_) => eprintln!("config error: {error}"),
        }
    }
}
