// SPDX-FileCopyrightText: 2026 Lumen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Research collaborator backed by the MediaWiki search API.
//!
//! Search hits are turned into citations pointing at article pages, filtered
//! through the configured domain allowlist, and the best snippet is trimmed
//! down to a short summary with personal data redacted.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use lumen_config::model::ResearchConfig;
use lumen_core::{Citation, LumenError, ResearchAnswer, Researcher};
use regex::Regex;
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Sentences kept in a summary.
const SUMMARY_SENTENCES: usize = 2;

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}").unwrap());

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+?\d[\d\s().\-]{7,}\d").unwrap());

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    query: Option<SearchQuery>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
    #[serde(default)]
    snippet: String,
}

/// Looks questions up on a MediaWiki instance.
pub struct WikipediaResearcher {
    client: reqwest::Client,
    endpoint: Url,
    enabled: bool,
    max_results: usize,
    allowlist: Vec<String>,
}

impl WikipediaResearcher {
    pub fn new(config: &ResearchConfig) -> Result<Self, LumenError> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| {
            LumenError::Config(format!("invalid research endpoint {}: {e}", config.endpoint))
        })?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("lumen/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LumenError::Internal(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            enabled: config.enabled,
            max_results: config.max_results.max(1),
            allowlist: config
                .domain_allowlist
                .iter()
                .map(|d| d.trim().to_lowercase())
                .filter(|d| !d.is_empty())
                .collect(),
        })
    }

    async fn search(&self, text: &str) -> Result<Vec<SearchHit>, LumenError> {
        let limit = self.max_results.to_string();
        let url = Url::parse_with_params(
            self.endpoint.as_str(),
            &[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", text),
                ("srlimit", limit.as_str()),
                ("format", "json"),
            ],
        )
        .map_err(|e| LumenError::Internal(format!("failed to build search URL: {e}")))?;

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| collaborator_error("research request failed", e))?;
        if !resp.status().is_success() {
            return Err(LumenError::collaborator(format!(
                "research endpoint returned {}",
                resp.status()
            )));
        }

        let body: SearchResponse = resp
            .json()
            .await
            .map_err(|e| collaborator_error("malformed research response", e))?;
        Ok(body.query.map(|q| q.search).unwrap_or_default())
    }

    /// Canonical article URL for a search hit title.
    fn article_url(&self, title: &str) -> String {
        let mut url = self.endpoint.clone();
        url.set_path(&format!("/wiki/{}", title.trim().replace(' ', "_")));
        url.set_query(None);
        url.set_fragment(None);
        url.to_string()
    }
}

#[async_trait]
impl Researcher for WikipediaResearcher {
    async fn aggregate(&self, text: &str) -> Result<ResearchAnswer, LumenError> {
        if !self.enabled {
            debug!("research disabled");
            return Ok(ResearchAnswer::empty());
        }
        let query = text.trim();
        if query.is_empty() {
            return Ok(ResearchAnswer::empty());
        }

        let hits = self.search(query).await?;
        let total = hits.len();
        let citations: Vec<Citation> = hits
            .into_iter()
            .map(|hit| Citation {
                url: self.article_url(&hit.title),
                snippet: clean_snippet(&hit.snippet),
                name: hit.title,
            })
            .filter(|c| is_allowed(&c.url, &self.allowlist))
            .collect();
        if citations.len() < total {
            warn!(
                dropped = total - citations.len(),
                "citations outside the domain allowlist dropped"
            );
        }

        let summary = citations
            .iter()
            .map(|c| summarize(&c.snippet, SUMMARY_SENTENCES))
            .find(|s| !s.is_empty())
            .unwrap_or_default();
        info!(query, citations = citations.len(), "research finished");

        Ok(ResearchAnswer {
            summary: redact_personal(&summary),
            citations,
        })
    }
}

fn collaborator_error(message: &str, e: reqwest::Error) -> LumenError {
    LumenError::Collaborator {
        message: format!("{message}: {e}"),
        source: Some(Box::new(e)),
    }
}

/// Whether `url`'s host passes the allowlist. An empty list allows all.
///
/// Entries containing a dot match the host itself or any subdomain; bare
/// entries match a single host label.
pub fn is_allowed(url: &str, allowlist: &[String]) -> bool {
    if allowlist.is_empty() {
        return true;
    }
    let Some(host) = Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_lowercase))
    else {
        return false;
    };
    allowlist.iter().any(|entry| {
        if entry.contains('.') {
            host == *entry || host.ends_with(&format!(".{entry}"))
        } else {
            host.split('.').any(|label| label == entry)
        }
    })
}

/// Strip search-highlight markup and decode the common HTML entities.
pub fn clean_snippet(raw: &str) -> String {
    let text = TAG.replace_all(raw, "");
    let text = text
        .replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First `max` sentences of `text`. A sentence ends at `.`, `!` or `?`
/// followed by whitespace or the end of input.
pub fn summarize(text: &str, max: usize) -> String {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if sentences.len() == max {
            break;
        }
        let boundary = matches!(c, '.' | '!' | '?')
            && chars.peek().is_none_or(|(_, next)| next.is_whitespace());
        if boundary {
            let end = i + c.len_utf8();
            let sentence = text[start..end].trim();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            start = end;
        }
    }
    if sentences.len() < max {
        let tail = text[start..].trim();
        if !tail.is_empty() {
            sentences.push(tail);
        }
    }
    sentences.join(" ")
}

/// Mask email addresses and phone numbers.
pub fn redact_personal(text: &str) -> String {
    let text = EMAIL.replace_all(text, "[email]");
    PHONE.replace_all(&text, "[phone]").into_owned()
}
