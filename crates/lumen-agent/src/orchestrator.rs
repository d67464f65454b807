// SPDX-FileCopyrightText: 2026 Lumen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-turn dialogue state machine.
//!
//! A turn parses the utterance, resolves "it" against the last command
//! target, and dispatches on intent. Questions check long-term memory
//! before research and write what research finds back with its sources.
//! Failures never escape [`DialogueOrchestrator::handle`]; they become
//! `[error]` replies or inbox events.

use std::path::PathBuf;
use std::sync::Arc;

use lumen_config::model::{LumenConfig, StorageConfig};
use lumen_core::{
    Authorizer, CommandOutcome, CommandRequest, CommandRunner, Intent, IntentParser,
    Interpretation, LumenError, ResearchAnswer, Researcher, Role,
};
use lumen_memory::{FactStore, RecencyBuffer};
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::reply;
use crate::session::{PendingAction, SessionState, mentions_it};
use crate::trace::Trace;

/// Event kind for items that need later human or job attention.
pub const INBOX: &str = "inbox";
/// Event kind for logged user/assistant exchanges.
pub const CHAT: &str = "chat";

const AFFIRMATIVE: &[&str] = &["yes", "y", "sure", "ok", "okay"];

/// Tunables the orchestrator reads from configuration.
#[derive(Debug, Clone)]
pub struct DialogueSettings {
    pub verbose_trace: bool,
    pub recency_capacity: usize,
    pub citation_limit: usize,
    /// Target for "create file" when the user names none.
    pub default_new_file: PathBuf,
}

impl DialogueSettings {
    pub fn from_config(config: &LumenConfig) -> Self {
        Self {
            verbose_trace: config.agent.verbose_trace,
            recency_capacity: config.agent.recency_capacity,
            citation_limit: config.memory.citation_limit,
            default_new_file: PathBuf::from(&config.storage.data_dir).join("untitled.txt"),
        }
    }
}

/// Memory lookup key for structured questions.
fn structured_key(interp: &Interpretation) -> Option<String> {
    match interp.slot("qtype") {
        Some("capital_of") => interp
            .slot("country")
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(|c| format!("capital:{}", c.to_lowercase())),
        _ => None,
    }
}

/// Key under which an unstructured answer is learned.
pub fn learned_key(question: &str) -> String {
    format!("learned:{}", question.trim().to_lowercase())
}

/// `(url, title)` pairs for citations that carry a URL.
pub fn citation_sources(answer: &ResearchAnswer) -> Vec<(String, String)> {
    answer
        .citations
        .iter()
        .filter(|c| !c.url.trim().is_empty())
        .map(|c| (c.url.clone(), c.name.clone()))
        .collect()
}

fn is_affirmative(value: &str) -> bool {
    let value = value.trim().to_lowercase();
    AFFIRMATIVE.iter().any(|word| {
        value
            .strip_prefix(word)
            .is_some_and(|rest| rest.chars().next().is_none_or(|c| !c.is_alphanumeric()))
    })
}

pub struct DialogueOrchestrator {
    parser: Arc<dyn IntentParser>,
    commands: Arc<dyn CommandRunner>,
    research: Arc<dyn Researcher>,
    authorizer: Arc<dyn Authorizer>,
    storage: StorageConfig,
    settings: DialogueSettings,
    store: OnceCell<Arc<FactStore>>,
    recency: RecencyBuffer,
    session: SessionState,
}

impl DialogueOrchestrator {
    /// Build an orchestrator. The long-term store is opened on first use.
    pub fn new(
        config: &LumenConfig,
        parser: Arc<dyn IntentParser>,
        commands: Arc<dyn CommandRunner>,
        research: Arc<dyn Researcher>,
        authorizer: Arc<dyn Authorizer>,
    ) -> Self {
        let settings = DialogueSettings::from_config(config);
        Self {
            parser,
            commands,
            research,
            authorizer,
            storage: config.storage.clone(),
            recency: RecencyBuffer::new(settings.recency_capacity),
            settings,
            store: OnceCell::new(),
            session: SessionState::new(),
        }
    }

    /// Use an already opened store instead of opening one lazily.
    pub fn with_store(mut self, store: Arc<FactStore>) -> Self {
        self.store = OnceCell::new_with(Some(store));
        self
    }

    pub fn with_settings(mut self, settings: DialogueSettings) -> Self {
        self.recency = RecencyBuffer::new(settings.recency_capacity);
        self.settings = settings;
        self
    }

    /// The long-term store, opening it (and asking for persistence) on first call.
    pub async fn store(&self) -> Result<Arc<FactStore>, LumenError> {
        let store = self
            .store
            .get_or_try_init(|| async {
                let store = FactStore::open(&self.storage, self.authorizer.as_ref()).await?;
                debug!(persistent = store.is_persistent(), "long-term memory ready");
                Ok::<_, LumenError>(Arc::new(store))
            })
            .await?;
        Ok(Arc::clone(store))
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn recent(&self) -> Vec<(Role, String)> {
        self.recency.recent()
    }

    /// Process one utterance and return the reply text.
    pub async fn handle(&mut self, text: &str) -> String {
        let mut trace = Trace::new();
        let reply = match self.turn(text, &mut trace).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "turn failed");
                trace.add("error");
                format!("[error] {e}")
            }
        };

        self.recency.push(Role::User, text);
        self.recency.push(Role::Agent, reply.clone());

        if self.settings.verbose_trace {
            trace.annotate(&reply)
        } else {
            reply
        }
    }

    /// Append a `chat` event recording one exchange.
    pub async fn record_exchange(&self, user: &str, agent: &str) -> Result<i64, LumenError> {
        let store = self.store().await?;
        store
            .log_event(CHAT, &format!("user: {user} | agent: {agent}"))
            .await
    }

    async fn turn(&mut self, text: &str, trace: &mut Trace) -> Result<String, LumenError> {
        let mut interp = self.parser.interpret(text);
        trace.add(format!("intent={}", interp.intent));

        if mentions_it(text) && self.session.merge_last_object(&mut interp.slots) > 0 {
            trace.add("coref=last_object");
        }

        match interp.intent {
            Intent::Confirm => self.on_confirm(&interp, trace).await,
            Intent::Command => self.on_command(&interp, trace).await,
            Intent::Question => self.on_question(&interp, trace).await,
            Intent::Chat => Ok(reply::CHAT_ACK.to_string()),
        }
    }

    async fn on_confirm(
        &mut self,
        interp: &Interpretation,
        trace: &mut Trace,
    ) -> Result<String, LumenError> {
        let Some(pending) = self.session.take_pending() else {
            trace.add("pending=none");
            return Ok(reply::NOTHING_PENDING.to_string());
        };
        let value = interp.slot("value").unwrap_or(&interp.text);
        trace.add(format!("pending={pending}"));

        if !is_affirmative(value) {
            trace.add("confirm=no");
            return Ok(reply::CANCELLED.to_string());
        }
        trace.add("confirm=yes");
        match pending {
            PendingAction::Clarify { .. } => Ok(reply::CONFIRMED.to_string()),
            PendingAction::Run(request) => self.execute(request, trace).await,
        }
    }

    async fn on_command(
        &mut self,
        interp: &Interpretation,
        trace: &mut Trace,
    ) -> Result<String, LumenError> {
        let slot = |name: &str| {
            interp
                .slot(name)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let request = match interp.slot("action").unwrap_or_default() {
            "open_url" => slot("url").map(|url| CommandRequest::OpenUrl { url }),
            "open_file" => slot("path").map(|path| CommandRequest::OpenFile { path }),
            "open_app" => slot("app").map(|name| CommandRequest::OpenApp { name }),
            "open" => slot("url")
                .map(|url| CommandRequest::OpenUrl { url })
                .or_else(|| slot("path").map(|path| CommandRequest::OpenFile { path }))
                .or_else(|| slot("app").map(|name| CommandRequest::OpenApp { name })),
            "create_file" => match slot("path") {
                Some(path) => Some(CommandRequest::CreateFile { path }),
                None => {
                    let path = self.settings.default_new_file.to_string_lossy().to_string();
                    let prompt = reply::confirm_prompt(&format!("No file name given. Create {path}"));
                    self.session
                        .set_pending(PendingAction::Run(CommandRequest::CreateFile { path }));
                    trace.add("pending=run:create_file");
                    return Ok(prompt);
                }
            },
            "set_reminder" => {
                let seconds = slot("in_seconds").and_then(|s| s.parse::<u64>().ok());
                match seconds {
                    Some(seconds) => Some(CommandRequest::SetReminder {
                        seconds,
                        message: slot("message").unwrap_or_else(|| "Reminder".to_string()),
                    }),
                    None => return Ok(reply::UNKNOWN_COMMAND.to_string()),
                }
            }
            _ => return Ok(reply::UNKNOWN_COMMAND.to_string()),
        };

        match request {
            Some(request) => self.execute(request, trace).await,
            None => {
                self.session.set_pending(PendingAction::Clarify {
                    request: interp.text.clone(),
                });
                trace.add("pending=clarify");
                self.store().await?.log_event(INBOX, &interp.text).await?;
                Ok(reply::CLARIFY_OPEN.to_string())
            }
        }
    }

    /// Run a command through the collaborator, triaging denials and errors.
    async fn execute(
        &mut self,
        request: CommandRequest,
        trace: &mut Trace,
    ) -> Result<String, LumenError> {
        trace.add(format!("cmd={}", request.action()));
        let reply = match self.commands.run(&request).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(action = request.action(), error = %e, "command collaborator failed");
                reply::COMMAND_FAILED.to_string()
            }
        };

        let outcome = CommandOutcome::from_reply(&reply);
        if outcome.needs_triage() {
            trace.add("inbox=logged");
            self.store().await?.log_event(INBOX, &reply).await?;
        } else {
            self.session.remember(&request);
        }
        Ok(reply)
    }

    async fn on_question(
        &mut self,
        interp: &Interpretation,
        trace: &mut Trace,
    ) -> Result<String, LumenError> {
        let store = self.store().await?;
        let learned = learned_key(&interp.text);

        // Structured memory first, then anything research taught us about
        // this exact question.
        let keys = structured_key(interp).into_iter().chain(Some(learned.clone()));
        for key in keys {
            let facts = store.get_facts(Some(&key)).await?;
            if let Some(latest) = facts.first() {
                trace.add("memory=hit");
                let urls = store
                    .get_citation_urls_for_key(&key, self.settings.citation_limit)
                    .await?;
                return Ok(reply::with_citations(&latest.value, &urls));
            }
        }
        trace.add("memory=miss");

        trace.add("research=aggregate");
        let answer = match self.research.aggregate(&interp.text).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!(error = %e, "research collaborator failed; treating as no answer");
                trace.add("research=error");
                ResearchAnswer::empty()
            }
        };

        if answer.is_empty() {
            trace.add("inbox=question");
            store
                .log_event(INBOX, &format!("question: {}", interp.text))
                .await?;
            return Ok(reply::DONT_KNOW.to_string());
        }

        // Research prose is never written under a structured key; those
        // hold bare values that consolidation mines into relations.
        let summary = answer.summary.trim();
        let sources = citation_sources(&answer);
        if sources.is_empty() {
            store.add_fact(&learned, summary, None).await?;
        } else {
            store.add_fact_with_sources(&learned, summary, &sources).await?;
        }
        trace.add("memory=store");

        let mut urls: Vec<String> = Vec::new();
        for (url, _) in sources {
            if !urls.contains(&url) {
                urls.push(url);
            }
        }
        urls.truncate(self.settings.citation_limit);
        Ok(reply::with_citations(summary, &urls))
    }
}
