//! Main orchestrator that decides how each chat message is answered.

use std::sync::Arc;

use brain_core::{Brain, BrainError, InboundMessage};
use database::Role;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::cache::ResponseCache;
use crate::context::{base_system_prompt, enhanced_system_prompt, Context};
use crate::error::OrchestratorError;
use crate::formatting::{post_process, DEFAULT_DISCLAIMER};
use crate::knowledge::{KnowledgeSource, SalesKnowledge};
use crate::leads::LeadTracker;
use crate::qualification::{qualification_reason, FormUrls, GateDecision, QualificationGate};
use crate::store::{ConversationStore, HistoryEntry};

/// Reply shown whenever a turn fails.
pub const APOLOGY_TEXT: &str = "מצטער, אירעה שגיאה. אנא נסה שוב.";

/// Reply used when the model answers without any text.
pub const NO_CONTENT_TEXT: &str = "מצטער, לא הצלחתי להבין. אנא נסה שוב.";

/// Default number of recent messages included in the model instruction.
pub const DEFAULT_HISTORY_TURNS: usize = 3;

/// Tunables for [`Orchestrator`].
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Recent messages included in the enhanced instruction.
    pub history_turns: usize,
    pub forms: FormUrls,
    /// Used when `legal.yaml` has no disclaimer.
    pub disclaimer: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            history_turns: DEFAULT_HISTORY_TURNS,
            forms: FormUrls::default(),
            disclaimer: DEFAULT_DISCLAIMER.to_string(),
        }
    }
}

impl OrchestratorConfig {
    /// Read `API_BASE_URL` and `MOVNE_HISTORY_TURNS`, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(base) = std::env::var("API_BASE_URL") {
            if !base.trim().is_empty() {
                config.forms = FormUrls::from_base(base.trim());
            }
        }

        if let Ok(turns) = std::env::var("MOVNE_HISTORY_TURNS") {
            match turns.parse() {
                Ok(turns) => config.history_turns = turns,
                Err(_) => warn!("Ignoring invalid MOVNE_HISTORY_TURNS: {}", turns),
            }
        }

        config
    }
}

/// Result of one chat turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatReply {
    pub reply: String,
    pub conversation_id: String,
}

/// How a reply was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    Cache,
    Qualification(GateDecision),
    Model,
}

/// Coordinates cache, qualification gate, model and lead capture.
///
/// Precedence per message:
/// 1. canned reply from the response cache
/// 2. a definitive qualification gate decision
/// 3. the model, followed by form-link and disclaimer post-processing
pub struct Orchestrator<B: Brain, S: ConversationStore> {
    brain: B,
    store: S,
    cache: Arc<ResponseCache>,
    gate: QualificationGate,
    knowledge: Option<Arc<dyn KnowledgeSource>>,
    leads: LeadTracker,
    base_prompt: String,
    disclaimer: String,
    history_turns: usize,
}

impl<B: Brain, S: ConversationStore> Orchestrator<B, S> {
    /// Create an orchestrator from loaded knowledge files.
    pub fn new(brain: B, store: S, knowledge: &SalesKnowledge, config: OrchestratorConfig) -> Self {
        let disclaimer = knowledge
            .legal_disclaimer
            .clone()
            .unwrap_or(config.disclaimer);

        Self {
            brain,
            store,
            cache: Arc::new(ResponseCache::build(&knowledge.sales_responses)),
            gate: QualificationGate::new(config.forms),
            knowledge: None,
            leads: LeadTracker::new(),
            base_prompt: base_system_prompt(knowledge),
            disclaimer,
            history_turns: config.history_turns,
        }
    }

    /// Use a knowledge source for the instruction and per-message snippets.
    pub fn with_knowledge_source(mut self, source: Arc<dyn KnowledgeSource>) -> Self {
        self.base_prompt = enhanced_system_prompt(source.as_ref());
        self.knowledge = Some(source);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Answer one message.
    ///
    /// A new conversation ID is minted when none is given. The user message
    /// is stored before anything else; the reply only when the turn succeeds.
    /// Evaluation failures become [`APOLOGY_TEXT`]; store failures are
    /// returned as errors.
    pub async fn respond(
        &self,
        message: &str,
        conversation_id: Option<&str>,
    ) -> Result<ChatReply, OrchestratorError> {
        let conversation_id = conversation_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        info!(
            "Received message for {}: {}",
            conversation_id,
            truncate(message, 50)
        );

        self.store.ensure_conversation(&conversation_id).await?;
        let history = self.store.get_history(&conversation_id).await?;
        self.store
            .append_message(&conversation_id, Role::User, message)
            .await?;

        let reply = match self.evaluate(&conversation_id, message, &history).await {
            Ok((reply, source)) => {
                debug!("Reply for {} produced by {:?}", conversation_id, source);
                reply
            }
            Err(e) => {
                error!("Failed to answer message in {}: {}", conversation_id, e);
                return Ok(ChatReply {
                    reply: APOLOGY_TEXT.to_string(),
                    conversation_id,
                });
            }
        };

        self.store
            .append_message(&conversation_id, Role::Assistant, &reply)
            .await?;

        if let Err(e) = self.leads.capture(&self.store, &conversation_id).await {
            warn!("Lead capture failed for {}: {}", conversation_id, e);
        }

        Ok(ChatReply {
            reply,
            conversation_id,
        })
    }

    /// Pick the reply for `message` given the history before it.
    async fn evaluate(
        &self,
        conversation_id: &str,
        message: &str,
        history: &[HistoryEntry],
    ) -> Result<(String, ReplySource), OrchestratorError> {
        if let Some(reply) = self.cache.lookup(message) {
            info!("Using cached response");
            return Ok((reply, ReplySource::Cache));
        }

        let outcome = self.gate.evaluate(history, message);
        if let Some(reply) = self.gate.render(outcome.decision) {
            if let Some(status) = outcome.answer {
                self.store
                    .set_qualification(conversation_id, status, qualification_reason(status))
                    .await
                    .map_err(|e| OrchestratorError::Qualification(e.to_string()))?;
                info!("Recorded investor status {} for {}", status, conversation_id);
            }
            info!(
                "Qualification gate: {:?} (state {:?})",
                outcome.decision, outcome.state
            );
            return Ok((reply, ReplySource::Qualification(outcome.decision)));
        }

        let reply = self.ask_model(conversation_id, message, history).await?;
        Ok((reply, ReplySource::Model))
    }

    async fn ask_model(
        &self,
        conversation_id: &str,
        message: &str,
        history: &[HistoryEntry],
    ) -> Result<String, OrchestratorError> {
        let mut context = Context::new();
        if let Some(source) = &self.knowledge {
            for snippet in source.lookup(message) {
                context.add_knowledge(&snippet);
            }
            context.add_history(history, self.history_turns);
        }
        debug!("Model context: {}", context.format_summary());

        let inbound = InboundMessage::new(conversation_id, message)
            .with_system_prompt(context.system_prompt(&self.base_prompt));

        let text = match self.brain.process(inbound).await {
            Ok(outbound) if !outbound.text.trim().is_empty() => outbound.text,
            Ok(_) | Err(BrainError::EmptyResponse) => {
                warn!("{} returned no content", self.brain.name());
                NO_CONTENT_TEXT.to_string()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(post_process(&text, self.gate.forms(), &self.disclaimer))
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
