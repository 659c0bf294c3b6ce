//! Conversation orchestrator for the Movne sales assistant.
//!
//! This crate provides the [`Orchestrator`] type which decides how each chat
//! message is answered and records what the client told us.
//!
//! # Features
//!
//! - Canned replies from `sales_responses.yaml` with a time-of-day greeting
//! - A qualified-investor gate in front of any returns/yield discussion
//! - Model calls with company knowledge, recent history and matching snippets
//! - Form links and the legal disclaimer appended to model replies
//! - Contact extraction into leads after every successful turn
//!
//! # Architecture
//!
//! ```text
//! chat message (from the HTTP api)
//!          ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ORCHESTRATOR                           │
//! │                                                             │
//! │  1. Store the user message                                  │
//! │         ↓                                                   │
//! │  2. Response cache hit?  → canned reply                     │
//! │         ↓                                                   │
//! │  3. Qualification gate definitive? → question/instructions  │
//! │         ↓                                                   │
//! │  4. Model call → form links → disclaimer                    │
//! │         ↓                                                   │
//! │  5. Store the reply, capture leads                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use orchestrator::{MemoryStore, Orchestrator, OrchestratorConfig, SalesKnowledge};
//! use mock_brain::EchoBrain;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let knowledge = SalesKnowledge::load("config");
//!     let orchestrator = Orchestrator::new(
//!         EchoBrain::new(),
//!         MemoryStore::new(),
//!         &knowledge,
//!         OrchestratorConfig::from_env(),
//!     );
//!
//!     let reply = orchestrator.respond("מה התשואה?", None).await?;
//!     println!("{}: {}", reply.conversation_id, reply.reply);
//!     Ok(())
//! }
//! ```

mod cache;
mod contact;
mod context;
mod error;
mod formatting;
mod knowledge;
mod leads;
mod orchestrator;
mod qualification;
mod store;

// Public exports
pub use cache::{greeting_for_hour, ResponseCache, GREETING_PLACEHOLDER};
pub use contact::{ContactCandidate, ContactExtractor};
pub use context::{base_system_prompt, enhanced_system_prompt, Context};
pub use error::{KnowledgeError, OrchestratorError};
pub use formatting::{add_disclaimer, add_form_links, needs_disclaimer, DEFAULT_DISCLAIMER};
pub use knowledge::{
    CoreKnowledge, KeywordKnowledge, KnowledgeSource, SalesKnowledge, SalesResponseEntry,
    SalesResponses,
};
pub use leads::LeadTracker;
pub use orchestrator::{
    ChatReply, Orchestrator, OrchestratorConfig, ReplySource, APOLOGY_TEXT,
    DEFAULT_HISTORY_TURNS, NO_CONTENT_TEXT,
};
pub use qualification::{
    classify_answer, Answer, FormUrls, GateDecision, GateOutcome, GateState, QualificationGate,
    QUALIFICATION_MARKER,
};
pub use store::{ConversationStore, HistoryEntry, MemoryConversation, MemoryStore};

// Re-export commonly used types from dependencies
pub use brain_core::{Brain, InboundMessage, OutboundMessage};
pub use database::{InvestorStatus, Role};
