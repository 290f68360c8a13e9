//! Narrow contracts for the external collaborators the engine consumes.
//!
//! The progression core never talks to the network itself; it goes through
//! these traits so tests can substitute in-process fakes and the UI layer can
//! wire in whatever backends it owns.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use ltd_core::model::SessionId;
use ltd_core::phase::Phase;

use crate::error::{ChatError, EvaluatorError};

//
// ─── TRANSCRIPT TYPES ──────────────────────────────────────────────────────────
//

/// Role of a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One transcript message. The UI layer owns the transcript; the engine only
/// passes slices of it to collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Prompt context assembled for one exchange from the module and phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeContext {
    pub phase: Phase,
    pub system_prompt: String,
}

//
// ─── COLLABORATOR CONTRACTS ────────────────────────────────────────────────────
//

/// Runs one chat completion for the learner's message.
///
/// Called once per learner message; the workflow records the exchange only on
/// success, so a failure carries no partial credit.
#[async_trait]
pub trait ChatCollaborator: Send + Sync {
    async fn send_exchange(
        &self,
        context: &ExchangeContext,
        history: &[ChatMessage],
        user_text: &str,
    ) -> Result<String, ChatError>;
}

/// Externally judged engagement decision for a stretch of conversation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngagementVerdict {
    pub engaged: bool,
    #[serde(default)]
    pub engagement_score: Option<u8>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Opaque oracle deciding whether the learner genuinely engaged with a
/// section. The engine does not interpret how the judgment is made.
#[async_trait]
pub trait EngagementEvaluator: Send + Sync {
    async fn evaluate(
        &self,
        section_text: &str,
        recent_exchanges: &[ChatMessage],
    ) -> Result<EngagementVerdict, EvaluatorError>;
}

/// Receives conclusion and survey outcomes.
///
/// Implementations may persist them; the session proceeds without waiting for
/// any acknowledgment.
#[async_trait]
pub trait OutcomeSink: Send + Sync {
    async fn conclusion_saved(&self, session: SessionId, text: &str);
    async fn survey_submitted(&self, session: SessionId);
}
