use std::sync::Arc;

use ltd_core::Clock;
use ltd_core::gate::GateConfig;
use ltd_core::model::Module;
use ltd_core::phase::Phase;

use super::prompts;
use super::service::{SessionEvent, SessionService};
use crate::collaborators::{
    ChatCollaborator, ChatMessage, EngagementEvaluator, ExchangeContext, OutcomeSink,
};
use crate::error::SessionError;

//
// ─── ANNOUNCEMENTS ─────────────────────────────────────────────────────────────
//

/// Deterministic transcript text for a session event, if the event is
/// announced at all. The session itself never writes transcript text; the UI
/// layer appends these as assistant messages when it drains events.
#[must_use]
pub fn announcement(event: &SessionEvent) -> Option<String> {
    match event {
        SessionEvent::PhaseEntered(Phase::Think) => Some(
            "Now we're in the 'think' phase. This is the place to experiment.".to_string(),
        ),
        SessionEvent::PhaseEntered(Phase::Do) => Some(
            "Now we're in the 'do' phase. It's time to write your conclusion based on what \
             you've learned. What were your key takeaways from the reading and experiments? \
             What surprised you?"
                .to_string(),
        ),
        SessionEvent::SectionEntered(index) => Some(format!(
            "Let's discuss section {} of the content. Read it carefully and let me know what \
             your thoughts and questions are.",
            index + 1
        )),
        SessionEvent::ConclusionSaved => Some(
            "Thank you for saving your conclusion. You can continue working on it, or finish \
             and take an optional feedback survey."
                .to_string(),
        ),
        SessionEvent::PhaseEntered(_) | SessionEvent::SurveySubmitted => None,
    }
}

//
// ─── EXCHANGE OUTCOME ──────────────────────────────────────────────────────────
//

/// Result of one completed exchange through the workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeOutcome {
    pub assistant_text: String,
    /// Engagement flag for the learner's current position after any
    /// re-evaluation triggered by this exchange.
    pub engaged: bool,
}

//
// ─── WORKFLOW ──────────────────────────────────────────────────────────────────
//

/// Orchestrates a session against the external collaborators.
///
/// The chat call is made first; only a successful reply records the exchange
/// (no partial credit for a failed one). The engagement evaluation runs after
/// recording, so a slow or failing evaluator can never block the exchange
/// itself, and its verdict lands through the ledger's last-write-wins flag.
#[derive(Clone)]
pub struct SessionLoopService {
    clock: Clock,
    chat: Arc<dyn ChatCollaborator>,
    evaluator: Arc<dyn EngagementEvaluator>,
    outcomes: Arc<dyn OutcomeSink>,
    engagement_guidance: String,
}

impl SessionLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        chat: Arc<dyn ChatCollaborator>,
        evaluator: Arc<dyn EngagementEvaluator>,
        outcomes: Arc<dyn OutcomeSink>,
    ) -> Self {
        Self {
            clock,
            chat,
            evaluator,
            outcomes,
            engagement_guidance: prompts::DEFAULT_ENGAGEMENT_GUIDANCE.to_string(),
        }
    }

    /// Replaces the coaching guidance appended to every system prompt.
    #[must_use]
    pub fn with_engagement_guidance(mut self, guidance: impl Into<String>) -> Self {
        self.engagement_guidance = guidance.into();
        self
    }

    /// Starts a session over an already-validated module.
    #[must_use]
    pub fn start_session(&self, module: Module, config: GateConfig) -> SessionService {
        SessionService::new(module, config, self.clock.now())
    }

    /// Sends one learner message and records the completed exchange.
    ///
    /// In Do, a non-empty conclusion draft is auto-saved first and appended
    /// to the outgoing message as context. In Look, once the section has
    /// enough exchanges, the engagement evaluator re-runs and its verdict is
    /// applied to the current position; evaluator failure is absorbed as
    /// "not engaged" and never surfaced.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Finished` after the session has ended and
    /// `SessionError::Chat` when the collaborator fails; neither mutates the
    /// ledger, so the learner can retry.
    pub async fn send_message(
        &self,
        session: &mut SessionService,
        history: &[ChatMessage],
        user_text: &str,
        conclusion_draft: Option<&str>,
    ) -> Result<ExchangeOutcome, SessionError> {
        if session.is_done() {
            return Err(SessionError::Finished);
        }

        let phase = session.phase();
        let outgoing = if phase == Phase::Do {
            if let Some(draft) = conclusion_draft {
                if !draft.trim().is_empty() {
                    self.save_conclusion(session, draft).await?;
                }
            }
            prompts::with_conclusion_context(user_text, session.conclusion())
        } else {
            user_text.to_string()
        };

        let context = ExchangeContext {
            phase,
            system_prompt: prompts::system_prompt_for(
                session.module(),
                phase,
                &self.engagement_guidance,
            ),
        };

        let assistant_text = self
            .chat
            .send_exchange(&context, history, &outgoing)
            .await?;
        session.record_exchange();

        if session.needs_engagement_check() {
            let position = session.position();
            let section_text = session.module().section_text(session.current_section());

            let mut recent = history.to_vec();
            recent.push(ChatMessage::user(outgoing));
            recent.push(ChatMessage::assistant(assistant_text.clone()));

            // Fail-open: a broken evaluator must not strand the learner on
            // the volume-based path.
            let engaged = match self.evaluator.evaluate(&section_text, &recent).await {
                Ok(verdict) => verdict.engaged,
                Err(_) => false,
            };
            session.apply_engagement(position, engaged);
        }

        Ok(ExchangeOutcome {
            engaged: session.ledger().is_engaged(session.position()),
            assistant_text,
        })
    }

    /// Saves the conclusion draft and notifies the outcome sink. The session
    /// proceeds without waiting for any acknowledgment.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::WrongPhase` outside Do.
    pub async fn save_conclusion(
        &self,
        session: &mut SessionService,
        text: &str,
    ) -> Result<(), SessionError> {
        session.save_conclusion(text)?;
        self.outcomes.conclusion_saved(session.id(), text).await;
        Ok(())
    }

    /// Submits the survey and notifies the outcome sink; the learner returns
    /// to the conclusion-writing state.
    pub async fn submit_survey(&self, session: &mut SessionService) -> bool {
        if session.submit_survey().is_denied() {
            return false;
        }
        self.outcomes.survey_submitted(session.id()).await;
        true
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
