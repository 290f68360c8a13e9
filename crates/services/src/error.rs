//! Shared error types for the services crate.

use thiserror::Error;

use ltd_core::model::ModuleError;
use ltd_core::phase::Phase;

/// Errors emitted by chat collaborator implementations.
///
/// A failed exchange is surfaced to the caller for display only; it never
/// mutates session state, so the learner can retry with the section intact.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatError {
    #[error("chat collaborator is not configured")]
    Disabled,
    #[error("chat collaborator returned an empty response")]
    EmptyResponse,
    #[error("chat request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by engagement evaluator implementations.
///
/// The workflow absorbs these to "not engaged"; they are never shown to the
/// learner and never block an exchange.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EvaluatorError {
    #[error("engagement evaluator is not configured")]
    Disabled,
    #[error("engagement verdict was not valid JSON: {0}")]
    MalformedVerdict(#[from] serde_json::Error),
    #[error("engagement request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by session services.
///
/// Module errors are fatal at load time and prevent the session from
/// starting. Denied advances are not errors; see
/// [`crate::session::AdvanceOutcome`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error(transparent)]
    Module(#[from] ModuleError),
    #[error("operation is not available in the {0:?} phase")]
    WrongPhase(Phase),
    #[error("session is already finished")]
    Finished,
    #[error(transparent)]
    Chat(#[from] ChatError),
}
