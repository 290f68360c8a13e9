#![forbid(unsafe_code)]

pub mod chat_service;
pub mod collaborators;
pub mod engagement_service;
pub mod error;
pub mod session;

pub use ltd_core::Clock;

pub use chat_service::{AiConfig, OpenAiChatService};
pub use collaborators::{
    ChatCollaborator, ChatMessage, ChatRole, EngagementEvaluator, EngagementVerdict,
    ExchangeContext, OutcomeSink,
};
pub use engagement_service::OpenAiEngagementService;
pub use error::{ChatError, EvaluatorError, SessionError};
pub use session::{
    AdvanceOutcome, ExchangeOutcome, SessionEvent, SessionLoopService, SessionProgress,
    SessionService,
};
