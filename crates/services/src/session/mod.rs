mod progress;
mod prompts;
mod service;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use progress::SessionProgress;
pub use service::{AdvanceOutcome, SessionEvent, SessionService};
pub use workflow::{ExchangeOutcome, SessionLoopService, announcement};
