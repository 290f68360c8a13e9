#![forbid(unsafe_code)]

pub mod gate;
pub mod model;
pub mod phase;
pub mod section;
pub mod time;

pub use gate::{GateConfig, GateDecision, ProgressionGate};
pub use model::{
    ContentError, ContentItem, ContentKind, InteractionLedger, ItemPosition, Module, ModuleError,
    ModuleId, ModulePrompts, SessionId, normalize_boundaries,
};
pub use phase::{Phase, PhaseError, PhaseMachine};
pub use section::{Section, all_sections, section_of};
pub use time::Clock;
