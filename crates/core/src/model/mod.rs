mod content;
mod ids;
mod ledger;
mod module;
mod position;

pub use content::{ContentError, ContentItem, ContentKind};
pub use ids::{ModuleId, SessionId};
pub use ledger::InteractionLedger;
pub use module::{Module, ModuleError, ModulePrompts, normalize_boundaries};
pub use position::ItemPosition;
