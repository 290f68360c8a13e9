use ltd_core::phase::Phase;

/// Aggregated view of session progress, useful for UI.
///
/// `can_advance`/`can_regress` mirror what the gate would decide right now,
/// so the UI can enable or disable its navigation controls without mutating
/// anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub phase: Phase,
    pub section_index: usize,
    pub section_count: usize,
    pub exchanges_in_section: u32,
    pub engaged: bool,
    pub can_advance: bool,
    pub can_regress: bool,
    pub think_exchanges: u32,
    pub conclusion_saved: bool,
}
