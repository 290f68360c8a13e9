use std::collections::HashMap;

use crate::model::ItemPosition;

/// Per-session record of learner effort.
///
/// Counts completed user/assistant exchanges per section and keeps the sticky
/// engagement verdict per item position. Owned by the session and never
/// persisted; a collaborator may log transcripts independently.
#[derive(Debug, Clone, Default)]
pub struct InteractionLedger {
    message_count_by_section: HashMap<usize, u32>,
    engagement_flag_by_item: HashMap<ItemPosition, bool>,
}

impl InteractionLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one completed exchange against a section and returns the new count.
    ///
    /// One call per user-message/assistant-reply pair, never per keystroke or
    /// partial message.
    pub fn record_exchange(&mut self, section_index: usize) -> u32 {
        let count = self.message_count_by_section.entry(section_index).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    /// Resets a section's counter to zero.
    ///
    /// Called exactly once whenever navigation enters the section, whether for
    /// the first time, forward, or backward.
    pub fn reset_section(&mut self, section_index: usize) {
        self.message_count_by_section.insert(section_index, 0);
    }

    /// Stores the most recent engagement verdict for an item position.
    ///
    /// Sticky, last write wins. Writes for positions the learner has already
    /// left are harmless: the gate only reads the current position's flag.
    pub fn set_engagement(&mut self, position: ItemPosition, engaged: bool) {
        self.engagement_flag_by_item.insert(position, engaged);
    }

    /// Exchanges recorded against a section since it was last entered.
    #[must_use]
    pub fn exchanges_in(&self, section_index: usize) -> u32 {
        self.message_count_by_section
            .get(&section_index)
            .copied()
            .unwrap_or(0)
    }

    /// Latest engagement verdict for a position; absent means not engaged.
    #[must_use]
    pub fn is_engaged(&self, position: ItemPosition) -> bool {
        self.engagement_flag_by_item
            .get(&position)
            .copied()
            .unwrap_or(false)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exchanges_accumulate_per_section() {
        let mut ledger = InteractionLedger::new();
        assert_eq!(ledger.exchanges_in(0), 0);

        assert_eq!(ledger.record_exchange(0), 1);
        assert_eq!(ledger.record_exchange(0), 2);
        assert_eq!(ledger.record_exchange(1), 1);

        assert_eq!(ledger.exchanges_in(0), 2);
        assert_eq!(ledger.exchanges_in(1), 1);
    }

    #[test]
    fn reset_clears_only_the_given_section() {
        let mut ledger = InteractionLedger::new();
        ledger.record_exchange(0);
        ledger.record_exchange(1);

        ledger.reset_section(0);

        assert_eq!(ledger.exchanges_in(0), 0);
        assert_eq!(ledger.exchanges_in(1), 1);
    }

    #[test]
    fn engagement_is_sticky_and_last_write_wins() {
        let mut ledger = InteractionLedger::new();
        let pos = ItemPosition::first();
        assert!(!ledger.is_engaged(pos));

        ledger.set_engagement(pos, true);
        assert!(ledger.is_engaged(pos));

        ledger.set_engagement(pos, false);
        assert!(!ledger.is_engaged(pos));
    }

    #[test]
    fn engagement_flags_do_not_interfere_across_positions() {
        let mut ledger = InteractionLedger::new();
        let here = ItemPosition::new(3).unwrap();
        let there = ItemPosition::new(4).unwrap();

        ledger.set_engagement(here, true);

        assert!(ledger.is_engaged(here));
        assert!(!ledger.is_engaged(there));
    }
}
