use crate::model::{InteractionLedger, ItemPosition};
use crate::section::Section;

//
// ─── CONFIG ────────────────────────────────────────────────────────────────────
//

/// Thresholds governing progression decisions.
///
/// The exact numbers are configuration, not law; the defaults reproduce the
/// reference behavior (1 exchange to advance a Look section, 2 before an
/// engagement evaluation is worth running, 10 Think exchanges to move on).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfig {
    /// Completed exchanges required to leave a Look section by volume.
    pub look_advance_min_exchanges: u32,
    /// Completed exchanges in a section before engagement is evaluated.
    pub engagement_check_min_exchanges: u32,
    /// Cumulative Think exchanges required to enter Do.
    pub think_advance_min_exchanges: u32,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            look_advance_min_exchanges: 1,
            engagement_check_min_exchanges: 2,
            think_advance_min_exchanges: 10,
        }
    }
}

//
// ─── DECISIONS ─────────────────────────────────────────────────────────────────
//

/// Outcome of an advance request.
///
/// Denial is an expected, frequent result the caller handles silently (e.g.
/// a disabled "next" control), not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Granted,
    Denied,
}

impl GateDecision {
    #[must_use]
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }

    fn when(granted: bool) -> Self {
        if granted { Self::Granted } else { Self::Denied }
    }
}

//
// ─── GATE ──────────────────────────────────────────────────────────────────────
//

/// Pure decision logic over ledger state; never mutates anything.
///
/// Callers apply position/phase changes only after a `Granted` decision, so a
/// denied request leaves the session untouched by construction.
#[derive(Debug, Clone, Default)]
pub struct ProgressionGate {
    config: GateConfig,
}

impl ProgressionGate {
    #[must_use]
    pub fn new(config: GateConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// May the learner leave the current Look section forward?
    ///
    /// Granted on enough completed exchanges, or on a true engagement flag
    /// for the current position (engagement substitutes for volume). With
    /// zero exchanges and no flag the request is denied. The same condition
    /// gates leaving Look entirely from the last section.
    #[must_use]
    pub fn look_advance(
        &self,
        ledger: &InteractionLedger,
        section: Section,
        position: ItemPosition,
    ) -> GateDecision {
        let engaged = ledger.is_engaged(position);
        let exchanges = ledger.exchanges_in(section.index);
        GateDecision::when(engaged || exchanges >= self.config.look_advance_min_exchanges)
    }

    /// May the learner return to the previous Look section?
    ///
    /// Always, except at section 0. Going backward carries no exchange
    /// condition.
    #[must_use]
    pub fn look_regress(&self, section: Section) -> GateDecision {
        GateDecision::when(section.index > 0)
    }

    /// May the learner leave Think for Do?
    #[must_use]
    pub fn think_advance(&self, think_exchanges: u32) -> GateDecision {
        GateDecision::when(think_exchanges >= self.config.think_advance_min_exchanges)
    }

    /// Is there enough evidence in the section to justify an engagement
    /// evaluation? Below this, fewer exchanges are never enough.
    #[must_use]
    pub fn should_evaluate_engagement(
        &self,
        ledger: &InteractionLedger,
        section_index: usize,
    ) -> bool {
        ledger.exchanges_in(section_index) >= self.config.engagement_check_min_exchanges
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn section(index: usize) -> Section {
        Section {
            index,
            start: index * 2,
            end: index * 2 + 2,
        }
    }

    #[test]
    fn look_advance_denied_without_exchanges_or_engagement() {
        let gate = ProgressionGate::default();
        let ledger = InteractionLedger::new();

        let decision = gate.look_advance(&ledger, section(0), ItemPosition::first());
        assert_eq!(decision, GateDecision::Denied);
    }

    #[test]
    fn one_exchange_satisfies_look_advance() {
        let gate = ProgressionGate::default();
        let mut ledger = InteractionLedger::new();
        ledger.record_exchange(0);

        let decision = gate.look_advance(&ledger, section(0), ItemPosition::first());
        assert!(decision.is_granted());
    }

    #[test]
    fn engagement_flag_overrides_missing_exchanges() {
        let gate = ProgressionGate::default();
        let mut ledger = InteractionLedger::new();
        let position = ItemPosition::new(3).unwrap();
        ledger.set_engagement(position, true);

        let decision = gate.look_advance(&ledger, section(1), position);
        assert!(decision.is_granted());
    }

    #[test]
    fn flag_for_another_position_does_not_help() {
        let gate = ProgressionGate::default();
        let mut ledger = InteractionLedger::new();
        ledger.set_engagement(ItemPosition::new(3).unwrap(), true);

        let decision = gate.look_advance(&ledger, section(1), ItemPosition::new(4).unwrap());
        assert_eq!(decision, GateDecision::Denied);
    }

    #[test]
    fn regress_is_denied_only_at_section_zero() {
        let gate = ProgressionGate::default();
        assert_eq!(gate.look_regress(section(0)), GateDecision::Denied);
        assert!(gate.look_regress(section(1)).is_granted());
        assert!(gate.look_regress(section(5)).is_granted());
    }

    #[test]
    fn think_advance_uses_cumulative_threshold() {
        let gate = ProgressionGate::default();
        assert_eq!(gate.think_advance(9), GateDecision::Denied);
        assert!(gate.think_advance(10).is_granted());
    }

    #[test]
    fn engagement_evaluation_waits_for_two_exchanges() {
        let gate = ProgressionGate::default();
        let mut ledger = InteractionLedger::new();

        ledger.record_exchange(0);
        assert!(!gate.should_evaluate_engagement(&ledger, 0));

        ledger.record_exchange(0);
        assert!(gate.should_evaluate_engagement(&ledger, 0));
    }

    #[test]
    fn thresholds_are_configuration() {
        let gate = ProgressionGate::new(GateConfig {
            look_advance_min_exchanges: 2,
            engagement_check_min_exchanges: 3,
            think_advance_min_exchanges: 4,
        });
        let mut ledger = InteractionLedger::new();
        ledger.record_exchange(0);

        let decision = gate.look_advance(&ledger, section(0), ItemPosition::first());
        assert_eq!(decision, GateDecision::Denied);
        assert!(gate.think_advance(4).is_granted());
    }
}
