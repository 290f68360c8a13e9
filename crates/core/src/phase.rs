use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── PHASES ────────────────────────────────────────────────────────────────────
//

/// Stage of the Look → Think → Do flow, plus the optional survey and the
/// terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Look,
    Think,
    Do,
    Survey,
    Done,
}

impl Phase {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PhaseError {
    #[error("transition {trigger} is not valid from {from:?}")]
    InvalidTransition { from: Phase, trigger: &'static str },
}

//
// ─── STATE MACHINE ─────────────────────────────────────────────────────────────
//

/// The top-level phase state machine.
///
/// Phases only move forward; the single allowed excursion is `Do ⇄ Survey`.
/// Once Look or Think has been left it can never be re-entered, which the
/// trigger set below makes unrepresentable. The machine mutates nothing but
/// its own state; transcript side effects belong to whoever consumes the
/// session's events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseMachine {
    phase: Phase,
}

impl Default for PhaseMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseMachine {
    /// A fresh session starts in Look.
    #[must_use]
    pub fn new() -> Self {
        Self { phase: Phase::Look }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Look → Think, triggered by a granted last-section advance.
    ///
    /// # Errors
    ///
    /// Returns `PhaseError::InvalidTransition` outside Look.
    pub fn enter_think(&mut self) -> Result<(), PhaseError> {
        self.step(Phase::Look, Phase::Think, "enter_think")
    }

    /// Think → Do, triggered by a granted Think phase-advance.
    ///
    /// # Errors
    ///
    /// Returns `PhaseError::InvalidTransition` outside Think.
    pub fn enter_do(&mut self) -> Result<(), PhaseError> {
        self.step(Phase::Think, Phase::Do, "enter_do")
    }

    /// Do → Survey, triggered by the explicit "finish" action.
    ///
    /// # Errors
    ///
    /// Returns `PhaseError::InvalidTransition` outside Do.
    pub fn enter_survey(&mut self) -> Result<(), PhaseError> {
        self.step(Phase::Do, Phase::Survey, "enter_survey")
    }

    /// Survey → Do: submitting the survey returns the learner to the
    /// conclusion-writing state, never to Think or Look.
    ///
    /// # Errors
    ///
    /// Returns `PhaseError::InvalidTransition` outside Survey.
    pub fn leave_survey(&mut self) -> Result<(), PhaseError> {
        self.step(Phase::Survey, Phase::Do, "leave_survey")
    }

    /// Terminal transition, allowed from Do (skipping the survey) or from
    /// Survey (skipping submission).
    ///
    /// # Errors
    ///
    /// Returns `PhaseError::InvalidTransition` elsewhere.
    pub fn finish(&mut self) -> Result<(), PhaseError> {
        match self.phase {
            Phase::Do | Phase::Survey => {
                self.phase = Phase::Done;
                Ok(())
            }
            from => Err(PhaseError::InvalidTransition {
                from,
                trigger: "finish",
            }),
        }
    }

    fn step(&mut self, from: Phase, to: Phase, trigger: &'static str) -> Result<(), PhaseError> {
        if self.phase != from {
            return Err(PhaseError::InvalidTransition {
                from: self.phase,
                trigger,
            });
        }
        self.phase = to;
        Ok(())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_walks_all_phases() {
        let mut machine = PhaseMachine::new();
        assert_eq!(machine.phase(), Phase::Look);

        machine.enter_think().unwrap();
        machine.enter_do().unwrap();
        machine.enter_survey().unwrap();
        machine.leave_survey().unwrap();
        assert_eq!(machine.phase(), Phase::Do);

        machine.finish().unwrap();
        assert!(machine.phase().is_terminal());
    }

    #[test]
    fn look_and_think_cannot_be_reentered() {
        let mut machine = PhaseMachine::new();
        machine.enter_think().unwrap();

        // No trigger leads back to Look, and re-running the Look exit fails.
        assert!(machine.enter_think().is_err());

        machine.enter_do().unwrap();
        assert!(machine.enter_do().is_err());
        assert!(machine.enter_think().is_err());
    }

    #[test]
    fn survey_loop_returns_to_do_only() {
        let mut machine = PhaseMachine::new();
        machine.enter_think().unwrap();
        machine.enter_do().unwrap();

        machine.enter_survey().unwrap();
        machine.leave_survey().unwrap();
        assert_eq!(machine.phase(), Phase::Do);

        // The excursion is repeatable while in Do.
        machine.enter_survey().unwrap();
        assert_eq!(machine.phase(), Phase::Survey);
    }

    #[test]
    fn finish_is_allowed_from_do_and_survey_only() {
        let mut machine = PhaseMachine::new();
        assert!(machine.finish().is_err());

        machine.enter_think().unwrap();
        assert!(machine.finish().is_err());

        machine.enter_do().unwrap();
        machine.enter_survey().unwrap();
        machine.finish().unwrap();
        assert_eq!(machine.phase(), Phase::Done);

        // Done is terminal.
        assert!(machine.finish().is_err());
        assert!(machine.enter_survey().is_err());
    }

    #[test]
    fn survey_requires_do() {
        let mut machine = PhaseMachine::new();
        assert!(machine.enter_survey().is_err());
        assert!(machine.leave_survey().is_err());
    }
}
