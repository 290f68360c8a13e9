use chrono::{DateTime, Utc};
use std::fmt;

use ltd_core::gate::{GateConfig, ProgressionGate};
use ltd_core::model::{InteractionLedger, ItemPosition, Module, SessionId};
use ltd_core::phase::{Phase, PhaseMachine};
use ltd_core::section::Section;

use super::progress::SessionProgress;
use crate::error::SessionError;

//
// ─── EVENTS & OUTCOMES ─────────────────────────────────────────────────────────
//

/// Emitted by the session for the UI layer to consume.
///
/// Phase transitions and section entries are announced through these rather
/// than by the session writing to a transcript itself; see
/// [`super::workflow::announcement`] for the canned texts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    PhaseEntered(Phase),
    SectionEntered(usize),
    ConclusionSaved,
    SurveySubmitted,
}

/// Outcome of a navigation or phase-advance request.
///
/// `Denied` is an expected, frequent result and deliberately not an error: a
/// denied request leaves position, phase, and ledger untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Moved to another section within Look.
    SectionChanged {
        section_index: usize,
        position: ItemPosition,
    },
    /// Entered a new phase.
    PhaseChanged(Phase),
    Denied,
}

impl AdvanceOutcome {
    #[must_use]
    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Denied)
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory learning session over one module.
///
/// Owns every piece of mutable per-session state: position, phase machine,
/// interaction ledger, conclusion draft, and the pending event buffer. All
/// mutation goes through `&mut self`, which gives the single-writer
/// discipline the ledger needs: a navigation that reads counts and resets
/// them can never interleave with an exchange being recorded.
pub struct SessionService {
    id: SessionId,
    module: Module,
    gate: ProgressionGate,
    phases: PhaseMachine,
    ledger: InteractionLedger,
    position: ItemPosition,
    think_exchanges: u32,
    conclusion: Option<String>,
    conclusion_saved: bool,
    started_at: DateTime<Utc>,
    events: Vec<SessionEvent>,
}

impl SessionService {
    /// Creates a session positioned at the first item of the first section.
    ///
    /// The module has already been validated and normalized by
    /// [`Module::new`]; a malformed module never reaches this point.
    ///
    /// `started_at` should come from the services layer clock to keep time
    /// deterministic.
    #[must_use]
    pub fn new(module: Module, config: GateConfig, started_at: DateTime<Utc>) -> Self {
        let mut ledger = InteractionLedger::new();
        // Entering section 0 for the first time.
        ledger.reset_section(0);

        Self {
            id: SessionId::random(),
            module,
            gate: ProgressionGate::new(config),
            phases: PhaseMachine::new(),
            ledger,
            position: ItemPosition::first(),
            think_exchanges: 0,
            conclusion: None,
            conclusion_saved: false,
            started_at,
            events: Vec::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn module(&self) -> &Module {
        &self.module
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phases.phase()
    }

    #[must_use]
    pub fn position(&self) -> ItemPosition {
        self.position
    }

    #[must_use]
    pub fn ledger(&self) -> &InteractionLedger {
        &self.ledger
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn think_exchanges(&self) -> u32 {
        self.think_exchanges
    }

    #[must_use]
    pub fn conclusion(&self) -> Option<&str> {
        self.conclusion.as_deref()
    }

    #[must_use]
    pub fn conclusion_saved(&self) -> bool {
        self.conclusion_saved
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.phases.phase().is_terminal()
    }

    /// Section owning the learner's current position.
    #[must_use]
    pub fn current_section(&self) -> Section {
        self.module.section_at(self.position)
    }

    /// Drains the pending events in emission order.
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    //
    // ─── LEDGER UPDATES ────────────────────────────────────────────────────────
    //

    /// Records one completed user/assistant exchange against the current
    /// phase: the current Look section, or the cumulative Think counter. Do
    /// and later phases are not volume-gated, so nothing is counted there.
    pub fn record_exchange(&mut self) {
        match self.phases.phase() {
            Phase::Look => {
                let section = self.current_section();
                self.ledger.record_exchange(section.index);
            }
            Phase::Think => {
                self.think_exchanges = self.think_exchanges.saturating_add(1);
            }
            Phase::Do | Phase::Survey | Phase::Done => {}
        }
    }

    /// Whether the current section has enough recorded exchanges to justify
    /// an engagement evaluation. Only meaningful in Look.
    #[must_use]
    pub fn needs_engagement_check(&self) -> bool {
        self.phases.phase() == Phase::Look
            && self
                .gate
                .should_evaluate_engagement(&self.ledger, self.current_section().index)
    }

    /// Applies an evaluator verdict for an item position.
    ///
    /// Sticky, last write wins. Safe to call with a position the learner has
    /// since left: the stale flag is stored but the gate only ever consults
    /// the flag for the current position.
    pub fn apply_engagement(&mut self, position: ItemPosition, engaged: bool) {
        self.ledger.set_engagement(position, engaged);
    }

    //
    // ─── NAVIGATION ────────────────────────────────────────────────────────────
    //

    /// Requests a forward move in Look.
    ///
    /// Mid-module the learner lands on the next boundary's first item and the
    /// destination counter resets; from the last section a granted request
    /// leaves Look for Think instead.
    pub fn advance_section(&mut self) -> AdvanceOutcome {
        if self.phases.phase() != Phase::Look {
            return AdvanceOutcome::Denied;
        }
        let section = self.current_section();
        if !self
            .gate
            .look_advance(&self.ledger, section, self.position)
            .is_granted()
        {
            return AdvanceOutcome::Denied;
        }

        if section.index == self.module.last_section_index() {
            if self.phases.enter_think().is_err() {
                return AdvanceOutcome::Denied;
            }
            self.events.push(SessionEvent::PhaseEntered(Phase::Think));
            return AdvanceOutcome::PhaseChanged(Phase::Think);
        }

        let next = self.module.sections()[section.index + 1];
        self.enter_section(next)
    }

    /// Requests a backward move in Look. No exchange condition; denied only
    /// at section 0.
    pub fn regress_section(&mut self) -> AdvanceOutcome {
        if self.phases.phase() != Phase::Look {
            return AdvanceOutcome::Denied;
        }
        let section = self.current_section();
        if !self.gate.look_regress(section).is_granted() {
            return AdvanceOutcome::Denied;
        }

        let previous = self.module.sections()[section.index - 1];
        self.enter_section(previous)
    }

    fn enter_section(&mut self, section: Section) -> AdvanceOutcome {
        self.position = ItemPosition::from_boundary(section.start);
        self.ledger.reset_section(section.index);
        self.events.push(SessionEvent::SectionEntered(section.index));
        AdvanceOutcome::SectionChanged {
            section_index: section.index,
            position: self.position,
        }
    }

    //
    // ─── PHASE REQUESTS ────────────────────────────────────────────────────────
    //

    /// Requests Think → Do once the cumulative exchange threshold is met.
    pub fn advance_phase(&mut self) -> AdvanceOutcome {
        if self.phases.phase() != Phase::Think {
            return AdvanceOutcome::Denied;
        }
        if !self.gate.think_advance(self.think_exchanges).is_granted() {
            return AdvanceOutcome::Denied;
        }
        if self.phases.enter_do().is_err() {
            return AdvanceOutcome::Denied;
        }
        self.events.push(SessionEvent::PhaseEntered(Phase::Do));
        AdvanceOutcome::PhaseChanged(Phase::Do)
    }

    /// Stores and marks the conclusion draft as saved.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::WrongPhase` outside Do.
    pub fn save_conclusion(&mut self, text: impl Into<String>) -> Result<(), SessionError> {
        if self.phases.phase() != Phase::Do {
            return Err(SessionError::WrongPhase(self.phases.phase()));
        }
        self.conclusion = Some(text.into());
        self.conclusion_saved = true;
        self.events.push(SessionEvent::ConclusionSaved);
        Ok(())
    }

    /// Requests Do → Survey; available only once a conclusion has been saved.
    pub fn request_survey(&mut self) -> AdvanceOutcome {
        if self.phases.phase() != Phase::Do || !self.conclusion_saved {
            return AdvanceOutcome::Denied;
        }
        if self.phases.enter_survey().is_err() {
            return AdvanceOutcome::Denied;
        }
        self.events.push(SessionEvent::PhaseEntered(Phase::Survey));
        AdvanceOutcome::PhaseChanged(Phase::Survey)
    }

    /// Submits the survey, returning the learner to the conclusion-writing
    /// state. Unconditional while in Survey.
    pub fn submit_survey(&mut self) -> AdvanceOutcome {
        if self.phases.leave_survey().is_err() {
            return AdvanceOutcome::Denied;
        }
        self.events.push(SessionEvent::SurveySubmitted);
        AdvanceOutcome::PhaseChanged(Phase::Do)
    }

    /// Ends the session: from Survey (skipping submission) or from Do
    /// (skipping the survey, once the conclusion is saved).
    pub fn finish(&mut self) -> AdvanceOutcome {
        if self.phases.phase() == Phase::Do && !self.conclusion_saved {
            return AdvanceOutcome::Denied;
        }
        if self.phases.finish().is_err() {
            return AdvanceOutcome::Denied;
        }
        self.events.push(SessionEvent::PhaseEntered(Phase::Done));
        AdvanceOutcome::PhaseChanged(Phase::Done)
    }

    //
    // ─── PROGRESS VIEW ─────────────────────────────────────────────────────────
    //

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let phase = self.phases.phase();
        let section = self.current_section();
        let can_advance = match phase {
            Phase::Look => self
                .gate
                .look_advance(&self.ledger, section, self.position)
                .is_granted(),
            Phase::Think => self.gate.think_advance(self.think_exchanges).is_granted(),
            Phase::Do => self.conclusion_saved,
            Phase::Survey => true,
            Phase::Done => false,
        };
        let can_regress = phase == Phase::Look && self.gate.look_regress(section).is_granted();

        SessionProgress {
            phase,
            section_index: section.index,
            section_count: self.module.section_count(),
            exchanges_in_section: self.ledger.exchanges_in(section.index),
            engaged: self.ledger.is_engaged(self.position),
            can_advance,
            can_regress,
            think_exchanges: self.think_exchanges,
            conclusion_saved: self.conclusion_saved,
        }
    }
}

impl fmt::Debug for SessionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionService")
            .field("id", &self.id)
            .field("module_id", &self.module.id())
            .field("phase", &self.phases.phase())
            .field("position", &self.position)
            .field("think_exchanges", &self.think_exchanges)
            .field("conclusion_saved", &self.conclusion_saved)
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
