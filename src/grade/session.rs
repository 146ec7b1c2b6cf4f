#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use tracing::{debug, debug_span, info};

use super::{
    executor::{Outcome, execute},
    ledger::Ledger,
    report::Report,
    rubric::Rubric,
};

/// Where a session is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Steps are still being executed.
    Running,
    /// A step halted grading; the remaining steps are skipped.
    Stopped,
    /// No more steps will run.
    Complete,
}

/// Grades one context against one rubric.
///
/// A session owns its ledger; run another session for another document.
#[derive(Debug)]
pub struct Session<'r, C> {
    /// Rubric being applied.
    rubric: &'r Rubric<C>,
    /// Comments recorded so far.
    ledger: Ledger,
    /// Current state.
    state:  SessionState,
}

impl<'r, C> Session<'r, C> {
    /// Creates a session in the `Running` state with an empty ledger.
    pub fn new(rubric: &'r Rubric<C>) -> Self {
        Self {
            rubric,
            ledger: Ledger::new(),
            state: SessionState::Running,
        }
    }

    /// Current state of the session.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Comments recorded so far.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Runs every step in order against `context` and returns the report.
    ///
    /// The session is `Complete` afterwards; running it again executes no
    /// steps and yields an empty report.
    pub fn run(&mut self, context: &mut C) -> Report {
        let rubric = self.rubric;
        let _span = debug_span!("grade", rubric = rubric.name()).entered();

        for step in rubric.steps() {
            if self.state != SessionState::Running {
                break;
            }
            let outcome = execute(step, context, &mut self.ledger);
            self.advance(outcome);
        }
        let stopped = self.state == SessionState::Stopped;
        self.state = SessionState::Complete;

        let ledger = std::mem::take(&mut self.ledger);
        let report = ledger.into_report(rubric.name(), rubric.max_points(), stopped);
        info!(
            rubric = report.rubric(),
            total = report.total(),
            entries = report.entries().len(),
            "grading complete"
        );
        report
    }

    /// Applies one outcome to the session state.
    fn advance(&mut self, outcome: Outcome) {
        debug!(?outcome, "step finished");
        match outcome {
            Outcome::Stopped => self.state = SessionState::Stopped,
            Outcome::Errored { comment, .. } => self.ledger.append(comment, 0.0),
            Outcome::Passed { .. } | Outcome::Failed => {}
        }
    }
}
