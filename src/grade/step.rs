#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fmt;

use anyhow::Result;
use bon::Builder;

use super::ledger::Ledger;

/// What a step asks the session to do once it returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepFlow {
    /// Move on to the next step.
    Continue,
    /// Grading past this step is meaningless; skip every remaining step.
    Stop,
}

impl StepFlow {
    /// `Continue` when a prerequisite check passed, `Stop` otherwise.
    pub fn stop_unless(passed: bool) -> Self {
        if passed {
            StepFlow::Continue
        } else {
            StepFlow::Stop
        }
    }
}

/// Signature of a step body.
///
/// The body receives the rubric's session context and a [`Scorer`] it records
/// its own comments through. Returning `Err` is a step fault.
pub type StepFn<C> = fn(&mut C, &mut Scorer<'_>) -> Result<StepFlow>;

/// One ordered, independently scored check in a rubric.
#[derive(Builder)]
#[builder(on(String, into))]
pub struct Step<C> {
    /// Position of the step within its rubric, ascending.
    order:       u32,
    /// Human readable requirement, used verbatim as the default comment.
    description: String,
    /// Maximum points the step is expected to award. Informational only.
    #[builder(default)]
    out_of:      f64,
    /// The grading logic.
    body:        StepFn<C>,
}

impl<C> Step<C> {
    /// Order key of the step.
    pub fn order(&self) -> u32 {
        self.order
    }

    /// Requirement text of the step.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Informational maximum for the step.
    pub fn out_of(&self) -> f64 {
        self.out_of
    }

    /// Runs the body against `context`. Fault isolation lives in the
    /// executor, not here.
    pub(crate) fn call(&self, context: &mut C, scorer: &mut Scorer<'_>) -> Result<StepFlow> {
        (self.body)(context, scorer)
    }
}

impl<C> Clone for Step<C> {
    fn clone(&self) -> Self {
        Self {
            order:       self.order,
            description: self.description.clone(),
            out_of:      self.out_of,
            body:        self.body,
        }
    }
}

impl<C> fmt::Debug for Step<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("order", &self.order)
            .field("description", &self.description)
            .field("out_of", &self.out_of)
            .finish()
    }
}

/// The view of the ledger a running step gets.
///
/// Everything recorded here lands in the session's ledger immediately, so
/// comments added before a fault or a stop are kept.
pub struct Scorer<'a> {
    /// Ledger of the running session.
    ledger:      &'a mut Ledger,
    /// Description of the step being run.
    description: &'a str,
    /// Sum of the points this step has recorded so far.
    awarded:     f64,
}

impl<'a> Scorer<'a> {
    /// Creates a scorer recording into `ledger` on behalf of a step.
    pub(crate) fn new(ledger: &'a mut Ledger, description: &'a str) -> Self {
        Self {
            ledger,
            description,
            awarded: 0.0,
        }
    }

    /// Description of the step being run.
    pub fn description(&self) -> &str {
        self.description
    }

    /// Records `points` with the step's own description as the comment.
    pub fn award(&mut self, points: f64) {
        let text = self.description.to_string();
        self.comment(text, points);
    }

    /// Records `points` for the step's description when `passed`, zero
    /// otherwise, and hands `passed` back for chaining into a flow decision.
    pub fn award_if(&mut self, passed: bool, points: f64) -> bool {
        self.award(if passed { points } else { 0.0 });
        passed
    }

    /// Records an arbitrary comment.
    pub fn comment(&mut self, text: impl Into<String>, points: f64) {
        self.awarded += points;
        self.ledger.append(text, points);
    }

    /// Points this step has recorded so far.
    pub fn awarded(&self) -> f64 {
        self.awarded
    }
}
