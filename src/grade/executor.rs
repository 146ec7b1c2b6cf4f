#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
};

use tracing::{debug, error};

use super::{
    ledger::Ledger,
    step::{Scorer, Step, StepFlow},
};

/// Marker appended to a step's description when the step faulted.
pub const UNGRADED_MARKER: &str = "(unable to grade)";

/// Result of executing one step.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The step finished and recorded a positive amount of points.
    Passed {
        /// Points the step recorded.
        points: f64,
    },
    /// The step finished without recording any points.
    Failed,
    /// The step faulted. The session records `comment` for zero points.
    Errored {
        /// Comment to record in place of the step's own result.
        comment:    String,
        /// What went wrong; logged, never shown in the report.
        diagnostic: String,
    },
    /// The step asked for every remaining step to be skipped.
    Stopped,
}

impl Outcome {
    /// Whether this outcome halts the session.
    pub fn is_stop(&self) -> bool {
        matches!(self, Outcome::Stopped)
    }
}

/// Runs one step against the shared context.
///
/// Comments the step records go straight into `ledger`, including the ones
/// recorded before a fault or a stop. An `Err` returned by the body and a
/// panic raised inside it are both turned into [`Outcome::Errored`].
pub fn execute<C>(step: &Step<C>, context: &mut C, ledger: &mut Ledger) -> Outcome {
    let mut scorer = Scorer::new(ledger, step.description());
    let result = panic::catch_unwind(AssertUnwindSafe(|| step.call(context, &mut scorer)));
    let awarded = scorer.awarded();

    let diagnostic = match result {
        Ok(Ok(StepFlow::Stop)) => {
            debug!(step = step.order(), "step stopped grading");
            return Outcome::Stopped;
        }
        Ok(Ok(StepFlow::Continue)) if awarded > 0.0 => {
            return Outcome::Passed { points: awarded };
        }
        Ok(Ok(StepFlow::Continue)) => return Outcome::Failed,
        Ok(Err(err)) => format!("{err:?}"),
        Err(payload) => panic_message(payload.as_ref()),
    };

    error!(
        step = step.order(),
        description = step.description(),
        "step could not be graded: {diagnostic}"
    );

    Outcome::Errored {
        comment: format!("{} {UNGRADED_MARKER}", step.description()),
        diagnostic,
    }
}

/// Extracts a readable message from a panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panicked: {message}")
    } else {
        "panicked with a non-string payload".to_string()
    }
}
