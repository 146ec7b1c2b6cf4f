#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! The grading engine: ordered steps, fault isolation, and score
//! accumulation. Nothing in here knows what kind of document is graded.

/// Runs a single step and classifies what happened.
pub mod executor;
/// Gradescope `results.json` payloads.
pub mod gradescope;
/// Comment accumulation.
pub mod ledger;
/// Final report and its renderings.
pub mod report;
/// Step registration and ordering.
pub mod rubric;
/// Session state machine.
pub mod session;
/// Step definitions.
pub mod step;

pub use executor::{Outcome, UNGRADED_MARKER, execute};
pub use gradescope::{
    GradescopeOutputFormat, GradescopeStatus, GradescopeSubmission, GradescopeTestCase,
    GradescopeVisibility,
};
pub use ledger::{CommentEntry, Ledger};
pub use report::Report;
pub use rubric::{Rubric, RubricError};
pub use session::{Session, SessionState};
pub use step::{Scorer, Step, StepFlow, StepFn};

/// Grades `context` against `rubric` in a fresh session.
pub fn run<C>(rubric: &Rubric<C>, context: &mut C) -> Report {
    Session::new(rubric).run(context)
}
