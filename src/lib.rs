//! # rubric
//!
//! A rubric-driven grader for single-document assignments. A rubric is an
//! ordered list of steps; each step inspects the document, records its own
//! partial credit, and may stop grading when a prerequisite fails. A step
//! that breaks is recorded as ungraded and the rest of the rubric still runs.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Environment driven settings for the grader binary
pub mod config;
/// Parsed documents and the query contract steps use
pub mod document;
/// The grading engine
pub mod grade;
/// Concrete rubrics
pub mod rubrics;

pub use document::{HtmlDocument, TreeQuery};
pub use grade::{Report, Rubric, Step, StepFlow};
