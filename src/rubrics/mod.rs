#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Concrete rubrics built on the grading engine.

/// The Bulma landing page assignment.
pub mod bulma;

pub use bulma::BulmaPage;
