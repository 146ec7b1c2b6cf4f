#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use serde::{Deserialize, Serialize};
use tabled::Tabled;

use super::report::Report;

#[derive(Tabled, Clone, Debug, PartialEq, Serialize, Deserialize)]
/// One line item contributing to the final score
pub struct CommentEntry {
    #[tabled(rename = "Comment")]
    /// * `text`: the comment shown to the student
    pub(crate) text:   String,
    #[tabled(rename = "Points", display = "display_points")]
    /// * `points`: points awarded with this comment
    pub(crate) points: f64,
}

impl CommentEntry {
    /// Creates a new entry.
    pub fn new(text: impl Into<String>, points: f64) -> Self {
        Self {
            text: text.into(),
            points,
        }
    }

    /// Comment text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Points awarded.
    pub fn points(&self) -> f64 {
        self.points
    }
}

/// Formats points the same way everywhere they are shown.
pub(crate) fn display_points(points: &f64) -> String {
    format!("{points:.2}")
}

/// Append-only record of the comments produced during one session.
#[derive(Debug, Default, Clone)]
pub struct Ledger {
    /// Entries in the order they were appended.
    entries: Vec<CommentEntry>,
}

impl Ledger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a comment. Point values are not validated.
    pub fn append(&mut self, text: impl Into<String>, points: f64) {
        self.entries.push(CommentEntry::new(text, points));
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[CommentEntry] {
        &self.entries
    }

    /// Sum of all recorded points; `0.0` when nothing was recorded.
    pub fn total(&self) -> f64 {
        // `Sum for f64` starts at -0.0, which would print as "-0.00".
        self.entries.iter().fold(0.0, |acc, e| acc + e.points)
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consumes the ledger into a report. The total is computed here, once.
    ///
    /// * `rubric`: name of the rubric that produced the entries
    /// * `out_of`: informational maximum of the rubric
    /// * `stopped`: whether the session halted early
    pub fn into_report(self, rubric: impl Into<String>, out_of: f64, stopped: bool) -> Report {
        let total = self.total();
        Report::builder()
            .rubric(rubric)
            .entries(self.entries)
            .total(total)
            .out_of(out_of)
            .stopped(stopped)
            .build()
    }
}
