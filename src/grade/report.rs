#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fmt::{self, Display};

use anyhow::{Context, Result};
use bon::Builder;
use serde::{Deserialize, Serialize};
use tabled::{
    Table,
    settings::{Alignment, Modify, Panel, Style, Width, object::Rows},
};

use super::{gradescope::GradescopeSubmission, ledger::CommentEntry};

/// Width of the separator line in the banner rendering.
const BANNER_WIDTH: usize = 40;

/// Final result of a grading session.
#[derive(Clone, Debug, Builder, Serialize, Deserialize)]
#[builder(on(String, into))]
pub struct Report {
    /// Name of the rubric that produced this report.
    rubric:  String,
    /// Comment entries in the order they were recorded.
    #[builder(default)]
    entries: Vec<CommentEntry>,
    /// Sum of entry points, computed once when the report was built.
    total:   f64,
    /// Sum of the rubric's declared step maxima. Informational only.
    #[builder(default)]
    out_of:  f64,
    /// Whether a step halted grading before the last step.
    #[builder(default)]
    stopped: bool,
}

impl Report {
    /// Name of the rubric.
    pub fn rubric(&self) -> &str {
        &self.rubric
    }

    /// Entries in display and summation order.
    pub fn entries(&self) -> &[CommentEntry] {
        &self.entries
    }

    /// Total score.
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Declared maximum of the rubric.
    pub fn out_of(&self) -> f64 {
        self.out_of
    }

    /// Whether grading stopped early.
    pub fn stopped(&self) -> bool {
        self.stopped
    }

    /// Renders the entries as a table with a header and a total footer.
    pub fn table(&self) -> String {
        Table::new(&self.entries)
            .with(Panel::header(format!("Grading Overview: {}", self.rubric)))
            .with(Panel::footer(format!("Total: {:.2}/{:.2}", self.total, self.out_of)))
            .with(Modify::new(Rows::new(1..)).with(Width::wrap(60).keep_words(true)))
            .with(
                Modify::new(Rows::first())
                    .with(Alignment::center())
                    .with(Alignment::center_vertical()),
            )
            .with(
                Modify::new(Rows::last())
                    .with(Alignment::center())
                    .with(Alignment::center_vertical()),
            )
            .with(Style::modern())
            .to_string()
    }

    /// Converts the report into a Gradescope `results.json` payload.
    pub fn to_gradescope(&self) -> GradescopeSubmission {
        GradescopeSubmission::from(self)
    }

    /// Serializes the Gradescope payload as pretty-printed JSON.
    pub fn to_gradescope_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.to_gradescope())
            .context("Failed to serialize report to Gradescope JSON")
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(BANNER_WIDTH);
        for entry in &self.entries {
            writeln!(f, "{rule}")?;
            writeln!(f, "[{:.2} points] {}", entry.points(), entry.text())?;
        }
        writeln!(f, "{rule}")?;
        writeln!(f, "TOTAL GRADE {:.2}", self.total)?;
        write!(f, "{rule}")
    }
}
