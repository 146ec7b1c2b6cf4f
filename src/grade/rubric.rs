#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use itertools::Itertools;

use super::step::Step;

/// Errors raised while constructing a rubric.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RubricError {
    /// The rubric has no steps.
    #[error("Rubric '{0}' has no steps.")]
    Empty(String),
    /// Two or more steps share an order key.
    #[error("Rubric '{rubric}' declares order key {order} more than once.")]
    DuplicateOrder {
        /// Name of the rubric.
        rubric: String,
        /// The repeated key.
        order:  u32,
    },
    /// A step has a blank description.
    #[error("Step {order} of rubric '{rubric}' has no description.")]
    MissingDescription {
        /// Name of the rubric.
        rubric: String,
        /// Order key of the offending step.
        order:  u32,
    },
}

/// An ordered, validated set of steps.
///
/// `C` is the session context every step of the rubric reads and writes.
pub struct Rubric<C> {
    /// Name shown in reports.
    name:  String,
    /// Steps sorted ascending by order key.
    steps: Vec<Step<C>>,
}

impl<C> Rubric<C> {
    /// Validates and orders `steps`.
    ///
    /// * `name`: name of the rubric, shown in reports
    /// * `steps`: steps in any declaration order
    pub fn new<I>(name: impl Into<String>, steps: I) -> Result<Self, RubricError>
    where
        I: IntoIterator<Item = Step<C>>,
    {
        let name = name.into();
        let steps = steps
            .into_iter()
            .sorted_by_key(Step::order)
            .collect::<Vec<_>>();

        if steps.is_empty() {
            return Err(RubricError::Empty(name));
        }

        if let Some(step) = steps
            .iter()
            .find(|s| s.description().trim().is_empty())
        {
            return Err(RubricError::MissingDescription {
                rubric: name,
                order:  step.order(),
            });
        }

        if let Some(order) = steps.iter().map(Step::order).duplicates().next() {
            return Err(RubricError::DuplicateOrder {
                rubric: name,
                order,
            });
        }

        Ok(Self { name, steps })
    }

    /// Name of the rubric.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Steps in execution order.
    pub fn steps(&self) -> &[Step<C>] {
        &self.steps
    }

    /// Sum of the steps' declared maxima.
    pub fn max_points(&self) -> f64 {
        self.steps.iter().fold(0.0, |acc, s| acc + s.out_of())
    }
}

impl<C> Clone for Rubric<C> {
    fn clone(&self) -> Self {
        Self {
            name:  self.name.clone(),
            steps: self.steps.clone(),
        }
    }
}

impl<C> std::fmt::Debug for Rubric<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rubric")
            .field("name", &self.name)
            .field("steps", &self.steps)
            .finish()
    }
}
