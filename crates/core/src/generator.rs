//! Problem generation on top of the operator registry.

use rand::Rng;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::model::{Difficulty, Operator, Problem, ProblemId, SAFARI_ANIMALS};
use crate::operators::OperatorRegistry;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GenerateError {
    #[error("no operators selected")]
    NoOperators,

    #[error("operator {0} has no registered rule")]
    UnregisteredOperator(Operator),
}

/// Builds problems from a shared, read-only operator registry.
#[derive(Debug, Clone)]
pub struct ProblemGenerator {
    registry: Arc<OperatorRegistry>,
}

impl ProblemGenerator {
    #[must_use]
    pub fn new(registry: Arc<OperatorRegistry>) -> Self {
        Self { registry }
    }

    /// Generator over the four built-in operator rules.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(Arc::new(OperatorRegistry::builtin()))
    }

    #[must_use]
    pub fn registry(&self) -> &OperatorRegistry {
        &self.registry
    }

    /// Generate one problem for `difficulty`, picking the operator uniformly
    /// from `operators`.
    ///
    /// # Errors
    ///
    /// Returns `GenerateError::NoOperators` when `operators` is empty and
    /// `GenerateError::UnregisteredOperator` when the picked operator has no
    /// rule in the registry.
    pub fn generate<R: Rng>(
        &self,
        difficulty: Difficulty,
        operators: &[Operator],
        rng: &mut R,
    ) -> Result<Problem, GenerateError> {
        if operators.is_empty() {
            return Err(GenerateError::NoOperators);
        }

        let operator = operators[rng.random_range(0..operators.len())];
        let rule = self
            .registry
            .get(operator)
            .ok_or(GenerateError::UnregisteredOperator(operator))?;

        let data = rule.generate(difficulty, &mut *rng);

        let mut id_bytes = [0u8; 16];
        rng.fill_bytes(&mut id_bytes);
        let animal = SAFARI_ANIMALS[rng.random_range(0..SAFARI_ANIMALS.len())];

        let problem = Problem::new(ProblemId::from_random_bytes(id_bytes), data, animal);
        debug!(
            problem_id = %problem.id(),
            question = %problem.question(),
            %difficulty,
            "generated problem"
        );
        Ok(problem)
    }
}

impl Default for ProblemGenerator {
    fn default() -> Self {
        Self::builtin()
    }
}

pub(crate) fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Render an answer for display: integers without a decimal point, anything
/// else rounded to two decimals with trailing zeros dropped.
#[must_use]
pub fn format_answer(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value}")
    } else {
        format!("{}", round_to_hundredths(value))
    }
}
