use rand::{Rng, RngCore};

use super::{DifficultyConfig, DifficultyTable, OperandRange, OperatorConstraints, OperatorRule};
use crate::generator::round_to_hundredths;
use crate::model::{Difficulty, Operator, ProblemData};

/// Divisors that give short decimals: .5, .33, .25, .2.
const DECIMAL_DIVISORS: [i64; 4] = [2, 3, 4, 5];
const DECIMAL_DIVIDENDS: OperandRange = OperandRange::new(1, 20);

/// `a ÷ b`.
///
/// The difficulty ranges describe the quotient (`operand1`) and the divisor
/// (`operand2`); the dividend is derived so whole-number problems always
/// divide evenly. When decimals are allowed, a fraction of problems use a
/// small divisor with a dividend that is deliberately not a multiple of it.
#[derive(Debug, Clone)]
pub struct Division {
    difficulties: DifficultyTable,
}

impl Division {
    #[must_use]
    pub fn with_difficulties(difficulties: DifficultyTable) -> Self {
        Self { difficulties }
    }
}

impl Default for Division {
    fn default() -> Self {
        Self::with_difficulties(DifficultyTable {
            easy: DifficultyConfig::new(OperandRange::new(1, 5), OperandRange::new(1, 5)),
            medium: DifficultyConfig::new(OperandRange::new(2, 10), OperandRange::new(2, 10)),
            hard: DifficultyConfig::new(OperandRange::new(3, 12), OperandRange::new(3, 12))
                .with_constraints(OperatorConstraints {
                    allow_decimals: true,
                    decimal_probability: 0.3,
                    ensure_non_negative: false,
                }),
        })
    }
}

impl OperatorRule for Division {
    fn symbol(&self) -> Operator {
        Operator::Divide
    }

    fn label(&self) -> &str {
        "Division"
    }

    fn display_symbol(&self) -> &str {
        "➗"
    }

    fn difficulties(&self) -> &DifficultyTable {
        &self.difficulties
    }

    fn generate(&self, difficulty: Difficulty, rng: &mut dyn RngCore) -> ProblemData {
        let config = self.config(difficulty);
        let constraints = config.constraints();

        let (operand1, operand2, answer) =
            if constraints.allow_decimals && rng.random::<f64>() < constraints.decimal_probability {
                let divisor = DECIMAL_DIVISORS[rng.random_range(0..DECIMAL_DIVISORS.len())];
                let dividend = loop {
                    let candidate = DECIMAL_DIVIDENDS.sample(rng);
                    if candidate % divisor != 0 {
                        break candidate;
                    }
                };
                (
                    dividend,
                    divisor,
                    round_to_hundredths(dividend as f64 / divisor as f64),
                )
            } else {
                let quotient = config.operand1.sample(rng);
                let divisor = config.operand2.sample(rng);
                (quotient * divisor, divisor, quotient as f64)
            };

        ProblemData {
            operand1,
            operand2,
            operator: Operator::Divide,
            answer,
            difficulty,
        }
    }
}
