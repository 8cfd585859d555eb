use rand::RngCore;

use super::{DifficultyConfig, DifficultyTable, OperandRange, OperatorRule};
use crate::model::{Difficulty, Operator, ProblemData};

/// `a × b`, both factors drawn independently from the difficulty's ranges.
#[derive(Debug, Clone)]
pub struct Multiplication {
    difficulties: DifficultyTable,
}

impl Multiplication {
    #[must_use]
    pub fn with_difficulties(difficulties: DifficultyTable) -> Self {
        Self { difficulties }
    }
}

impl Default for Multiplication {
    fn default() -> Self {
        Self::with_difficulties(DifficultyTable {
            easy: DifficultyConfig::new(OperandRange::new(1, 5), OperandRange::new(1, 5)),
            medium: DifficultyConfig::new(OperandRange::new(2, 10), OperandRange::new(2, 10)),
            hard: DifficultyConfig::new(OperandRange::new(5, 50), OperandRange::new(5, 50)),
        })
    }
}

impl OperatorRule for Multiplication {
    fn symbol(&self) -> Operator {
        Operator::Multiply
    }

    fn label(&self) -> &str {
        "Multiplication"
    }

    fn display_symbol(&self) -> &str {
        "✖️"
    }

    fn difficulties(&self) -> &DifficultyTable {
        &self.difficulties
    }

    fn generate(&self, difficulty: Difficulty, rng: &mut dyn RngCore) -> ProblemData {
        let config = self.config(difficulty);
        let operand1 = config.operand1.sample(rng);
        let operand2 = config.operand2.sample(rng);

        ProblemData {
            operand1,
            operand2,
            operator: Operator::Multiply,
            answer: (operand1 * operand2) as f64,
            difficulty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators::tests::seeded;

    #[test]
    fn easy_factors_stay_small() {
        let rule = Multiplication::default();
        let mut rng = seeded(5);
        for _ in 0..50 {
            let data = rule.generate(Difficulty::Easy, &mut rng);
            assert!((1..=5).contains(&data.operand1));
            assert!((1..=5).contains(&data.operand2));
            assert_eq!(data.answer, (data.operand1 * data.operand2) as f64);
        }
    }
}
