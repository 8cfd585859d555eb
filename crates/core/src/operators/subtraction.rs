use rand::RngCore;

use super::{DifficultyConfig, DifficultyTable, OperandRange, OperatorConstraints, OperatorRule};
use crate::model::{Difficulty, Operator, ProblemData};

const NON_NEGATIVE: OperatorConstraints = OperatorConstraints {
    allow_decimals: false,
    decimal_probability: 0.0,
    ensure_non_negative: true,
};

/// `a - b`. Easy and medium swap operands so the difference is never
/// negative; hard leaves them as drawn.
#[derive(Debug, Clone)]
pub struct Subtraction {
    difficulties: DifficultyTable,
}

impl Subtraction {
    #[must_use]
    pub fn with_difficulties(difficulties: DifficultyTable) -> Self {
        Self { difficulties }
    }
}

impl Default for Subtraction {
    fn default() -> Self {
        Self::with_difficulties(DifficultyTable {
            easy: DifficultyConfig::new(OperandRange::new(1, 10), OperandRange::new(1, 10))
                .with_constraints(NON_NEGATIVE),
            medium: DifficultyConfig::new(OperandRange::new(10, 50), OperandRange::new(10, 50))
                .with_constraints(NON_NEGATIVE),
            hard: DifficultyConfig::new(OperandRange::new(50, 100), OperandRange::new(50, 100)),
        })
    }
}

impl OperatorRule for Subtraction {
    fn symbol(&self) -> Operator {
        Operator::Subtract
    }

    fn label(&self) -> &str {
        "Subtraction"
    }

    fn display_symbol(&self) -> &str {
        "➖"
    }

    fn difficulties(&self) -> &DifficultyTable {
        &self.difficulties
    }

    fn generate(&self, difficulty: Difficulty, rng: &mut dyn RngCore) -> ProblemData {
        let config = self.config(difficulty);
        let mut operand1 = config.operand1.sample(rng);
        let mut operand2 = config.operand2.sample(rng);

        if config.constraints().ensure_non_negative && operand1 < operand2 {
            std::mem::swap(&mut operand1, &mut operand2);
        }

        ProblemData {
            operand1,
            operand2,
            operator: Operator::Subtract,
            answer: (operand1 - operand2) as f64,
            difficulty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators::tests::seeded;

    #[test]
    fn easy_and_medium_never_go_negative() {
        let rule = Subtraction::default();
        let mut rng = seeded(21);
        for difficulty in [Difficulty::Easy, Difficulty::Medium] {
            for _ in 0..100 {
                let data = rule.generate(difficulty, &mut rng);
                assert!(data.operand1 >= data.operand2);
                assert!(data.answer >= 0.0);
            }
        }
    }

    #[test]
    fn hard_keeps_drawn_order() {
        let rule = Subtraction::default();
        let mut rng = seeded(22);
        let mut saw_negative = false;
        for _ in 0..200 {
            let data = rule.generate(Difficulty::Hard, &mut rng);
            assert_eq!(data.answer, (data.operand1 - data.operand2) as f64);
            saw_negative |= data.answer < 0.0;
        }
        assert!(saw_negative);
    }
}
