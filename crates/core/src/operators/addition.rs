use rand::RngCore;

use super::{DifficultyConfig, DifficultyTable, OperandRange, OperatorRule};
use crate::model::{Difficulty, Operator, ProblemData};

/// `a + b`, both operands drawn independently from the difficulty's ranges.
#[derive(Debug, Clone)]
pub struct Addition {
    difficulties: DifficultyTable,
}

impl Addition {
    #[must_use]
    pub fn with_difficulties(difficulties: DifficultyTable) -> Self {
        Self { difficulties }
    }
}

impl Default for Addition {
    fn default() -> Self {
        Self::with_difficulties(DifficultyTable {
            easy: DifficultyConfig::new(OperandRange::new(1, 10), OperandRange::new(1, 10)),
            medium: DifficultyConfig::new(OperandRange::new(5, 50), OperandRange::new(5, 50)),
            hard: DifficultyConfig::new(OperandRange::new(50, 100), OperandRange::new(50, 100)),
        })
    }
}

impl OperatorRule for Addition {
    fn symbol(&self) -> Operator {
        Operator::Add
    }

    fn label(&self) -> &str {
        "Addition"
    }

    fn display_symbol(&self) -> &str {
        "➕"
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
            operator: Operator::Add,
            answer: (operand1 + operand2) as f64,
            difficulty,
        }
    }
}
