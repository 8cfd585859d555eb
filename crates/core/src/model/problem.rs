use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::generator::format_answer;
use crate::model::ids::ProblemId;

/// Decorative labels attached to generated problems.
pub const SAFARI_ANIMALS: [&str; 12] = [
    "🦁", "🦒", "🦊", "🦘", "🦛", "🐘", "🦏", "🦬", "🦓", "🐆", "🦔", "🐪",
];

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown operator: {raw}")]
pub struct ParseOperatorError {
    raw: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown difficulty: {raw}")]
pub struct ParseDifficultyError {
    raw: String,
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Difficulty level; governs operand ranges and the final score multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ParseDifficultyError { raw: s.to_owned() }),
        }
    }
}

//
// ─── OPERATOR ──────────────────────────────────────────────────────────────────
//

/// Arithmetic operator. Serialized as its math symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
    #[serde(rename = "×")]
    Multiply,
    #[serde(rename = "÷")]
    Divide,
}

impl Operator {
    pub const ALL: [Operator; 4] = [
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Divide,
    ];

    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "×",
            Operator::Divide => "÷",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operator {
    type Err = ParseOperatorError;

    /// Accepts the math symbols plus ASCII stand-ins (`*`, `x`, `/`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "+" => Ok(Operator::Add),
            "-" => Ok(Operator::Subtract),
            "×" | "*" | "x" => Ok(Operator::Multiply),
            "÷" | "/" => Ok(Operator::Divide),
            _ => Err(ParseOperatorError { raw: s.to_owned() }),
        }
    }
}

//
// ─── PROBLEM ───────────────────────────────────────────────────────────────────
//

/// Numeric part of a problem, as produced by an operator rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProblemData {
    pub operand1: i64,
    pub operand2: i64,
    pub operator: Operator,
    pub answer: f64,
    pub difficulty: Difficulty,
}

/// A generated math problem. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    id: ProblemId,
    operand1: i64,
    operand2: i64,
    operator: Operator,
    answer: f64,
    difficulty: Difficulty,
    animal: String,
}

impl Problem {
    #[must_use]
    pub fn new(id: ProblemId, data: ProblemData, animal: impl Into<String>) -> Self {
        Self {
            id,
            operand1: data.operand1,
            operand2: data.operand2,
            operator: data.operator,
            answer: data.answer,
            difficulty: data.difficulty,
            animal: animal.into(),
        }
    }

    #[must_use]
    pub fn id(&self) -> ProblemId {
        self.id
    }

    #[must_use]
    pub fn operand1(&self) -> i64 {
        self.operand1
    }

    #[must_use]
    pub fn operand2(&self) -> i64 {
        self.operand2
    }

    #[must_use]
    pub fn operator(&self) -> Operator {
        self.operator
    }

    #[must_use]
    pub fn answer(&self) -> f64 {
        self.answer
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn animal(&self) -> &str {
        &self.animal
    }

    /// Question text, e.g. `7 × 8 = ?`.
    #[must_use]
    pub fn question(&self) -> String {
        format!("{} {} {} = ?", self.operand1, self.operator, self.operand2)
    }

    /// Answer formatted for display.
    #[must_use]
    pub fn answer_text(&self) -> String {
        format_answer(self.answer)
    }
}
