#![forbid(unsafe_code)]
//! Domain model and pure game logic: problem generation, answer checking,
//! hints and scoring.

pub mod evaluator;
pub mod generator;
pub mod hints;
pub mod model;
pub mod operators;
pub mod scoring;
pub mod time;

pub use evaluator::{is_answer_correct, parse_answer};
pub use generator::{GenerateError, ProblemGenerator, format_answer};
pub use hints::generate_hint;
pub use operators::{OperatorRegistry, OperatorRule};
pub use scoring::{ScoreSummary, ScoringRules, apply_points, score_breakdown_lines};
pub use time::Clock;
