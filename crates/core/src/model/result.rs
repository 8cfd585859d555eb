use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::ProblemId;

/// Record of how a single problem was resolved.
///
/// Exactly one result exists per presented problem: either answered (right or
/// wrong) or skipped. Results are append-only and never edited afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemResult {
    pub problem_id: ProblemId,
    pub answered: bool,
    pub correct: bool,
    pub skipped: bool,
    pub hint_used: bool,
    #[serde(rename = "timeToAnswer")]
    pub time_to_answer_ms: u64,
    pub points_awarded: i32,
    pub timestamp: DateTime<Utc>,
}

impl ProblemResult {
    /// A submitted answer, scored or not.
    #[must_use]
    pub fn answered(
        problem_id: ProblemId,
        correct: bool,
        hint_used: bool,
        time_to_answer_ms: u64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            problem_id,
            answered: true,
            correct,
            skipped: false,
            hint_used,
            time_to_answer_ms,
            points_awarded: 0,
            timestamp,
        }
    }

    /// A skipped problem.
    #[must_use]
    pub fn skipped(
        problem_id: ProblemId,
        hint_used: bool,
        time_to_answer_ms: u64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            problem_id,
            answered: false,
            correct: false,
            skipped: true,
            hint_used,
            time_to_answer_ms,
            points_awarded: 0,
            timestamp,
        }
    }

    /// Returns the result with its point award filled in.
    #[must_use]
    pub fn with_points(mut self, points: i32) -> Self {
        self.points_awarded = points;
        self
    }
}
