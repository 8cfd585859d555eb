//! Point awards and the end-of-session score breakdown.
//!
//! Scoring is a pure function of a `ScoringRules` value and the recorded
//! results. The free functions use `ScoringRules::STANDARD`.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{Difficulty, ProblemResult};

const MS_PER_MINUTE: f64 = 60_000.0;

/// Point values, thresholds and multipliers used by the scoring engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringRules {
    pub correct_answer: i32,
    pub skip_penalty: i32,
    pub hint_penalty: i32,
    pub time_bonus_fast: i32,
    pub time_bonus_quick: i32,
    /// Answers strictly faster than this earn `time_bonus_fast`.
    pub fast_threshold_ms: u64,
    /// Answers strictly faster than this earn `time_bonus_quick`.
    pub quick_threshold_ms: u64,
    /// Hints allowed per minute of session time before penalties apply.
    pub excess_hint_threshold: f64,
    /// Penalty per hint beyond the allowance.
    pub excess_hint_penalty: i32,
    pub easy_multiplier: f64,
    pub medium_multiplier: f64,
    pub hard_multiplier: f64,
}

impl ScoringRules {
    pub const STANDARD: ScoringRules = ScoringRules {
        correct_answer: 10,
        skip_penalty: 5,
        hint_penalty: 2,
        time_bonus_fast: 2,
        time_bonus_quick: 1,
        fast_threshold_ms: 2_000,
        quick_threshold_ms: 3_000,
        excess_hint_threshold: 2.0,
        excess_hint_penalty: 3,
        easy_multiplier: 0.66,
        medium_multiplier: 1.0,
        hard_multiplier: 1.5,
    };

    #[must_use]
    pub fn multiplier(&self, difficulty: Difficulty) -> f64 {
        match difficulty {
            Difficulty::Easy => self.easy_multiplier,
            Difficulty::Medium => self.medium_multiplier,
            Difficulty::Hard => self.hard_multiplier,
        }
    }

    /// Speed bonus for a correct answer given in `time_to_answer_ms`.
    #[must_use]
    pub fn speed_bonus(&self, time_to_answer_ms: u64) -> i32 {
        if time_to_answer_ms < self.fast_threshold_ms {
            self.time_bonus_fast
        } else if time_to_answer_ms < self.quick_threshold_ms {
            self.time_bonus_quick
        } else {
            0
        }
    }

    /// Points for one resolved problem. Skips are negative, wrong answers zero.
    #[must_use]
    pub fn problem_points(&self, result: &ProblemResult, hint_used: bool) -> i32 {
        if result.skipped {
            return -self.skip_penalty;
        }
        if !result.correct {
            return 0;
        }

        let mut points = self.correct_answer;
        if hint_used {
            points -= self.hint_penalty;
        }
        points + self.speed_bonus(result.time_to_answer_ms)
    }

    /// Number of hints beyond the per-minute allowance.
    ///
    /// Sessions shorter than a minute are treated as one minute.
    #[must_use]
    pub fn excess_hints(&self, hint_count: usize, session_duration_ms: u64) -> usize {
        if hint_count == 0 {
            return 0;
        }
        let minutes = (session_duration_ms as f64 / MS_PER_MINUTE).max(1.0);
        let allowed = (minutes * self.excess_hint_threshold).floor() as usize;
        hint_count.saturating_sub(allowed)
    }

    /// Full breakdown over a session's results.
    ///
    /// Skip penalties are applied to `base_points` one at a time and never
    /// take it below zero.
    #[must_use]
    pub fn score_summary(
        &self,
        results: &[ProblemResult],
        hint_timestamps: &[DateTime<Utc>],
        difficulty: Difficulty,
        session_duration_ms: u64,
    ) -> ScoreSummary {
        let mut base_points = 0;
        let mut time_bonus_points = 0;
        let mut hint_penalty = 0;
        let mut correct_count = 0;
        let mut skipped_count = 0;

        for result in results {
            if result.skipped {
                skipped_count += 1;
                base_points = (base_points - self.skip_penalty).max(0);
            } else if result.correct {
                correct_count += 1;
                base_points += self.correct_answer;
                if result.hint_used {
                    hint_penalty += self.hint_penalty;
                }
                time_bonus_points += self.speed_bonus(result.time_to_answer_ms);
            }
        }

        let excess = self.excess_hints(hint_timestamps.len(), session_duration_ms);
        let excess_hint_penalty = excess as i32 * self.excess_hint_penalty;

        let subtotal =
            (base_points + time_bonus_points - hint_penalty - excess_hint_penalty).max(0);
        let difficulty_multiplier = self.multiplier(difficulty);
        let final_score = (f64::from(subtotal) * difficulty_multiplier).round() as i32;

        ScoreSummary {
            base_points,
            time_bonus_points,
            hint_penalty,
            excess_hint_penalty,
            subtotal,
            difficulty_multiplier,
            final_score,
            problems_attempted: results.len(),
            correct_count,
            skipped_count,
            hints_used: hint_timestamps.len(),
        }
    }
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self::STANDARD
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSummary {
    pub base_points: i32,
    pub time_bonus_points: i32,
    pub hint_penalty: i32,
    pub excess_hint_penalty: i32,
    pub subtotal: i32,
    pub difficulty_multiplier: f64,
    pub final_score: i32,
    pub problems_attempted: usize,
    pub correct_count: usize,
    pub skipped_count: usize,
    pub hints_used: usize,
}

/// Add `points` to a running score, flooring at zero.
#[must_use]
pub fn apply_points(score: i32, points: i32) -> i32 {
    score.saturating_add(points).max(0)
}

#[must_use]
pub fn calculate_problem_points(result: &ProblemResult, hint_used: bool) -> i32 {
    ScoringRules::STANDARD.problem_points(result, hint_used)
}

#[must_use]
pub fn calculate_excess_hints(hint_count: usize, session_duration_ms: u64) -> usize {
    ScoringRules::STANDARD.excess_hints(hint_count, session_duration_ms)
}

#[must_use]
pub fn calculate_score_summary(
    results: &[ProblemResult],
    hint_timestamps: &[DateTime<Utc>],
    difficulty: Difficulty,
    session_duration_ms: u64,
) -> ScoreSummary {
    ScoringRules::STANDARD.score_summary(results, hint_timestamps, difficulty, session_duration_ms)
}

/// Human-readable breakdown, one line per item. Zero-valued optional items
/// (skips, time bonus, hints, excess penalty) are left out.
#[must_use]
pub fn score_breakdown_lines(summary: &ScoreSummary, rules: &ScoringRules) -> Vec<String> {
    let mut lines = vec![
        format!("Problems Attempted: {}", summary.problems_attempted),
        format!(
            "Correct Answers: {} (+{} base points)",
            summary.correct_count, summary.base_points
        ),
    ];

    if summary.skipped_count > 0 {
        lines.push(format!(
            "Skipped: {} (-{} points)",
            summary.skipped_count,
            summary.skipped_count as i64 * i64::from(rules.skip_penalty)
        ));
    }
    if summary.time_bonus_points > 0 {
        lines.push(format!("Time Bonus: +{} points", summary.time_bonus_points));
    }
    if summary.hints_used > 0 {
        lines.push(format!(
            "Hints Used: {} (-{} points)",
            summary.hints_used, summary.hint_penalty
        ));
    }
    if summary.excess_hint_penalty > 0 {
        lines.push(format!(
            "Excess Hint Penalty: -{} points",
            summary.excess_hint_penalty
        ));
    }

    lines.push(format!("Subtotal: {} points", summary.subtotal));
    lines.push(format!(
        "Difficulty Multiplier: ×{}",
        summary.difficulty_multiplier
    ));
    lines.push(format!("Final Score: {} points", summary.final_score));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProblemId;
    use crate::time::fixed_now;
    use proptest::prelude::*;

    fn correct(ms: u64, hint_used: bool) -> ProblemResult {
        ProblemResult::answered(ProblemId::new_v4(), true, hint_used, ms, fixed_now())
    }

    fn wrong(ms: u64) -> ProblemResult {
        ProblemResult::answered(ProblemId::new_v4(), false, false, ms, fixed_now())
    }

    fn skipped() -> ProblemResult {
        ProblemResult::skipped(ProblemId::new_v4(), false, 1_000, fixed_now())
    }

    fn hints(count: usize) -> Vec<DateTime<Utc>> {
        vec![fixed_now(); count]
    }

    #[test]
    fn correct_answers_earn_base_plus_speed_bonus() {
        assert_eq!(calculate_problem_points(&correct(1_500, false), false), 12);
        assert_eq!(calculate_problem_points(&correct(2_500, false), false), 11);
        assert_eq!(calculate_problem_points(&correct(2_000, false), false), 11);
        assert_eq!(calculate_problem_points(&correct(3_000, false), false), 10);
        assert_eq!(calculate_problem_points(&correct(5_000, true), true), 8);
        assert_eq!(calculate_problem_points(&correct(1_000, true), true), 10);
    }

    #[test]
    fn wrong_and_skipped_answers() {
        assert_eq!(calculate_problem_points(&wrong(1_000), false), 0);
        assert_eq!(calculate_problem_points(&skipped(), false), -5);
        assert_eq!(calculate_problem_points(&skipped(), true), -5);
    }

    #[test]
    fn excess_hints_use_per_minute_allowance() {
        assert_eq!(calculate_excess_hints(0, 120_000), 0);
        assert_eq!(calculate_excess_hints(3, 120_000), 0);
        assert_eq!(calculate_excess_hints(4, 120_000), 0);
        assert_eq!(calculate_excess_hints(6, 120_000), 2);
        // Short sessions count as one minute.
        assert_eq!(calculate_excess_hints(3, 10_000), 1);
        assert_eq!(calculate_excess_hints(3, 90_000), 0);
    }

    #[test]
    fn summary_of_a_mixed_session() {
        let results = vec![
            correct(1_000, false),
            correct(2_500, true),
            wrong(4_000),
            skipped(),
            correct(6_000, false),
        ];
        let summary = calculate_score_summary(&results, &hints(1), Difficulty::Hard, 120_000);

        assert_eq!(summary.base_points, 25);
        assert_eq!(summary.time_bonus_points, 3);
        assert_eq!(summary.hint_penalty, 2);
        assert_eq!(summary.excess_hint_penalty, 0);
        assert_eq!(summary.subtotal, 26);
        assert_eq!(summary.difficulty_multiplier, 1.5);
        assert_eq!(summary.final_score, 39);
        assert_eq!(summary.problems_attempted, 5);
        assert_eq!(summary.correct_count, 3);
        assert_eq!(summary.skipped_count, 1);
        assert_eq!(summary.hints_used, 1);
    }

    #[test]
    fn early_skips_do_not_bank_negative_points() {
        let results = vec![skipped(), skipped(), correct(10_000, false)];
        let summary = calculate_score_summary(&results, &[], Difficulty::Medium, 60_000);
        assert_eq!(summary.base_points, 10);
        assert_eq!(summary.final_score, 10);
    }

    #[test]
    fn subtotal_never_goes_negative() {
        let results = vec![correct(10_000, true)];
        let summary = calculate_score_summary(&results, &hints(10), Difficulty::Easy, 60_000);
        assert_eq!(summary.excess_hint_penalty, 24);
        assert_eq!(summary.subtotal, 0);
        assert_eq!(summary.final_score, 0);
    }

    #[test]
    fn easy_multiplier_rounds_to_nearest() {
        let results = vec![correct(10_000, false)];
        let summary = calculate_score_summary(&results, &[], Difficulty::Easy, 60_000);
        assert_eq!(summary.final_score, 7);
    }

    #[test]
    fn custom_rules_change_the_outcome() {
        let rules = ScoringRules {
            correct_answer: 20,
            ..ScoringRules::STANDARD
        };
        assert_eq!(rules.problem_points(&correct(10_000, false), false), 20);
        assert_eq!(ScoringRules::default(), ScoringRules::STANDARD);
    }

    #[test]
    fn breakdown_lists_only_nonzero_extras() {
        let plain = calculate_score_summary(
            &[correct(10_000, false)],
            &[],
            Difficulty::Medium,
            60_000,
        );
        assert_eq!(
            score_breakdown_lines(&plain, &ScoringRules::STANDARD),
            [
                "Problems Attempted: 1",
                "Correct Answers: 1 (+10 base points)",
                "Subtotal: 10 points",
                "Difficulty Multiplier: ×1",
                "Final Score: 10 points",
            ]
        );

        let busy = calculate_score_summary(
            &[skipped(), correct(1_000, true)],
            &hints(3),
            Difficulty::Easy,
            30_000,
        );
        let lines = score_breakdown_lines(&busy, &ScoringRules::STANDARD);
        assert!(lines.contains(&"Skipped: 1 (-5 points)".to_string()));
        assert!(lines.contains(&"Time Bonus: +2 points".to_string()));
        assert!(lines.contains(&"Hints Used: 3 (-2 points)".to_string()));
        assert!(lines.contains(&"Excess Hint Penalty: -3 points".to_string()));
        assert!(lines.contains(&"Difficulty Multiplier: ×0.66".to_string()));
    }

    #[test]
    fn summary_serializes_camel_case() {
        let summary = calculate_score_summary(&[], &[], Difficulty::Medium, 60_000);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["finalScore"], 0);
        assert_eq!(json["problemsAttempted"], 0);
    }

    proptest! {
        #[test]
        fn running_score_never_negative(steps in proptest::collection::vec(
            (0u8..3, any::<bool>(), 0u64..10_000), 0..60,
        )) {
            let mut score = 0;
            for (kind, hint_used, ms) in steps {
                let result = match kind {
                    0 => correct(ms, hint_used),
                    1 => wrong(ms),
                    _ => ProblemResult::skipped(ProblemId::new_v4(), hint_used, ms, fixed_now()),
                };
                score = apply_points(score, calculate_problem_points(&result, result.hint_used));
                prop_assert!(score >= 0);
            }
        }

        #[test]
        fn summary_final_score_never_negative(
            kinds in proptest::collection::vec(0u8..3, 0..40),
            hint_count in 0usize..30,
            level in 0usize..3,
        ) {
            let results: Vec<_> = kinds
                .into_iter()
                .map(|kind| match kind {
                    0 => correct(2_500, false),
                    1 => wrong(1_000),
                    _ => skipped(),
                })
                .collect();
            let summary = calculate_score_summary(
                &results,
                &hints(hint_count),
                Difficulty::ALL[level],
                120_000,
            );
            prop_assert!(summary.subtotal >= 0);
            prop_assert!(summary.final_score >= 0);
            prop_assert!(summary.base_points >= 0);
        }
    }
}
