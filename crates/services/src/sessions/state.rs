//! Pure session state machine.
//!
//! `GameState` holds everything the session manager tracks and applies each
//! action synchronously. Time, randomness and the generator are passed in, so
//! the whole lifecycle can be driven deterministically in tests.

use chrono::{DateTime, Utc};
use rand::Rng;

use safari_core::model::{
    GameSession, GlobalSettings, Hint, Problem, ProblemResult, SessionId, SessionSettings,
};
use safari_core::scoring::{ScoringRules, apply_points};
use safari_core::time::{elapsed_millis, format_countdown};
use safari_core::{GenerateError, ProblemGenerator, generate_hint, is_answer_correct};

use super::record::SessionRecord;
use super::view::{GameSnapshot, View};

/// Outcome of one countdown step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// No session is running; nothing changed.
    Idle,
    /// One second elapsed; this much remains.
    Running(u32),
    /// Time ran out and the session ended.
    Expired,
}

#[derive(Debug, Clone, Default)]
pub struct GameState {
    view: View,
    session: Option<GameSession>,
    current_problem: Option<Problem>,
    current_hint: Option<Hint>,
    problem_started_at: Option<DateTime<Utc>>,
    time_remaining: u32,
    current_score: i32,
    show_feedback: bool,
    last_answer_correct: Option<bool>,
    animals_collected: Vec<String>,
}

impl GameState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    //
    // ─── ACCESSORS ─────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn view(&self) -> View {
        self.view
    }

    #[must_use]
    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn current_problem(&self) -> Option<&Problem> {
        self.current_problem.as_ref()
    }

    #[must_use]
    pub fn current_hint(&self) -> Option<&Hint> {
        self.current_hint.as_ref()
    }

    #[must_use]
    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    #[must_use]
    pub fn current_score(&self) -> i32 {
        self.current_score
    }

    #[must_use]
    pub fn show_feedback(&self) -> bool {
        self.show_feedback
    }

    #[must_use]
    pub fn last_answer_correct(&self) -> Option<bool> {
        self.last_answer_correct
    }

    #[must_use]
    pub fn animals_collected(&self) -> &[String] {
        &self.animals_collected
    }

    fn in_play(&self) -> bool {
        self.view == View::Game && self.session.is_some() && self.current_problem.is_some()
    }

    //
    // ─── LIFECYCLE ─────────────────────────────────────────────────────────────
    //

    /// Begin a fresh session from `settings`, replacing whatever was running.
    ///
    /// # Errors
    ///
    /// Returns `GenerateError` if the first problem cannot be generated. State
    /// is left untouched in that case.
    pub fn start<R: Rng>(
        &mut self,
        settings: &GlobalSettings,
        generator: &ProblemGenerator,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<SessionId, GenerateError> {
        let session_settings = SessionSettings::from_global(settings);
        let problem = generator.generate(
            session_settings.difficulty(),
            session_settings.operators(),
            rng,
        )?;

        let mut id_bytes = [0u8; 16];
        rng.fill(&mut id_bytes);
        let id = SessionId::from_random_bytes(id_bytes);

        *self = Self {
            view: View::Game,
            time_remaining: session_settings.timer_duration_secs(),
            session: Some(GameSession::new(id, session_settings, now)),
            current_problem: Some(problem),
            problem_started_at: Some(now),
            ..Self::default()
        };
        Ok(id)
    }

    /// Finish the running session and show results.
    ///
    /// Remaining time is zeroed so the persisted record cannot be resumed.
    pub fn end(&mut self) -> bool {
        if self.view != View::Game || self.session.is_none() {
            return false;
        }
        self.view = View::Results;
        self.time_remaining = 0;
        self.current_hint = None;
        true
    }

    /// Drop all session state and return to the settings view.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Advance the countdown by one second.
    pub fn tick(&mut self) -> Tick {
        if self.view != View::Game || self.session.is_none() {
            return Tick::Idle;
        }
        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining == 0 {
            self.end();
            Tick::Expired
        } else {
            Tick::Running(self.time_remaining)
        }
    }

    //
    // ─── PLAYER ACTIONS ────────────────────────────────────────────────────────
    //

    /// Score an answer to the current problem and show feedback.
    ///
    /// Ignored while feedback is already showing, so each problem gets exactly
    /// one result.
    pub fn check_answer(
        &mut self,
        answer: f64,
        rules: &ScoringRules,
        now: DateTime<Utc>,
    ) -> Option<ProblemResult> {
        if !self.in_play() || self.show_feedback {
            return None;
        }
        let problem = self.current_problem.as_ref()?;

        let correct = is_answer_correct(answer, problem.answer());
        let hint_used = self.current_hint.is_some();
        let elapsed = self.elapsed_ms(now);
        let result = ProblemResult::answered(problem.id(), correct, hint_used, elapsed, now);
        let points = rules.problem_points(&result, hint_used);
        let result = result.with_points(points);

        if correct {
            self.animals_collected.push(problem.animal().to_owned());
        }
        self.session.as_mut()?.record_result(result.clone());
        self.current_score = apply_points(self.current_score, points);
        self.show_feedback = true;
        self.last_answer_correct = Some(correct);
        Some(result)
    }

    /// Record a skip for the current problem and move straight to the next.
    ///
    /// # Errors
    ///
    /// Returns `GenerateError` if the next problem cannot be generated; the
    /// skip is not recorded in that case.
    pub fn skip<R: Rng>(
        &mut self,
        generator: &ProblemGenerator,
        rng: &mut R,
        rules: &ScoringRules,
        now: DateTime<Utc>,
    ) -> Result<Option<ProblemResult>, GenerateError> {
        if !self.in_play() || self.show_feedback {
            return Ok(None);
        }
        let next = self.generate_next(generator, rng)?;
        let Some(problem) = self.current_problem.as_ref() else {
            return Ok(None);
        };

        let hint_used = self.current_hint.is_some();
        let result =
            ProblemResult::skipped(problem.id(), hint_used, self.elapsed_ms(now), now);
        let points = rules.problem_points(&result, hint_used);
        let result = result.with_points(points);

        if let Some(session) = self.session.as_mut() {
            session.record_result(result.clone());
        }
        self.current_score = apply_points(self.current_score, points);
        self.present(next, now);
        Ok(Some(result))
    }

    /// Produce a hint for the current problem. Only one hint per problem.
    pub fn request_hint(&mut self, now: DateTime<Utc>) -> Option<Hint> {
        if !self.in_play() || self.current_hint.is_some() {
            return None;
        }
        let hint = generate_hint(self.current_problem.as_ref()?);
        self.session.as_mut()?.record_hint(now);
        self.current_hint = Some(hint.clone());
        Some(hint)
    }

    /// Hide the current hint. Its timestamp stays recorded.
    pub fn dismiss_hint(&mut self) -> bool {
        self.current_hint.take().is_some()
    }

    /// Clear feedback and present the next problem.
    ///
    /// # Errors
    ///
    /// Returns `GenerateError` if the next problem cannot be generated;
    /// feedback stays visible in that case.
    pub fn continue_after_feedback<R: Rng>(
        &mut self,
        generator: &ProblemGenerator,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<bool, GenerateError> {
        if !self.in_play() || !self.show_feedback {
            return Ok(false);
        }
        let next = self.generate_next(generator, rng)?;
        self.present(next, now);
        Ok(true)
    }

    fn generate_next<R: Rng>(
        &self,
        generator: &ProblemGenerator,
        rng: &mut R,
    ) -> Result<Problem, GenerateError> {
        let settings = self
            .session
            .as_ref()
            .map(GameSession::settings)
            .ok_or(GenerateError::NoOperators)?;
        generator.generate(settings.difficulty(), settings.operators(), rng)
    }

    fn present(&mut self, problem: Problem, now: DateTime<Utc>) {
        self.current_problem = Some(problem);
        self.current_hint = None;
        self.problem_started_at = Some(now);
        self.show_feedback = false;
        self.last_answer_correct = None;
    }

    fn elapsed_ms(&self, now: DateTime<Utc>) -> u64 {
        self.problem_started_at
            .map_or(0, |started| elapsed_millis(started, now))
    }

    //
    // ─── PERSISTENCE ───────────────────────────────────────────────────────────
    //

    /// Snapshot for storage; `None` when no session exists.
    #[must_use]
    pub fn record(&self) -> Option<SessionRecord> {
        Some(SessionRecord {
            session: self.session.clone()?,
            current_problem: self.current_problem.clone()?,
            time_remaining: self.time_remaining,
            current_score: self.current_score,
            animals_collected: self.animals_collected.clone(),
        })
    }

    /// Resume from a stored record. Records that are not resumable are refused.
    ///
    /// The problem clock restarts at `now`. A problem that was already
    /// answered when the record was written comes back with its feedback
    /// showing, so it cannot be scored twice.
    pub fn restore(&mut self, record: SessionRecord, now: DateTime<Utc>) -> bool {
        if !record.is_resumable() {
            return false;
        }

        let answered = record
            .session
            .results()
            .last()
            .filter(|result| result.problem_id == record.current_problem.id())
            .map(|result| result.correct);

        *self = Self {
            view: View::Game,
            session: Some(record.session),
            current_problem: Some(record.current_problem),
            current_hint: None,
            problem_started_at: Some(now),
            time_remaining: record.time_remaining,
            current_score: record.current_score,
            show_feedback: answered.is_some(),
            last_answer_correct: answered,
            animals_collected: record.animals_collected,
        };
        true
    }

    #[must_use]
    pub fn snapshot(&self, rules: &ScoringRules) -> GameSnapshot {
        GameSnapshot {
            view: self.view,
            session: self.session.clone(),
            problem: self.current_problem.clone(),
            hint: self.current_hint.clone(),
            current_score: self.current_score,
            time_remaining: self.time_remaining,
            formatted_time: format_countdown(self.time_remaining),
            show_feedback: self.show_feedback,
            last_answer_correct: self.last_answer_correct,
            score_summary: self
                .session
                .as_ref()
                .map(|session| session.score_summary(rules)),
            animals_collected: self.animals_collected.clone(),
        }
    }
}
