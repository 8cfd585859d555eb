use std::ops::ControlFlow;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use safari_core::model::{Hint, ProblemResult, SessionId};
use safari_core::{ProblemGenerator, ScoringRules};
use storage::json::{load_json, save_json};
use storage::keys;
use storage::repository::KeyValueStore;

use super::countdown::Countdown;
use super::record::SessionRecord;
use super::state::{GameState, Tick};
use super::view::{GameSnapshot, View};
use crate::Clock;
use crate::error::SessionError;
use crate::settings_service::SettingsService;

const TICK_PERIOD: Duration = Duration::from_secs(1);

struct Engine {
    game: GameState,
    rng: StdRng,
}

struct Inner {
    clock: Clock,
    rules: ScoringRules,
    generator: ProblemGenerator,
    tick_period: Duration,
    settings: SettingsService,
    store: Arc<dyn KeyValueStore>,
    engine: Mutex<Engine>,
    countdown: Mutex<Option<Countdown>>,
    views: watch::Sender<View>,
}

/// Runs timed game sessions.
///
/// Cheap to clone; clones share state. Every action mutates in memory first
/// and then persists the current-session record, so a storage failure is
/// reported without rolling back what the player did.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<Inner>,
}

/// Configures a `SessionManager`.
pub struct SessionManagerBuilder {
    settings: SettingsService,
    store: Arc<dyn KeyValueStore>,
    clock: Clock,
    rules: ScoringRules,
    generator: ProblemGenerator,
    tick_period: Duration,
    seed: Option<u64>,
}

impl SessionManagerBuilder {
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_rules(mut self, rules: ScoringRules) -> Self {
        self.rules = rules;
        self
    }

    #[must_use]
    pub fn with_generator(mut self, generator: ProblemGenerator) -> Self {
        self.generator = generator;
        self
    }

    #[must_use]
    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period;
        self
    }

    /// Seed problem generation for reproducible sessions.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn build(self) -> SessionManager {
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let (views, _) = watch::channel(View::default());
        SessionManager {
            inner: Arc::new(Inner {
                clock: self.clock,
                rules: self.rules,
                generator: self.generator,
                tick_period: self.tick_period,
                settings: self.settings,
                store: self.store,
                engine: Mutex::new(Engine {
                    game: GameState::new(),
                    rng,
                }),
                countdown: Mutex::new(None),
                views,
            }),
        }
    }
}

impl SessionManager {
    #[must_use]
    pub fn builder(settings: SettingsService, store: Arc<dyn KeyValueStore>) -> SessionManagerBuilder {
        SessionManagerBuilder {
            settings,
            store,
            clock: Clock::default(),
            rules: ScoringRules::default(),
            generator: ProblemGenerator::builtin(),
            tick_period: TICK_PERIOD,
            seed: None,
        }
    }

    #[must_use]
    pub fn new(settings: SettingsService, store: Arc<dyn KeyValueStore>) -> Self {
        Self::builder(settings, store).build()
    }

    #[must_use]
    pub fn settings(&self) -> &SettingsService {
        &self.inner.settings
    }

    #[must_use]
    pub fn rules(&self) -> &ScoringRules {
        &self.inner.rules
    }

    fn engine(&self) -> MutexGuard<'_, Engine> {
        self.inner
            .engine
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn countdown(&self) -> MutexGuard<'_, Option<Countdown>> {
        self.inner
            .countdown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    //
    // ─── QUERIES ───────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn view(&self) -> View {
        self.engine().game.view()
    }

    /// Receiver that observes every view transition, including timeouts.
    #[must_use]
    pub fn view_changes(&self) -> watch::Receiver<View> {
        self.inner.views.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        self.engine().game.snapshot(&self.inner.rules)
    }

    #[must_use]
    pub fn is_timer_running(&self) -> bool {
        self.countdown()
            .as_ref()
            .is_some_and(|countdown| !countdown.is_finished())
    }

    //
    // ─── ACTIONS ───────────────────────────────────────────────────────────────
    //

    /// Start a new session from the current global settings.
    ///
    /// Any running session is replaced and its countdown stopped.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Generate` if no problem can be generated for
    /// the configured operators, or `SessionError::Storage` if the new session
    /// cannot be persisted.
    pub async fn start_session(&self) -> Result<SessionId, SessionError> {
        let settings = self.inner.settings.load().await;
        let now = self.inner.clock.now();

        let (id, record) = {
            let mut engine = self.engine();
            let Engine { game, rng } = &mut *engine;
            let id = game.start(&settings, &self.inner.generator, rng, now)?;
            (id, game.record())
        };
        info!(
            session_id = %id,
            difficulty = %settings.difficulty(),
            seconds = settings.timer_duration_secs(),
            "session started"
        );

        self.restart_countdown();
        self.publish_view();
        self.persist(record).await?;
        Ok(id)
    }

    /// Score `answer` against the current problem.
    ///
    /// Returns `None` when there is no problem to answer or feedback for the
    /// current one is already showing.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the updated session cannot be
    /// persisted.
    pub async fn check_answer(&self, answer: f64) -> Result<Option<ProblemResult>, SessionError> {
        let now = self.inner.clock.now();
        let (result, record) = {
            let mut engine = self.engine();
            let result = engine.game.check_answer(answer, &self.inner.rules, now);
            (result, engine.game.record())
        };
        let Some(result) = result else {
            return Ok(None);
        };
        debug!(
            problem_id = %result.problem_id,
            correct = result.correct,
            points = result.points_awarded,
            "answer checked"
        );
        self.persist(record).await?;
        Ok(Some(result))
    }

    /// Skip the current problem and present the next one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Generate` if the next problem cannot be
    /// generated, or `SessionError::Storage` if persisting fails.
    pub async fn skip_problem(&self) -> Result<Option<ProblemResult>, SessionError> {
        let now = self.inner.clock.now();
        let (result, record) = {
            let mut engine = self.engine();
            let Engine { game, rng } = &mut *engine;
            let result = game.skip(&self.inner.generator, rng, &self.inner.rules, now)?;
            (result, game.record())
        };
        let Some(result) = result else {
            return Ok(None);
        };
        debug!(problem_id = %result.problem_id, "problem skipped");
        self.persist(record).await?;
        Ok(Some(result))
    }

    /// Show a hint for the current problem. Returns `None` if one is already
    /// showing or nothing is in play.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the hint timestamp cannot be
    /// persisted.
    pub async fn request_hint(&self) -> Result<Option<Hint>, SessionError> {
        let now = self.inner.clock.now();
        let (hint, record) = {
            let mut engine = self.engine();
            let hint = engine.game.request_hint(now);
            (hint, engine.game.record())
        };
        let Some(hint) = hint else {
            return Ok(None);
        };
        debug!(strategy = %hint.strategy, "hint shown");
        self.persist(record).await?;
        Ok(Some(hint))
    }

    /// Hide the current hint. The hint still counts as used.
    pub fn dismiss_hint(&self) -> bool {
        self.engine().game.dismiss_hint()
    }

    /// Leave the feedback state and present the next problem.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Generate` if the next problem cannot be
    /// generated, or `SessionError::Storage` if persisting fails.
    pub async fn continue_after_feedback(&self) -> Result<bool, SessionError> {
        let now = self.inner.clock.now();
        let (advanced, record) = {
            let mut engine = self.engine();
            let Engine { game, rng } = &mut *engine;
            let advanced = game.continue_after_feedback(&self.inner.generator, rng, now)?;
            (advanced, game.record())
        };
        if advanced {
            self.persist(record).await?;
        }
        Ok(advanced)
    }

    /// Finish the session early and show results.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the finished session cannot be
    /// persisted.
    pub async fn end_session(&self) -> Result<bool, SessionError> {
        let (ended, record) = {
            let mut engine = self.engine();
            let ended = engine.game.end();
            (ended, engine.game.record())
        };
        if !ended {
            return Ok(false);
        }
        self.stop_countdown();
        self.finish(record).await?;
        Ok(true)
    }

    /// Drop the session, in memory and in storage, and return to settings.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the stored session cannot be
    /// removed.
    pub async fn reset_game(&self) -> Result<(), SessionError> {
        self.stop_countdown();
        self.engine().game.reset();
        self.publish_view();
        info!("game reset");

        if let Err(err) = self.inner.store.remove(keys::CURRENT_SESSION).await {
            warn!(error = %err, "failed to remove stored session");
            return Err(err.into());
        }
        Ok(())
    }

    /// Resume a stored session if it still has time left.
    ///
    /// Missing, corrupt or expired records leave the manager untouched and
    /// return `false`.
    pub async fn restore_session(&self) -> bool {
        let Some(record) =
            load_json::<SessionRecord>(self.inner.store.as_ref(), keys::CURRENT_SESSION).await
        else {
            return false;
        };
        let now = self.inner.clock.now();
        let session_id = record.session.id();
        let remaining = record.time_remaining;

        if !self.engine().game.restore(record, now) {
            warn!(%session_id, remaining, "stored session cannot be resumed; ignoring it");
            return false;
        }
        info!(%session_id, remaining, "session restored");

        self.restart_countdown();
        self.publish_view();
        true
    }

    /// Run one countdown step now.
    ///
    /// The background countdown calls this once per second; drivers without a
    /// runtime timer, and tests, can call it directly.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the updated session cannot be
    /// persisted.
    pub async fn tick(&self) -> Result<Tick, SessionError> {
        self.step(false).await
    }

    //
    // ─── INTERNALS ─────────────────────────────────────────────────────────────
    //

    async fn step(&self, from_countdown: bool) -> Result<Tick, SessionError> {
        let (tick, record) = {
            let mut engine = self.engine();
            let tick = engine.game.tick();
            (tick, engine.game.record())
        };

        match tick {
            Tick::Idle => {}
            Tick::Running(_) => self.persist(record).await?,
            Tick::Expired => {
                if from_countdown {
                    // Detach instead of aborting: this runs inside the task.
                    drop(self.countdown().take());
                } else {
                    self.stop_countdown();
                }
                info!("time is up");
                self.finish(record).await?;
            }
        }
        Ok(tick)
    }

    async fn finish(&self, record: Option<SessionRecord>) -> Result<(), SessionError> {
        self.publish_view();
        if let Some(summary) = self.snapshot().score_summary {
            info!(
                final_score = summary.final_score,
                attempted = summary.problems_attempted,
                "session finished"
            );
        }
        self.persist(record).await
    }

    fn restart_countdown(&self) {
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let countdown = Countdown::spawn(self.inner.tick_period, move || {
            let weak = weak.clone();
            async move {
                let Some(inner) = weak.upgrade() else {
                    return ControlFlow::Break(());
                };
                let manager = SessionManager { inner };
                match manager.step(true).await {
                    Ok(Tick::Running(_)) => ControlFlow::Continue(()),
                    Ok(Tick::Idle | Tick::Expired) => ControlFlow::Break(()),
                    Err(err) => {
                        warn!(error = %err, "countdown step failed to persist");
                        ControlFlow::Continue(())
                    }
                }
            }
        });

        if let Some(previous) = std::mem::replace(&mut *self.countdown(), countdown) {
            previous.cancel();
        }
    }

    fn stop_countdown(&self) {
        if let Some(countdown) = self.countdown().take() {
            countdown.cancel();
        }
    }

    fn publish_view(&self) {
        let view = self.view();
        self.inner.views.send_if_modified(|current| {
            if *current == view {
                false
            } else {
                *current = view;
                true
            }
        });
    }

    async fn persist(&self, record: Option<SessionRecord>) -> Result<(), SessionError> {
        let Some(record) = record else {
            return Ok(());
        };
        if let Err(err) = save_json(self.inner.store.as_ref(), keys::CURRENT_SESSION, &record).await {
            warn!(error = %err, "failed to persist session");
            return Err(err.into());
        }
        Ok(())
    }
}
