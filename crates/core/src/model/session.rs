use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{ProblemResult, SessionId, SessionSettings};
use crate::scoring::{ScoreSummary, ScoringRules};

/// One timed play-through.
///
/// Results and hint timestamps only ever grow; nothing is removed until the
/// whole session is discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    id: SessionId,
    settings: SessionSettings,
    started_at: DateTime<Utc>,
    results: Vec<ProblemResult>,
    hint_timestamps: Vec<DateTime<Utc>>,
}

impl GameSession {
    #[must_use]
    pub fn new(id: SessionId, settings: SessionSettings, started_at: DateTime<Utc>) -> Self {
        Self {
            id,
            settings,
            started_at,
            results: Vec::new(),
            hint_timestamps: Vec::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn results(&self) -> &[ProblemResult] {
        &self.results
    }

    #[must_use]
    pub fn hint_timestamps(&self) -> &[DateTime<Utc>] {
        &self.hint_timestamps
    }

    pub fn record_result(&mut self, result: ProblemResult) {
        self.results.push(result);
    }

    pub fn record_hint(&mut self, at: DateTime<Utc>) {
        self.hint_timestamps.push(at);
    }

    /// Score breakdown over everything recorded so far.
    #[must_use]
    pub fn score_summary(&self, rules: &ScoringRules) -> ScoreSummary {
        rules.score_summary(
            &self.results,
            &self.hint_timestamps,
            self.settings.difficulty(),
            self.settings.duration_ms(),
        )
    }
}
