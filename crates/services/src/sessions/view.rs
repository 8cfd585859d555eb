use serde::Serialize;

use safari_core::model::{GameSession, Hint, Problem};
use safari_core::scoring::ScoreSummary;

/// Top-level screen the game is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Settings,
    Game,
    Results,
}

/// Owned copy of everything a front end needs to render the game.
///
/// Fields are plain values; formatting beyond `formatted_time` is left to the
/// caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub view: View,
    pub session: Option<GameSession>,
    pub problem: Option<Problem>,
    pub hint: Option<Hint>,
    pub current_score: i32,
    pub time_remaining: u32,
    /// Remaining time as `M:SS`.
    pub formatted_time: String,
    pub show_feedback: bool,
    pub last_answer_correct: Option<bool>,
    pub score_summary: Option<ScoreSummary>,
    pub animals_collected: Vec<String>,
}
