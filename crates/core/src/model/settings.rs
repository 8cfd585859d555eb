use serde::{Deserialize, Serialize};

use crate::model::{Difficulty, Operator};

pub const MIN_TIMER_SECONDS: u32 = 30;
pub const MAX_TIMER_SECONDS: u32 = 600;
pub const DEFAULT_TIMER_SECONDS: u32 = 120;

/// Process-wide defaults used to seed each new session.
///
/// Invariants: the operator set is never empty and holds no duplicates, and
/// the timer duration stays within `[MIN_TIMER_SECONDS, MAX_TIMER_SECONDS]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "GlobalSettingsDraft")]
pub struct GlobalSettings {
    default_difficulty: Difficulty,
    default_operators: Vec<Operator>,
    #[serde(rename = "defaultTimerDuration")]
    default_timer_duration_secs: u32,
}

/// Loosely-typed settings as read from storage; every field may be missing.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GlobalSettingsDraft {
    pub default_difficulty: Option<Difficulty>,
    pub default_operators: Option<Vec<Operator>>,
    pub default_timer_duration: Option<u32>,
}

impl GlobalSettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill gaps from the defaults and enforce the settings invariants.
    #[must_use]
    pub fn normalize(self) -> GlobalSettings {
        let defaults = GlobalSettings::default();
        let mut settings = GlobalSettings {
            default_difficulty: self
                .default_difficulty
                .unwrap_or(defaults.default_difficulty),
            default_operators: defaults.default_operators,
            default_timer_duration_secs: defaults.default_timer_duration_secs,
        };
        if let Some(operators) = self.default_operators {
            settings.set_operators(&operators);
        }
        if let Some(secs) = self.default_timer_duration {
            settings.set_timer_duration(secs);
        }
        settings
    }
}

impl From<GlobalSettingsDraft> for GlobalSettings {
    fn from(draft: GlobalSettingsDraft) -> Self {
        draft.normalize()
    }
}

impl GlobalSettings {
    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.default_difficulty
    }

    #[must_use]
    pub fn operators(&self) -> &[Operator] {
        &self.default_operators
    }

    #[must_use]
    pub fn timer_duration_secs(&self) -> u32 {
        self.default_timer_duration_secs
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.default_difficulty = difficulty;
    }

    /// Replace the operator set. Empty input is ignored.
    ///
    /// Returns `false` when the set was left untouched.
    pub fn set_operators(&mut self, operators: &[Operator]) -> bool {
        let mut unique = Vec::with_capacity(operators.len());
        for op in operators {
            if !unique.contains(op) {
                unique.push(*op);
            }
        }
        if unique.is_empty() {
            return false;
        }
        self.default_operators = unique;
        true
    }

    /// Add the operator if absent, remove it if present.
    ///
    /// Removing the last remaining operator is refused and returns `false`.
    pub fn toggle_operator(&mut self, operator: Operator) -> bool {
        if let Some(pos) = self.default_operators.iter().position(|op| *op == operator) {
            if self.default_operators.len() == 1 {
                return false;
            }
            self.default_operators.remove(pos);
        } else {
            self.default_operators.push(operator);
        }
        true
    }

    /// Set the timer, clamped to the allowed range.
    pub fn set_timer_duration(&mut self, seconds: u32) {
        self.default_timer_duration_secs = seconds.clamp(MIN_TIMER_SECONDS, MAX_TIMER_SECONDS);
    }
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            default_difficulty: Difficulty::Medium,
            default_operators: Operator::ALL.to_vec(),
            default_timer_duration_secs: DEFAULT_TIMER_SECONDS,
        }
    }
}

/// Settings frozen at session start.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSettings {
    difficulty: Difficulty,
    operators: Vec<Operator>,
    #[serde(rename = "timerDuration")]
    timer_duration_secs: u32,
}

impl SessionSettings {
    /// Snapshot the current global settings.
    #[must_use]
    pub fn from_global(settings: &GlobalSettings) -> Self {
        Self {
            difficulty: settings.difficulty(),
            operators: settings.operators().to_vec(),
            timer_duration_secs: settings.timer_duration_secs(),
        }
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    #[must_use]
    pub fn timer_duration_secs(&self) -> u32 {
        self.timer_duration_secs
    }

    /// Full session length in milliseconds.
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        u64::from(self.timer_duration_secs) * 1000
    }
}
