use serde::{Deserialize, Serialize};

use safari_core::model::{GameSession, Problem};

/// Persisted snapshot of an in-progress session, stored under
/// `storage::keys::CURRENT_SESSION`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub session: GameSession,
    pub current_problem: Problem,
    pub time_remaining: u32,
    pub current_score: i32,
    #[serde(default)]
    pub animals_collected: Vec<String>,
}

impl SessionRecord {
    /// A record can be resumed only with time left and a consistent state:
    /// time within the session's timer, a non-negative score and at least one
    /// operator to draw the next problem from.
    #[must_use]
    pub fn is_resumable(&self) -> bool {
        let settings = self.session.settings();
        self.time_remaining > 0
            && self.time_remaining <= settings.timer_duration_secs()
            && self.current_score >= 0
            && !settings.operators().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use safari_core::model::{GlobalSettings, SessionId, SessionSettings};
    use safari_core::time::fixed_now;
    use safari_core::ProblemGenerator;
    use safari_core::model::Operator;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn record(time_remaining: u32) -> SessionRecord {
        let settings = SessionSettings::from_global(&GlobalSettings::default());
        let problem = ProblemGenerator::builtin()
            .generate(settings.difficulty(), &[Operator::Add], &mut StdRng::seed_from_u64(8))
            .unwrap();
        SessionRecord {
            session: GameSession::new(SessionId::new_v4(), settings, fixed_now()),
            current_problem: problem,
            time_remaining,
            current_score: 12,
            animals_collected: vec!["🦓".into()],
        }
    }

    #[test]
    fn wire_shape_uses_camel_case() {
        let json = serde_json::to_value(record(40)).unwrap();
        assert_eq!(json["timeRemaining"], 40);
        assert_eq!(json["currentScore"], 12);
        assert!(json["currentProblem"].is_object());
        assert_eq!(json["session"]["settings"]["timerDuration"], 120);
    }

    #[test]
    fn missing_animals_default_to_empty() {
        let mut json = serde_json::to_value(record(40)).unwrap();
        json.as_object_mut().unwrap().remove("animalsCollected");
        let back: SessionRecord = serde_json::from_value(json).unwrap();
        assert!(back.animals_collected.is_empty());
    }

    #[test]
    fn zero_time_is_not_resumable() {
        assert!(record(1).is_resumable());
        assert!(!record(0).is_resumable());
    }

    #[test]
    fn inconsistent_records_are_not_resumable() {
        assert!(record(120).is_resumable());
        assert!(!record(121).is_resumable());

        let mut negative = record(40);
        negative.current_score = -40;
        assert!(!negative.is_resumable());

        let mut json = serde_json::to_value(record(40)).unwrap();
        json["session"]["settings"]["operators"] = serde_json::json!([]);
        let no_operators: SessionRecord = serde_json::from_value(json).unwrap();
        assert!(!no_operators.is_resumable());
    }
}
