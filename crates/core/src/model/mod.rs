mod hint;
mod ids;
mod problem;
mod result;
mod session;
mod settings;

pub use hint::{Hint, HintStrategy};
pub use ids::{ProblemId, SessionId};
pub use problem::{
    Difficulty, Operator, ParseDifficultyError, ParseOperatorError, Problem, ProblemData,
    SAFARI_ANIMALS,
};
pub use result::ProblemResult;
pub use session::GameSession;
pub use settings::{
    DEFAULT_TIMER_SECONDS, GlobalSettings, GlobalSettingsDraft, MAX_TIMER_SECONDS,
    MIN_TIMER_SECONDS, SessionSettings,
};
