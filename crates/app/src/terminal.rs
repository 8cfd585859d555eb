//! Line-oriented terminal front end.
//!
//! Reads one command per line from stdin and renders the session manager's
//! snapshot after each action. Timeouts arrive through the view watch channel
//! and are rendered even while waiting for input.

use safari_core::model::{Difficulty, Operator};
use safari_core::time::format_countdown;
use safari_core::{ScoringRules, parse_answer, score_breakdown_lines};
use services::{GameServices, GameSnapshot, SessionError, SettingsError, View};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

type DynError = Box<dyn std::error::Error>;

/// One parsed line of player input.
#[derive(Debug, Clone, PartialEq)]
enum Input {
    Answer(f64),
    Continue,
    Skip,
    Hint,
    DismissHint,
    Status,
    Start,
    Difficulty(Difficulty),
    Operators(Vec<Operator>),
    Toggle(Operator),
    Timer(u32),
    Defaults,
    End,
    Menu,
    Help,
    Quit,
    Unknown(String),
}

impl Input {
    fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Continue;
        }
        if let Some(answer) = parse_answer(line) {
            return Self::Answer(answer);
        }

        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or_default().to_lowercase();
        let rest: Vec<&str> = words.collect();
        let unknown = || Self::Unknown(line.to_owned());

        match (command.as_str(), rest.as_slice()) {
            ("c" | "continue" | "next", []) => Self::Continue,
            ("s" | "skip", []) => Self::Skip,
            ("h" | "hint", []) => Self::Hint,
            ("d" | "dismiss", []) => Self::DismissHint,
            ("t" | "status", []) => Self::Status,
            ("start" | "play" | "new" | "n", []) => Self::Start,
            ("difficulty" | "level", [level]) => {
                level.parse().map_or_else(|_| unknown(), Self::Difficulty)
            }
            ("ops" | "operators", symbols) if !symbols.is_empty() => symbols
                .iter()
                .map(|symbol| symbol.parse::<Operator>())
                .collect::<Result<Vec<_>, _>>()
                .map_or_else(|_| unknown(), Self::Operators),
            ("toggle", [symbol]) => symbol.parse().map_or_else(|_| unknown(), Self::Toggle),
            ("timer", [seconds]) => seconds.parse().map_or_else(|_| unknown(), Self::Timer),
            ("defaults", []) => Self::Defaults,
            ("end", []) => Self::End,
            ("menu" | "m" | "reset", []) => Self::Menu,
            ("help" | "?", []) => Self::Help,
            ("quit" | "q" | "exit", []) => Self::Quit,
            _ => unknown(),
        }
    }
}

/// Drive the game until the player quits or stdin closes.
///
/// # Errors
///
/// Returns an error if a session action fails to generate a problem or to
/// persist, or if stdin cannot be read.
pub async fn run(services: GameServices) -> Result<(), DynError> {
    let sessions = services.sessions();
    let settings = services.settings();
    settings.load().await;

    let mut views = sessions.view_changes();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    if sessions.restore_session().await {
        println!("Welcome back! Picking up your safari where you left off.");
        views.mark_unchanged();
        render(&sessions.snapshot(), sessions.rules());
    } else {
        render_settings(&services);
    }

    loop {
        tokio::select! {
            changed = views.changed() => {
                if changed.is_err() {
                    break;
                }
                if *views.borrow_and_update() == View::Results {
                    println!("⏰ Time's up!");
                    render(&sessions.snapshot(), sessions.rules());
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let input = Input::parse(&line);
                let ended_by_player = matches!(input, Input::End);
                let before = *views.borrow_and_update();
                if !dispatch(&services, input).await? {
                    break;
                }
                // A timeout that lands while the command runs still gets announced.
                let after = *views.borrow_and_update();
                if before == View::Game && after == View::Results && !ended_by_player {
                    println!("⏰ Time's up!");
                    render(&sessions.snapshot(), sessions.rules());
                }
            }
        }
    }
    Ok(())
}

/// Apply one input, riding out storage failures.
///
/// A failed save leaves the in-memory game intact, so the player keeps
/// playing with a warning. Returns `false` when the player quits.
///
/// # Errors
///
/// Returns problem generation failures and anything else `handle` cannot
/// recover from.
async fn dispatch(services: &GameServices, input: Input) -> Result<bool, DynError> {
    match handle(services, input).await {
        Err(err) if is_storage_failure(err.as_ref()) => {
            warn!(error = %err, "progress not saved");
            println!("⚠️  Progress could not be saved ({err}). Your game continues.");
            if services.sessions().view() == View::Settings {
                render_settings(services);
            } else {
                render(&services.sessions().snapshot(), services.sessions().rules());
            }
            Ok(true)
        }
        other => other,
    }
}

fn is_storage_failure(err: &(dyn std::error::Error + 'static)) -> bool {
    if let Some(err) = err.downcast_ref::<SessionError>() {
        return matches!(err, SessionError::Storage(_));
    }
    matches!(
        err.downcast_ref::<SettingsError>(),
        Some(SettingsError::Storage(_))
    )
}

/// Apply one input. Returns `false` when the player quits.
async fn handle(services: &GameServices, input: Input) -> Result<bool, DynError> {
    let sessions = services.sessions();
    let settings = services.settings();
    let view = sessions.view();

    match (view, input) {
        (_, Input::Quit) => return Ok(false),
        (_, Input::Help) => print_help(view),
        (_, Input::Unknown(raw)) => println!("Not sure what \"{raw}\" means. Type help."),

        (View::Settings, Input::Start) | (View::Results, Input::Start) => {
            sessions.start_session().await?;
            render(&sessions.snapshot(), sessions.rules());
        }
        (View::Settings, Input::Difficulty(level)) => {
            settings.set_difficulty(level).await?;
            render_settings(services);
        }
        (View::Settings, Input::Operators(ops)) => {
            if !settings.set_operators(&ops).await? {
                println!("Pick at least one operator.");
            }
            render_settings(services);
        }
        (View::Settings, Input::Toggle(op)) => {
            if !settings.toggle_operator(op).await? {
                println!("At least one operator has to stay on.");
            }
            render_settings(services);
        }
        (View::Settings, Input::Timer(seconds)) => {
            settings.set_timer_duration(seconds).await?;
            render_settings(services);
        }
        (View::Settings, Input::Defaults) => {
            settings.reset_to_defaults().await?;
            render_settings(services);
        }
        (View::Settings, Input::Status | Input::Continue) => render_settings(services),

        (View::Game, Input::Answer(answer)) => {
            match sessions.check_answer(answer).await? {
                Some(result) if result.correct => {
                    println!("✅ Correct! +{} points", result.points_awarded);
                }
                Some(_) => {
                    let answer = sessions
                        .snapshot()
                        .problem
                        .map(|problem| problem.answer_text())
                        .unwrap_or_default();
                    println!("❌ Not quite. The answer was {answer}.");
                }
                None => println!("Press Enter to continue."),
            }
            println!("Score: {}", sessions.snapshot().current_score);
        }
        (View::Game, Input::Continue) => {
            if sessions.continue_after_feedback().await? {
                render(&sessions.snapshot(), sessions.rules());
            }
        }
        (View::Game, Input::Skip) => {
            if sessions.skip_problem().await?.is_some() {
                println!("Skipped (-{} points).", sessions.rules().skip_penalty);
                render(&sessions.snapshot(), sessions.rules());
            }
        }
        (View::Game, Input::Hint) => match sessions.request_hint().await? {
            Some(hint) => println!("💡 {}: {}", hint.strategy.display_name(), hint.message),
            None => println!("You already have a hint for this one."),
        },
        (View::Game, Input::DismissHint) => {
            sessions.dismiss_hint();
        }
        (View::Game, Input::Status) => render(&sessions.snapshot(), sessions.rules()),
        (View::Game, Input::End) => {
            sessions.end_session().await?;
            render(&sessions.snapshot(), sessions.rules());
        }
        (View::Game | View::Results, Input::Menu) => {
            sessions.reset_game().await?;
            render_settings(services);
        }
        (View::Results, Input::Status | Input::Continue) => render(&sessions.snapshot(), sessions.rules()),

        (view, input) => {
            warn!(?view, ?input, "input ignored in this view");
            println!("That doesn't work right now. Type help.");
        }
    }
    Ok(true)
}

fn render_settings(services: &GameServices) {
    let settings = services.settings().current();
    let operators: Vec<&str> = settings.operators().iter().map(|op| op.symbol()).collect();
    println!();
    println!("🌍 Sum Safari");
    println!("  Difficulty: {}", settings.difficulty());
    println!("  Operators:  {}", operators.join(" "));
    println!("  Timer:      {}", format_countdown(settings.timer_duration_secs()));
    println!("Type start to begin, or help for options.");
}

fn render(snapshot: &GameSnapshot, rules: &ScoringRules) {
    match snapshot.view {
        View::Settings => {}
        View::Game => {
            println!();
            if let Some(problem) = &snapshot.problem {
                println!(
                    "{}  ⏱ {}  ⭐ {}",
                    problem.animal(),
                    snapshot.formatted_time,
                    snapshot.current_score
                );
                println!("  {}", problem.question());
            }
            if let Some(hint) = &snapshot.hint {
                println!("  💡 {}", hint.message);
            }
            if snapshot.show_feedback {
                println!("  (answered; press Enter for the next problem)");
            }
        }
        View::Results => {
            println!();
            println!("🏁 Safari complete!");
            if let Some(summary) = &snapshot.score_summary {
                for line in score_breakdown_lines(summary, rules) {
                    println!("  {line}");
                }
            }
            if !snapshot.animals_collected.is_empty() {
                println!("  Animals spotted: {}", snapshot.animals_collected.join(" "));
            }
            println!("Type new to play again or menu to change settings.");
        }
    }
}

fn print_help(view: View) {
    match view {
        View::Settings => {
            println!("start | difficulty <easy|medium|hard> | ops <+ - x /> | toggle <op>");
            println!("timer <seconds> | defaults | quit");
        }
        View::Game => {
            println!("<number> answer | Enter continue | s skip | h hint | d dismiss hint");
            println!("t status | end | menu | quit");
        }
        View::Results => println!("new | menu | quit"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use safari_core::GenerateError;
    use safari_core::time::fixed_now;
    use services::Clock;
    use storage::repository::{KeyValueStore, Storage, StorageError};

    /// Reads succeed with nothing stored; every write fails.
    struct FailingStore;

    #[async_trait]
    impl KeyValueStore for FailingStore {
        async fn save(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Connection("database is locked".into()))
        }

        async fn load(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        async fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Connection("database is locked".into()))
        }
    }

    #[tokio::test]
    async fn failed_saves_keep_the_game_going() {
        let storage = Storage {
            kv: Arc::new(FailingStore),
        };
        let services = GameServices::new(&storage, Clock::fixed(fixed_now()));

        assert!(dispatch(&services, Input::Timer(90)).await.unwrap());
        assert_eq!(services.settings().current().timer_duration_secs(), 90);

        assert!(dispatch(&services, Input::Start).await.unwrap());
        assert_eq!(services.sessions().view(), View::Game);

        let answer = services.sessions().snapshot().problem.unwrap().answer();
        assert!(dispatch(&services, Input::Answer(answer)).await.unwrap());
        let snapshot = services.sessions().snapshot();
        assert!(snapshot.current_score > 0);
        assert_eq!(snapshot.session.unwrap().results().len(), 1);

        assert!(dispatch(&services, Input::Menu).await.unwrap());
        assert_eq!(services.sessions().view(), View::Settings);
        assert!(!dispatch(&services, Input::Quit).await.unwrap());
    }

    #[test]
    fn only_storage_errors_are_recoverable() {
        let storage = StorageError::Connection("busy".into());
        assert!(is_storage_failure(&SessionError::from(storage)));
        let storage = StorageError::Serialization("bad".into());
        assert!(is_storage_failure(&SettingsError::from(storage)));
        assert!(!is_storage_failure(&SessionError::from(
            GenerateError::NoOperators
        )));
        assert!(!is_storage_failure(&std::io::Error::other("stdin closed")));
    }

    #[test]
    fn numbers_are_answers() {
        assert_eq!(Input::parse("42"), Input::Answer(42.0));
        assert_eq!(Input::parse(" -3.5 "), Input::Answer(-3.5));
    }

    #[test]
    fn blank_line_continues() {
        assert_eq!(Input::parse(""), Input::Continue);
        assert_eq!(Input::parse("   "), Input::Continue);
    }

    #[test]
    fn settings_commands_parse_arguments() {
        assert_eq!(
            Input::parse("difficulty Hard"),
            Input::Difficulty(Difficulty::Hard)
        );
        assert_eq!(
            Input::parse("ops + x /"),
            Input::Operators(vec![Operator::Add, Operator::Multiply, Operator::Divide])
        );
        assert_eq!(Input::parse("toggle -"), Input::Toggle(Operator::Subtract));
        assert_eq!(Input::parse("timer 90"), Input::Timer(90));
    }

    #[test]
    fn malformed_commands_are_unknown() {
        assert!(matches!(Input::parse("ops"), Input::Unknown(_)));
        assert!(matches!(Input::parse("ops + %"), Input::Unknown(_)));
        assert!(matches!(Input::parse("timer soon"), Input::Unknown(_)));
        assert!(matches!(Input::parse("difficulty"), Input::Unknown(_)));
    }
}
