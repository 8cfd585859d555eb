use std::path::{Path, PathBuf};

use services::{Clock, GameServices};
use storage::repository::Storage;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod terminal;

const DEFAULT_DB_FILE: &str = "sum-safari.sqlite3";
const DB_ENV: &str = "SAFARI_DB_URL";

#[derive(Debug, Error, PartialEq, Eq)]
enum CliError {
    #[error("{flag} requires a value")]
    MissingValue { flag: &'static str },
    #[error("unknown argument: {0}")]
    UnknownArg(String),
    #[error("unknown subcommand: {0}")]
    UnknownCommand(String),
    #[error("invalid database location: {0:?}")]
    InvalidDb(String),
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  sum-safari [play] [--db <path|sqlite_url> | --memory]");
    eprintln!("  sum-safari reset  [--db <path|sqlite_url>]");
    eprintln!();
    eprintln!("The saved game and settings live in {DEFAULT_DB_FILE} unless --db or");
    eprintln!("{DB_ENV} says otherwise. RUST_LOG controls diagnostics on stderr.");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Command {
    #[default]
    Play,
    Reset,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Backend {
    Sqlite(PathBuf),
    Memory,
}

#[derive(Debug, PartialEq, Eq)]
struct Cli {
    command: Command,
    backend: Backend,
}

impl Cli {
    /// Parse arguments (without the program name). `env_db` is the value of
    /// `SAFARI_DB_URL`, which `--db` overrides.
    fn parse<I>(args: I, env_db: Option<String>) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter().peekable();
        let mut command = match args.peek().map(String::as_str) {
            Some("play") => Command::Play,
            Some("reset") => Command::Reset,
            Some(first) if !first.starts_with('-') => {
                return Err(CliError::UnknownCommand(first.to_owned()));
            }
            _ => Command::default(),
        };
        if matches!(args.peek().map(String::as_str), Some("play" | "reset")) {
            args.next();
        }

        let mut db = env_db.filter(|value| !value.trim().is_empty());
        let mut memory = false;
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = args.next().ok_or(CliError::MissingValue { flag: "--db" })?;
                    db = Some(value);
                }
                "--memory" => memory = true,
                "--help" | "-h" => command = Command::Help,
                _ => return Err(CliError::UnknownArg(arg)),
            }
        }

        let backend = if memory {
            Backend::Memory
        } else {
            Backend::Sqlite(db_path(db.as_deref().unwrap_or(DEFAULT_DB_FILE))?)
        };
        Ok(Self { command, backend })
    }
}

/// Accepts a bare path or a `sqlite:` URL and returns an absolute file path.
fn db_path(raw: &str) -> Result<PathBuf, CliError> {
    let trimmed = raw.trim();
    let path = trimmed
        .strip_prefix("sqlite://")
        .or_else(|| trimmed.strip_prefix("sqlite:"))
        .unwrap_or(trimmed);
    let path = path.split('?').next().unwrap_or_default();
    if path.is_empty() || path.starts_with(':') {
        return Err(CliError::InvalidDb(raw.to_owned()));
    }

    let path = Path::new(path);
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    Ok(cwd.join(path))
}

async fn open_storage(backend: &Backend) -> Result<Storage, Box<dyn std::error::Error>> {
    match backend {
        Backend::Memory => Ok(Storage::in_memory()),
        Backend::Sqlite(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            // `mode=rwc` creates the file on first run.
            let url = format!("sqlite://{}?mode=rwc", path.display());
            Ok(Storage::sqlite(&url).await?)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse(std::env::args().skip(1), std::env::var(DB_ENV).ok()).inspect_err(|_| {
        print_usage();
    })?;
    if cli.command == Command::Help {
        print_usage();
        return Ok(());
    }

    let storage = open_storage(&cli.backend).await?;
    let services = GameServices::new(&storage, Clock::system());

    match cli.command {
        Command::Play | Command::Help => {
            info!(backend = ?cli.backend, "starting");
            terminal::run(services).await
        }
        Command::Reset => {
            services.sessions().reset_game().await?;
            println!("Saved game cleared.");
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("sum-safari: {err}");
        std::process::exit(2);
    }
}
