use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::config::{parse_question_count, parse_timer_secs};
use services::{
    AppServices, AuthConfig, AuthService, CategoryService, Clock, ConfigError, ProgressService,
    QuizConfig, QuizService,
};
use tracing::info;
use tracing_subscriber::EnvFilter;
use ui::{App, DesktopLinkOpener, LinkOpenerRef, UiApp, build_app_context};

const DEFAULT_DB_URL: &str = "sqlite://trivia.sqlite3";
const MEMORY_DB_URL: &str = "sqlite::memory:";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    Config(ConfigError),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ArgsError {}

impl From<ConfigError> for ArgsError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    services: AppServices,
    link_opener: LinkOpenerRef,
}

impl UiApp for DesktopApp {
    fn quiz(&self) -> Arc<QuizService> {
        self.services.quiz()
    }

    fn categories(&self) -> Arc<CategoryService> {
        self.services.categories()
    }

    fn progress(&self) -> Arc<ProgressService> {
        self.services.progress()
    }

    fn auth(&self) -> Arc<AuthService> {
        self.services.auth()
    }

    fn link_opener(&self) -> LinkOpenerRef {
        Arc::clone(&self.link_opener)
    }
}

#[derive(Debug, PartialEq)]
enum Parsed {
    Run(Args),
    Help,
}

#[derive(Debug, PartialEq)]
struct Args {
    db_url: String,
    quiz: QuizConfig,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  trivia [--db <sqlite_url>] [--api <url>] [--questions <n>] [--timer <secs>] [--offline]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!("  --api https://opentdb.com");
    eprintln!("  --questions 10");
    eprintln!("  --timer 30");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  TRIVIA_DB_URL, TRIVIA_API_BASE_URL, TRIVIA_QUESTION_COUNT, TRIVIA_TIMER_SECS,");
    eprintln!("  TRIVIA_OFFLINE, TRIVIA_AUTH_URL, TRIVIA_AUTH_ANON_KEY, TRIVIA_AUTH_REDIRECT");
    eprintln!("  RUST_LOG (default: info)");
}

impl Args {
    /// Apply command line flags on top of the environment-derived settings.
    fn parse(
        args: &mut impl Iterator<Item = String>,
        env_db_url: Option<String>,
        mut quiz: QuizConfig,
    ) -> Result<Parsed, ArgsError> {
        let mut db_url = env_db_url
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| DEFAULT_DB_URL.into(), |value| normalize_sqlite_url(&value));

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(&value);
                }
                "--api" => {
                    let value = require_value(args, "--api")?;
                    quiz = quiz.with_api_base_url(&value)?;
                }
                "--questions" => {
                    let value = require_value(args, "--questions")?;
                    quiz.question_count = parse_question_count(&value)?;
                }
                "--timer" => {
                    let value = require_value(args, "--timer")?;
                    quiz.timer_secs = parse_timer_secs(&value)?;
                }
                "--offline" => quiz.offline = true,
                "--help" | "-h" => return Ok(Parsed::Help),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Parsed::Run(Self { db_url, quiz }))
    }
}

/// Accepts `sqlite://path`, `sqlite:path` or a bare path. Bare relative paths
/// resolve against the working directory.
fn normalize_sqlite_url(raw: &str) -> String {
    let raw = raw.trim();
    if raw == MEMORY_DB_URL || raw.starts_with("sqlite://") {
        return raw.to_string();
    }
    let path = PathBuf::from(raw.strip_prefix("sqlite:").unwrap_or(raw));
    let path = if path.is_relative() {
        std::env::current_dir().map_or(path.clone(), |cwd| cwd.join(&path))
    } else {
        path
    };
    format!("sqlite://{}", path.display())
}

/// File behind a `sqlite://` url, `None` for the in-memory database.
fn sqlite_file(db_url: &str) -> Result<Option<PathBuf>, ArgsError> {
    if db_url == MEMORY_DB_URL {
        return Ok(None);
    }
    let invalid = || ArgsError::InvalidDbUrl {
        raw: db_url.to_string(),
    };
    let rest = db_url.strip_prefix("sqlite://").ok_or_else(invalid)?;
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() {
        return Err(invalid());
    }
    Ok(Some(PathBuf::from(path)))
}

/// The database file is created on connect, but its directory must exist.
fn ensure_sqlite_dir(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let Some(path) = sqlite_file(db_url)? else {
        return Ok(());
    };
    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let env_quiz = QuizConfig::from_env()?;
    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv, std::env::var("TRIVIA_DB_URL").ok(), env_quiz)
        .inspect_err(|_| print_usage())?;
    let args = match parsed {
        Parsed::Help => {
            print_usage();
            return Ok(());
        }
        Parsed::Run(args) => args,
    };

    ensure_sqlite_dir(&args.db_url)?;
    info!(
        db = %args.db_url,
        questions = args.quiz.question_count,
        timer_secs = args.quiz.timer_secs,
        offline = args.quiz.offline,
        "starting trivia"
    );
    let services = AppServices::new_sqlite(
        &args.db_url,
        Clock::default_clock(),
        args.quiz,
        AuthConfig::from_env(),
    )
    .await?;

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
        services,
        link_opener: Arc::new(DesktopLinkOpener),
    });
    let context = build_app_context(&app);

    // On macOS, tao can default to an always-on-top window in some dev setups.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Trivia")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str], env_db: Option<&str>) -> Result<Parsed, ArgsError> {
        let mut iter = args.iter().map(|arg| (*arg).to_string());
        Args::parse(&mut iter, env_db.map(str::to_string), QuizConfig::default())
    }

    #[test]
    fn defaults_without_flags() {
        let Parsed::Run(args) = parse(&[], None).unwrap() else {
            panic!("expected run");
        };
        assert_eq!(args.db_url, DEFAULT_DB_URL);
        assert_eq!(args.quiz, QuizConfig::default());
    }

    #[test]
    fn flags_override_settings() {
        let Parsed::Run(args) = parse(
            &[
                "--db",
                "sqlite:///tmp/t.sqlite3",
                "--questions",
                "5",
                "--timer",
                "12",
                "--offline",
                "--api",
                "http://localhost:8080/",
            ],
            Some("sqlite:///ignored.sqlite3"),
        )
        .unwrap() else {
            panic!("expected run");
        };
        assert_eq!(args.db_url, "sqlite:///tmp/t.sqlite3");
        assert_eq!(args.quiz.question_count, 5);
        assert_eq!(args.quiz.timer_secs, 12);
        assert!(args.quiz.offline);
        assert_eq!(args.quiz.api_base_url, "http://localhost:8080");
    }

    #[test]
    fn env_db_url_is_used_without_flag() {
        let Parsed::Run(args) = parse(&[], Some("sqlite:///data/trivia.sqlite3")).unwrap() else {
            panic!("expected run");
        };
        assert_eq!(args.db_url, "sqlite:///data/trivia.sqlite3");
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            parse(&["--timer"], None),
            Err(ArgsError::MissingValue { flag: "--timer" })
        ));
        assert!(matches!(
            parse(&["--questions", "0"], None),
            Err(ArgsError::Config(ConfigError::OutOfRange { .. }))
        ));
        assert!(matches!(
            parse(&["--fast"], None),
            Err(ArgsError::UnknownArg(arg)) if arg == "--fast"
        ));
        assert!(matches!(parse(&["--db", " "], None), Err(ArgsError::InvalidDbUrl { .. })));
    }

    #[test]
    fn sqlite_urls_resolve_to_files() {
        assert_eq!(sqlite_file(MEMORY_DB_URL).unwrap(), None);
        assert_eq!(
            sqlite_file("sqlite:///var/trivia.db?mode=rwc").unwrap(),
            Some(PathBuf::from("/var/trivia.db"))
        );
        assert!(sqlite_file("sqlite://").is_err());
        assert!(sqlite_file("postgres://db").is_err());
    }

    #[test]
    fn bare_paths_become_absolute_urls() {
        let url = normalize_sqlite_url("data/trivia.sqlite3");
        assert!(url.starts_with("sqlite:///"), "{url}");
        assert!(url.ends_with("data/trivia.sqlite3"), "{url}");
        assert_eq!(normalize_sqlite_url(MEMORY_DB_URL), MEMORY_DB_URL);
    }

    #[test]
    fn help_short_circuits() {
        assert_eq!(parse(&["--timer", "10", "-h"], None).unwrap(), Parsed::Help);
    }
}
