use std::fmt;
use std::path::PathBuf;

use services::{AppConfig, AppServices, Clock};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod console;
mod screens;

use console::Console;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

/// Command-line overrides; anything unset comes from the environment.
#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    questions: Option<PathBuf>,
    server: Option<String>,
    db_url: Option<String>,
    help: bool,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--questions" => {
                    parsed.questions = Some(require_value(args, "--questions")?.into());
                }
                "--server" => parsed.server = Some(require_value(args, "--server")?),
                "--db" => {
                    let raw = require_value(args, "--db")?;
                    parsed.db_url = Some(normalize_sqlite_url(raw));
                }
                "--help" | "-h" => parsed.help = true,
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }
        Ok(parsed)
    }

    fn apply(self, mut config: AppConfig) -> Result<AppConfig, Box<dyn std::error::Error>> {
        if let Some(path) = self.questions {
            config = config.with_questions_path(path);
        }
        if let Some(server) = self.server {
            config = config.with_server_url(server)?;
        }
        if let Some(db_url) = self.db_url {
            config = config.with_db_url(db_url);
        }
        Ok(config)
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--questions <path>] [--server <url>] [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --questions questions.json");
    eprintln!("  --db sqlite://civics.sqlite3");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  CIVICS_QUESTIONS_PATH, CIVICS_SERVER_URL, CIVICS_DB_URL,");
    eprintln!("  CIVICS_AI_API_KEY, CIVICS_AI_BASE_URL, CIVICS_AI_MODEL,");
    eprintln!("  CIVICS_EVALUATION_FALLBACK, RUST_LOG");
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

// Logs go to stderr so they never interleave with prompts on stdout.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_tracing();

    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    if args.help {
        print_usage();
        return Ok(());
    }

    let config = args.apply(AppConfig::from_env()?)?;
    prepare_sqlite_file(&config.db_url)?;
    let services = AppServices::new_sqlite(&config, Clock::default()).await?;
    tracing::debug!(db = %config.db_url, "preferences store ready");

    let theme = services.app_settings().load().await?.theme();
    let mut console = Console::stdin(theme);
    screens::main_menu(&mut console, &services).await
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

    fn parse(raw: &[&str]) -> Result<Args, ArgsError> {
        Args::parse(&mut raw.iter().map(|s| (*s).to_string()))
    }

    #[test]
    fn parses_every_flag() {
        let args = parse(&[
            "--questions",
            "data/questions.json",
            "--server",
            "http://localhost:5000",
            "--db",
            "sqlite::memory:",
        ])
        .unwrap();
        assert_eq!(args.questions, Some(PathBuf::from("data/questions.json")));
        assert_eq!(args.server.as_deref(), Some("http://localhost:5000"));
        assert_eq!(args.db_url.as_deref(), Some("sqlite::memory:"));
        assert!(!args.help);
    }

    #[test]
    fn rejects_unknown_and_incomplete_flags() {
        assert!(matches!(
            parse(&["--deck"]).unwrap_err(),
            ArgsError::UnknownArg(arg) if arg == "--deck"
        ));
        assert!(matches!(
            parse(&["--server"]).unwrap_err(),
            ArgsError::MissingValue { flag: "--server" }
        ));
    }

    #[test]
    fn relative_db_paths_become_absolute_urls() {
        let url = normalize_sqlite_url("sqlite:civics.sqlite3".into());
        assert!(url.starts_with("sqlite:///"));
        assert!(url.ends_with("civics.sqlite3"));
        assert_eq!(
            normalize_sqlite_url("sqlite://already.db".into()),
            "sqlite://already.db"
        );
    }

    #[test]
    fn overrides_replace_environment_values() {
        let args = parse(&["--questions", "q.json", "--db", "sqlite::memory:"]).unwrap();
        let config = args.apply(AppConfig::default()).unwrap();
        assert_eq!(config.questions_path, PathBuf::from("q.json"));
        assert_eq!(config.db_url, "sqlite::memory:");

        let args = parse(&["--server", "nope"]).unwrap();
        assert!(args.apply(AppConfig::default()).is_err());
    }
}
