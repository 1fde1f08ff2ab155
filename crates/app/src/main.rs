use std::fmt;

use services::{AppServices, DatasetSourceConfig, sample};

mod location;
mod presenter;

use presenter::Presenter;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidDbUrl { raw: String },
    MissingOverrideAction,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::MissingOverrideAction => {
                write!(f, "override requires `set <file>` or `clear`")
            }
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

struct Args {
    db_url: String,
    dataset: DatasetSourceConfig,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- play   [--db <sqlite_url>] [--dataset <url_or_path>]");
    eprintln!("  cargo run -p app -- override set <file> [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- override clear [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- reset  [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- sample");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite://quiz.sqlite3");
    eprintln!("  --dataset dataset.json");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, QUIZ_DATASET_URL, RUST_LOG");
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Play,
    OverrideSet(String),
    OverrideClear,
    Reset,
    Sample,
}

impl Command {
    /// Consume the subcommand words, leaving only flags in `args`.
    fn from_args(args: &mut Vec<String>) -> Result<Self, ArgsError> {
        let Some(first) = args.first().cloned() else {
            return Ok(Self::Play);
        };
        if first.starts_with("--") {
            return Ok(Self::Play);
        }

        args.remove(0);
        let cmd = match first.as_str() {
            "play" => Self::Play,
            "reset" => Self::Reset,
            "sample" => Self::Sample,
            "override" => {
                if args.is_empty() {
                    return Err(ArgsError::MissingOverrideAction);
                }
                match args.remove(0).as_str() {
                    "set" => {
                        let mut rest = std::mem::take(args).into_iter();
                        let path = require_value(&mut rest, "override set")?;
                        *args = rest.collect();
                        Self::OverrideSet(path)
                    }
                    "clear" => Self::OverrideClear,
                    _ => return Err(ArgsError::MissingOverrideAction),
                }
            }
            _ => return Err(ArgsError::UnknownCommand(first)),
        };
        Ok(cmd)
    }
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("QUIZ_DB_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| "sqlite://quiz.sqlite3".into(), normalize_sqlite_url);
        let mut dataset = DatasetSourceConfig::from_env();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--dataset" => {
                    dataset = DatasetSourceConfig::new(require_value(args, "--dataset")?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { db_url, dataset })
    }
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
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
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

fn setup_logging() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    if matches!(argv.first().map(String::as_str), Some("--help" | "-h")) {
        print_usage();
        return Ok(());
    }

    let cmd = Command::from_args(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    if cmd == Command::Sample {
        println!("{}", sample::sample_json());
        return Ok(());
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;
    let services = AppServices::new_sqlite(&parsed.db_url, &parsed.dataset).await?;
    let quiz = services.quiz();
    log::info!(
        "db={} dataset={}",
        parsed.db_url,
        quiz.dataset_location()
    );

    match cmd {
        Command::Play => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            Presenter::new(quiz, stdin, std::io::stdout()).run().await
        }
        Command::OverrideSet(path) => {
            let raw = std::fs::read_to_string(&path)?;
            let count = quiz.submit_override(&raw).await?;
            println!("stored local dataset from {path} ({count} records)");
            Ok(())
        }
        Command::OverrideClear => {
            quiz.clear_override().await?;
            println!("local dataset removed");
            Ok(())
        }
        Command::Reset => {
            quiz.reset_progress().await?;
            println!("progress cleared");
            Ok(())
        }
        Command::Sample => Ok(()),
    }
}

#[tokio::main]
async fn main() {
    setup_logging();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn play_is_the_default_command() {
        let mut args = argv(&[]);
        assert_eq!(Command::from_args(&mut args).unwrap(), Command::Play);

        let mut args = argv(&["--db", "sqlite::memory:"]);
        assert_eq!(Command::from_args(&mut args).unwrap(), Command::Play);
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn parses_override_actions() {
        let mut args = argv(&["override", "set", "mine.json", "--db", "sqlite::memory:"]);
        assert_eq!(
            Command::from_args(&mut args).unwrap(),
            Command::OverrideSet("mine.json".into())
        );
        assert_eq!(args, argv(&["--db", "sqlite::memory:"]));

        let mut args = argv(&["override", "clear"]);
        assert_eq!(
            Command::from_args(&mut args).unwrap(),
            Command::OverrideClear
        );

        let mut args = argv(&["override"]);
        assert!(matches!(
            Command::from_args(&mut args),
            Err(ArgsError::MissingOverrideAction)
        ));

        let mut args = argv(&["override", "set"]);
        assert!(matches!(
            Command::from_args(&mut args),
            Err(ArgsError::MissingValue { .. })
        ));
    }

    #[test]
    fn unknown_subcommand_is_reported() {
        let mut args = argv(&["dance"]);
        assert!(matches!(
            Command::from_args(&mut args),
            Err(ArgsError::UnknownCommand(cmd)) if cmd == "dance"
        ));
    }

    #[test]
    fn flags_override_defaults() {
        let mut iter = argv(&["--db", "sqlite::memory:", "--dataset", "https://example.org/q.json"])
            .into_iter();
        let parsed = Args::parse(&mut iter).unwrap();

        assert_eq!(parsed.db_url, "sqlite::memory:");
        assert!(parsed.dataset.is_http());
    }

    #[test]
    fn relative_db_paths_become_absolute_urls() {
        let url = normalize_sqlite_url("sqlite:quiz.sqlite3".into());
        assert!(url.starts_with("sqlite:///"));
        assert!(url.ends_with("/quiz.sqlite3"));
        assert_eq!(
            normalize_sqlite_url("sqlite://already.db".into()),
            "sqlite://already.db"
        );
    }
}
