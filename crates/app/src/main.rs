use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{ApiConfig, AppServices, Clock};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use ui::{App, ChatStyle, UiApp, build_app_context};

const DEFAULT_DB_URL: &str = "sqlite://tutor.sqlite3";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidApiUrl { raw: String },
    InvalidChatStyle { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidApiUrl { raw } => write!(f, "invalid --api-url value: {raw}"),
            ArgsError::InvalidChatStyle { raw } => {
                write!(f, "invalid --chat value: {raw} (expected scaffolding or polya)")
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

struct DesktopApp {
    services: AppServices,
    chat_style: ChatStyle,
}

impl UiApp for DesktopApp {
    fn services(&self) -> AppServices {
        self.services.clone()
    }

    fn chat_style(&self) -> ChatStyle {
        self.chat_style
    }
}

#[derive(Debug, PartialEq)]
struct Args {
    db_url: String,
    api_url: Option<String>,
    chat_style: ChatStyle,
    help: bool,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p tutor -- [--db <sqlite_url>] [--api-url <url>] [--chat <style>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!("  --api-url {}", services::config::DEFAULT_API_URL);
    eprintln!("  --chat scaffolding   (or polya)");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  TUTOR_DB_URL, TUTOR_API_URL, TUTOR_API_TIMEOUT_SECS, TUTOR_CHAT_STYLE, RUST_LOG");
}

impl Args {
    /// Defaults come from the environment; flags override them.
    fn parse(
        args: &mut impl Iterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut db_url = env("TUTOR_DB_URL")
            .map_or_else(|| DEFAULT_DB_URL.to_string(), normalize_sqlite_url);
        let mut chat_style = match env("TUTOR_CHAT_STYLE") {
            Some(raw) => parse_chat_style(raw)?,
            None => ChatStyle::default(),
        };
        let mut api_url = None;
        let mut help = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--api-url" => {
                    let value = require_value(args, "--api-url")?;
                    if !(value.starts_with("http://") || value.starts_with("https://")) {
                        return Err(ArgsError::InvalidApiUrl { raw: value });
                    }
                    api_url = Some(value);
                }
                "--chat" => {
                    chat_style = parse_chat_style(require_value(args, "--chat")?)?;
                }
                "--help" | "-h" => help = true,
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            api_url,
            chat_style,
            help,
        })
    }
}

fn parse_chat_style(raw: String) -> Result<ChatStyle, ArgsError> {
    raw.parse()
        .map_err(|_| ArgsError::InvalidChatStyle { raw })
}

/// Accept bare paths and `sqlite:` URLs; relative paths resolve against the working directory.
fn normalize_sqlite_url(raw: String) -> String {
    let raw = raw.trim();
    if raw.contains(":memory:") || raw.starts_with("sqlite://") {
        return raw.to_string();
    }
    let path = Path::new(raw.strip_prefix("sqlite:").unwrap_or(raw));
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// The file behind a `sqlite://` URL, or `None` for in-memory databases.
fn sqlite_file_path(db_url: &str) -> Result<Option<PathBuf>, ArgsError> {
    if db_url.contains(":memory:") {
        return Ok(None);
    }
    let invalid = || ArgsError::InvalidDbUrl {
        raw: db_url.to_string(),
    };
    let rest = db_url.strip_prefix("sqlite://").ok_or_else(invalid)?;
    match rest.split('?').next() {
        Some(path) if !path.is_empty() => Ok(Some(PathBuf::from(path))),
        _ => Err(invalid()),
    }
}

/// sqlx refuses to open a missing file, so create it (and its directory) first.
fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let Some(path) = sqlite_file_path(db_url)? else {
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?;
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv, |key| std::env::var(key).ok()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    if parsed.help {
        print_usage();
        return Ok(());
    }

    init_tracing();

    let mut api_config = ApiConfig::from_env();
    if let Some(url) = parsed.api_url {
        api_config = api_config.with_base_url(url);
    }
    tracing::info!(
        db = %parsed.db_url,
        api = %api_config.base_url,
        chat = %parsed.chat_style,
        "starting tutor"
    );

    // Schema setup stays in the binary glue; services only see a ready store.
    prepare_sqlite_file(&parsed.db_url)?;
    let services = AppServices::new_sqlite(&parsed.db_url, api_config, Clock::default_clock()).await?;

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
        services,
        chat_style: parsed.chat_style,
    });
    let context = build_app_context(&app);

    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Tutor")
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
