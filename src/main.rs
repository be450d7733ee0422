use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use halnav::client::http::format_fetch_error;
use halnav::{walk, Config, Hal, HalError, HttpHalClient, Outcome, Step, VarValue, Variables};
use serde_json::Value;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Navigate a HAL+JSON API by relation
#[derive(Parser, Debug)]
#[command(name = "halnav", version, about, long_about = None)]
struct Args {
    /// API root URL (defaults to root_url from the config file)
    url: Option<String>,

    /// Relation or property to resolve, in order; `rel[2]` picks an element
    #[arg(short, long = "follow", value_name = "STEP")]
    follow: Vec<Step>,

    /// Template variable for templated links (repeat a key to build a list)
    #[arg(short = 'v', long = "var", value_name = "KEY=VALUE", value_parser = parse_var)]
    vars: Vec<(String, String)>,

    /// Print only this property of the final resource
    #[arg(short, long)]
    prop: Option<String>,

    /// Remember URL as the default root
    #[arg(long)]
    save_root: bool,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,

    /// Write logs to halnav.log in the config directory instead of stderr
    #[arg(long)]
    log_file: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn parse_var(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got {:?}", s)),
    }
}

/// Repeated keys become list values, in the order given
fn build_variables(pairs: &[(String, String)]) -> Variables {
    let mut vars = Variables::new();
    for (key, value) in pairs {
        let merged = match vars.get(key) {
            Some(VarValue::String(first)) => VarValue::List(vec![first.clone(), value.clone()]),
            Some(VarValue::List(items)) => {
                let mut items = items.clone();
                items.push(value.clone());
                VarValue::List(items)
            }
            _ => VarValue::String(value.clone()),
        };
        vars.insert(key.clone(), merged);
    }
    vars
}

fn setup_logging(level: LogLevel, to_file: bool) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_file = if to_file {
        let log_path = get_log_path();
        if let Some(parent) = log_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
        {
            Ok(file) => Some((file, log_path)),
            Err(err) => {
                eprintln!("Cannot open log file {:?}: {}, logging to stderr", log_path, err);
                None
            }
        }
    } else {
        None
    };

    let (non_blocking, guard, log_path) = match log_file {
        Some((file, path)) => {
            let (writer, guard) = tracing_appender::non_blocking(file);
            (writer, guard, Some(path))
        }
        None => {
            let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());
            (writer, guard, None)
        }
    };

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(tracing_level).into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("halnav started with log level: {:?}", level);
    if let Some(path) = log_path {
        tracing::info!("Log file: {:?}", path);
    }

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("halnav").join("halnav.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".halnav").join("halnav.log");
    }
    PathBuf::from("halnav.log")
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level, args.log_file);

    if let Err(err) = run(args).await {
        eprintln!("Error: {err:?}");
        if let Some(HalError::Fetch(fetch)) = err.chain().find_map(|e| e.downcast_ref::<HalError>()) {
            eprintln!("{}", format_fetch_error(fetch));
        }
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let mut config = Config::load();

    let Some(url) = config.effective_root_url(args.url.as_deref()) else {
        anyhow::bail!(
            "No root URL. Pass one as an argument or set root_url in {:?}",
            Config::config_path()
        );
    };

    if args.save_root {
        config.set_root_url(&url).context("Failed to save config")?;
    }

    let client =
        HttpHalClient::with_options(&config.http_options()).context("Failed to create HTTP client")?;
    let hal = Hal::new(client);
    let variables = build_variables(&args.vars);

    let root = hal
        .load(&url)
        .await
        .with_context(|| format!("Failed to load {}", url))?;

    let output = match walk(root, &args.follow, &variables).await? {
        Outcome::Resource(resource) => match &args.prop {
            Some(name) => resource
                .prop(name)
                .cloned()
                .with_context(|| format!("Property {} not found on {}", name, resource.base_url()))?,
            None => Value::Object(resource.into_document()),
        },
        Outcome::Value(value) => {
            if args.prop.is_some() {
                anyhow::bail!("--prop needs the walk to end on a resource, not a property");
            }
            value
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
