//! TIPSTER: community pick analytics
//!
//! Entry point. Loads configuration, initialises structured logging,
//! builds the configured pick source and runs one report, printing it
//! to stdout as pretty JSON. Logs go to stderr.

use anyhow::Result;
use clap::{Parser, Subcommand};
use secrecy::SecretString;
use tracing::info;

use tipster::config::{self, SourceConfig};
use tipster::engine::AnalysisEngine;
use tipster::sources::json_file::JsonFileSource;
use tipster::sources::supabase::SupabaseSource;
use tipster::sources::PickSource;

const BANNER: &str = r#"
 _____ ___ ____  ____ _____ _____ ____
|_   _|_ _|  _ \/ ___|_   _| ____|  _ \
  | |  | || |_) \___ \ | | |  _| | |_) |
  | |  | ||  __/ ___) || | | |___|  _ <
  |_| |___|_|   |____/ |_| |_____|_| \_\

  Community pick analytics v0.1.0
"#;

/// Community pick analytics
#[derive(Parser, Debug)]
#[command(name = "tipster")]
#[command(author, version, about = "Pattern and EV reports over community picks")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Only analyze picks posted by this owner
    #[arg(long, global = true)]
    owner: Option<String>,

    /// Path to the TOML configuration file
    #[arg(long, global = true, env = "TIPSTER_CONFIG", default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Streaks, trend breaks, line outliers and regression candidates (default)
    Patterns,
    /// Expected-value report with owner, sport and day rollups
    Ev,
}

impl Cli {
    fn command(&self) -> Command {
        self.command.unwrap_or(Command::Patterns)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let args = Cli::parse();

    let cfg = config::AppConfig::load(&args.config)?;

    init_logging();

    eprintln!("{BANNER}");
    info!(
        command = ?args.command(),
        owner = ?args.owner,
        days_back = cfg.analysis.days_back,
        min_sample_size = cfg.analysis.min_sample_size,
        confidence_threshold = cfg.analysis.confidence_threshold,
        "TIPSTER starting"
    );

    let source = build_source(&cfg.source)?;
    let engine = AnalysisEngine::new(source, cfg.analysis.clone(), cfg.detectors.clone());

    let output = match args.command() {
        Command::Patterns => {
            let summary = engine.analyze_patterns(args.owner.as_deref()).await;
            info!(summary = %summary, "Pattern analysis complete");
            serde_json::to_string_pretty(&summary)?
        }
        Command::Ev => {
            let report = engine.ev_report(args.owner.as_deref()).await;
            info!(
                picks = report.total_picks,
                positive = report.positive_ev_count,
                avg_ev = format!("{:.2}%", report.avg_ev_percentage),
                "EV report complete"
            );
            serde_json::to_string_pretty(&report)?
        }
    };

    println!("{output}");
    Ok(())
}

/// Construct the pick source named in the config.
fn build_source(cfg: &SourceConfig) -> Result<Box<dyn PickSource>> {
    match cfg {
        SourceConfig::Json { path } => {
            info!(path = %path, "Using JSON file pick source");
            Ok(Box::new(JsonFileSource::new(path)))
        }
        SourceConfig::Supabase { url, table, api_key_env, page_size } => {
            let key = config::AppConfig::resolve_env(api_key_env)?;
            info!(url = %url, table = %table, "Using Supabase pick source");
            Ok(Box::new(SupabaseSource::new(
                url,
                table,
                SecretString::new(key),
                *page_size,
            )?))
        }
    }
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tipster=info"));

    let json_logging = std::env::var("TIPSTER_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}
