//! Command-line front end for paddock.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use paddock::{
    FixtureProvider, OpenF1Provider, PaddockConfig, RunContext, RunOutcome, SessionAnalyzer,
    SessionQuery, SqliteSink, TimingProvider,
};

#[derive(Debug, Parser)]
#[command(name = "paddock", version, about = "Tire-compound lap analysis for open timing data")]
struct Cli {
    /// YAML configuration file
    #[arg(long, env = "PADDOCK_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// SQLite database file (overrides the config file)
    #[arg(long, env = "PADDOCK_DATABASE", global = true)]
    database: Option<PathBuf>,

    /// Timing API root URL (overrides the config file)
    #[arg(long, env = "PADDOCK_API_URL", global = true)]
    api_url: Option<String>,

    /// Serve timing data from a saved session directory instead of the API
    #[arg(long, global = true)]
    fixture_dir: Option<PathBuf>,

    /// Do not store the analysis
    #[arg(long, global = true)]
    no_persist: bool,

    /// Log level for paddock (trace, debug, info, warn, error); overrides RUST_LOG
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analyze one session and print its report
    Analyze {
        /// Circuit short name, e.g. "spielberg"
        #[arg(long)]
        track: String,
        /// Session name, e.g. "practice 2"
        #[arg(long)]
        session: String,
        #[arg(long)]
        year: i32,
    },
    /// List the tracks raced in a season
    Tracks {
        #[arg(long)]
        year: i32,
    },
    /// Delete a stored session and its analysis
    Delete {
        #[arg(long)]
        session_id: i64,
    },
    /// Show the most recently stored session
    Latest,
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(format!("paddock={}", level)),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("paddock=info")),
    };

    tracing_subscriber::registry().with(filter).with(fmt::layer().with_writer(std::io::stderr)).init();
}

fn load_config(cli: &Cli) -> Result<PaddockConfig> {
    let mut config = match &cli.config {
        Some(path) => PaddockConfig::from_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => PaddockConfig::default(),
    };

    if let Some(database) = &cli.database {
        config.database_path = database.clone();
    }
    if let Some(url) = &cli.api_url {
        config.api_base_url = url.clone();
    }
    if cli.no_persist {
        config.persist = false;
    }
    Ok(config)
}

fn provider(cli: &Cli, config: &PaddockConfig) -> Result<Arc<dyn TimingProvider>> {
    match &cli.fixture_dir {
        Some(dir) => {
            let fixture = FixtureProvider::from_dir(dir)
                .with_context(|| format!("failed to load fixture directory {}", dir.display()))?;
            Ok(Arc::new(fixture))
        }
        None => Ok(Arc::new(OpenF1Provider::from_config(config).context("failed to build API client")?)),
    }
}

async fn open_store(config: &PaddockConfig) -> Result<SqliteSink> {
    SqliteSink::open(&config.database_path)
        .await
        .with_context(|| format!("failed to open database {}", config.database_path.display()))
}

async fn analyze(cli: &Cli, config: &PaddockConfig, query: SessionQuery) -> Result<ExitCode> {
    let mut analyzer = SessionAnalyzer::new(provider(cli, config)?).with_policy(config.outlier_policy);
    if config.persist {
        analyzer = analyzer.with_sink(Arc::new(open_store(config).await?));
    }

    let ctx = RunContext::new(query);
    match analyzer.run(&ctx).await.context("session analysis failed")? {
        RunOutcome::SessionNotFound => {
            let query = ctx.query();
            eprintln!("No session '{}' found at '{}' for {}.", query.session, query.track, query.year);
            Ok(ExitCode::from(2))
        }
        RunOutcome::Completed(run) => {
            if config.print_report {
                println!("{}", run.report(ctx.query()));
            }
            if let Some(id) = run.stored_session_id {
                info!(session_id = id, "Analysis stored");
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());
    let config = load_config(&cli)?;

    match &cli.command {
        Command::Analyze { track, session, year } => {
            let query = SessionQuery::new(track.as_str(), session.as_str(), *year)?;
            analyze(&cli, &config, query).await
        }
        Command::Tracks { year } => {
            let tracks = provider(&cli, &config)?.list_meetings(*year).await.context("failed to list tracks")?;
            if tracks.is_empty() {
                eprintln!("No tracks found for {}.", year);
                return Ok(ExitCode::from(2));
            }
            println!("Available Tracks:");
            for (index, track) in tracks.iter().enumerate() {
                println!("{}. {}", index + 1, track);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Delete { session_id } => {
            let store = open_store(&config).await?;
            if store.delete_session(*session_id).await? {
                println!("Deleted session {}.", session_id);
                Ok(ExitCode::SUCCESS)
            } else {
                eprintln!("No stored session with id {}.", session_id);
                Ok(ExitCode::from(2))
            }
        }
        Command::Latest => {
            let store = open_store(&config).await?;
            match store.latest_session().await? {
                Some(latest) => {
                    println!(
                        "{}: {} at {}, {}",
                        latest.session_id, latest.session_name, latest.event_name, latest.year
                    );
                    Ok(ExitCode::SUCCESS)
                }
                None => {
                    eprintln!("No stored sessions.");
                    Ok(ExitCode::from(2))
                }
            }
        }
    }
}
