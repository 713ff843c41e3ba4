use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use taskrank_core::time::today_in;
use taskrank_core::{AnalysisStore, StoreError, Strategy, Weights, analyze_records, suggest};
use taskrank_ingest::{AnalysisRequest, parse_request_json, read_request};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;
mod report;
mod state;

#[derive(Parser, Debug)]
#[command(
    name = "taskrank",
    version,
    about = "Rank tasks by urgency, importance, effort and dependencies"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score and rank tasks from a JSON or CSV file (JSON on stdin when omitted)
    Analyze {
        /// Task file: JSON array, {"tasks": [...]} envelope, or .csv export
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// smart_balance | deadline_driven | high_impact | fastest_wins
        #[arg(long)]
        strategy: Option<String>,

        /// Custom weights as JSON, e.g. '{"urgency": 2, "importance": 1}'
        #[arg(long)]
        weights: Option<String>,

        /// Reference date (YYYY-MM-DD) instead of today
        #[arg(long)]
        today: Option<NaiveDate>,

        /// IANA timezone used to resolve today (overrides config)
        #[arg(long)]
        tz: Option<String>,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,

        /// Limit number of tasks printed
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show the top 3 tasks from the last analysis
    Suggest {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage ~/.taskrank/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config file if none exists
    Init,

    /// Print the effective configuration
    Show,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Analyze {
            input,
            strategy,
            weights,
            today,
            tz,
            json,
            limit,
        } => {
            let cfg = config::load_config()?;
            let request = load_request(input)?;

            let strategy_name = strategy
                .or_else(|| request.strategy.clone())
                .unwrap_or_else(|| cfg.analysis.strategy.clone());
            let strategy = Strategy::from_name(&strategy_name);
            if strategy.as_str() != strategy_name {
                debug!(requested = %strategy_name, using = %strategy, "unknown strategy");
            }

            let custom = pick_weights(weights.as_deref(), &request, cfg.analysis.weights)?;
            let today = match today {
                Some(d) => d,
                None => today_in(tz.as_deref().unwrap_or(&cfg.analysis.timezone))?,
            };

            let result = analyze_records(&request.records, strategy, custom, today);

            let mut store = state::FileStore::new(state::last_analysis_path()?);
            store.store_latest(&result)?;
            debug!(path = %store.path().display(), "stored last analysis");

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", report::render_ranking(&result, today, limit));
            }
        }

        Command::Suggest { json } => {
            let store = state::FileStore::new(state::last_analysis_path()?);
            let suggestion = match suggest(&store) {
                Ok(s) => s,
                Err(StoreError::NoPriorAnalysis) => {
                    bail!("No analyzed tasks found. Run `taskrank analyze` first.")
                }
                Err(e) => return Err(e.into()),
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&suggestion)?);
            } else {
                print!("{}", report::render_suggestion(&suggestion));
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = config::load_config()?;
                println!("# {}", config::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn load_request(input: Option<PathBuf>) -> Result<AnalysisRequest> {
    match input {
        Some(path) => read_request(&path),
        None => {
            let mut s = String::new();
            std::io::stdin()
                .read_to_string(&mut s)
                .context("read tasks from stdin")?;
            parse_request_json(&s).context("parsing stdin")
        }
    }
}

/// `--weights` beats weights in the payload, which beat the config file.
fn pick_weights(
    flag: Option<&str>,
    request: &AnalysisRequest,
    configured: Option<Weights>,
) -> Result<Option<Weights>> {
    if let Some(raw) = flag {
        let value: serde_json::Value =
            serde_json::from_str(raw).with_context(|| format!("invalid --weights json: {raw}"))?;
        return Ok(Weights::from_value(&value));
    }
    if let Some(value) = &request.weights {
        return Ok(Weights::from_value(value));
    }
    Ok(configured)
}
