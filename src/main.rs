//! Biotrend CLI
//!
//! Runs one analysis over a user's reading history and prints the aggregate
//! blocks a downstream summarizer consumes.

use anyhow::{anyhow, Context, Result};
use biotrend::{
    analyze, classify, config::Config, engine::Resolution, report::AnalysisRequest,
    store::{ReadingStore, SqliteStore},
    VERSION,
};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "biotrend")]
#[command(version = VERSION)]
#[command(about = "Biomarker time-series aggregation and trend engine", long_about = None)]
struct Cli {
    /// Path to the readings database (defaults to the configured path)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a full analysis for one user and print the report
    Analyze {
        /// User to analyze
        #[arg(long)]
        user: i64,

        /// First day of the window, inclusive (default: window-days ago)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last day of the window, inclusive (default: today)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Resampling resolution, e.g. 1h, 15m, 30s
        #[arg(long)]
        resolution: Option<String>,

        /// Annotate each resampled point with its healthy-range category
        #[arg(long)]
        classified: bool,

        /// Emit the report as JSON instead of text blocks
        #[arg(long)]
        json: bool,
    },

    /// Classify a single value against an element's reference range
    Classify {
        element: String,
        value: f64,
    },

    /// List user ids with recorded readings
    Users,

    /// Show configuration
    Config,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    let db_path = cli.db.unwrap_or_else(|| config.database_path.clone());

    match cli.command {
        Commands::Analyze {
            user,
            from,
            to,
            resolution,
            classified,
            json,
        } => {
            let store = SqliteStore::open(&db_path)
                .with_context(|| format!("opening store at {}", db_path.display()))?;

            let resolution = match resolution {
                Some(s) => Resolution::parse(&s).ok_or_else(|| anyhow!("bad resolution {s:?}"))?,
                None => config.parse_resolution()?,
            };
            let today = Local::now().date_naive();
            let last = to.unwrap_or(today);
            let first = from.unwrap_or_else(|| {
                last - chrono::Duration::days(i64::from(config.analysis_window_days))
            });

            let request = AnalysisRequest::inclusive(user, first, last, resolution);
            let report = analyze(&store, &request)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }

            let blocks = if classified {
                report.render_classified_series(&store)?
            } else {
                report.render_series()
            };
            for block in blocks {
                println!("{block}");
            }
            println!("{}", report.render_stats());
            if report.dropped_rows > 0 {
                eprintln!(
                    "note: {} row(s) dropped for unparseable timestamps",
                    report.dropped_rows
                );
            }
        }

        Commands::Classify { element, value } => {
            let store = SqliteStore::open(&db_path)
                .with_context(|| format!("opening store at {}", db_path.display()))?;
            let category = classify::classify(&store, &element, value)?;
            println!("{element} = {value}: {category}");
        }

        Commands::Users => {
            let store = SqliteStore::open(&db_path)
                .with_context(|| format!("opening store at {}", db_path.display()))?;
            for id in store.user_ids()? {
                println!("{id}");
            }
        }

        Commands::Config => {
            println!("Config file: {}", Config::config_path().display());
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
