mod analyze;
mod export;
mod filter;
mod progress;
mod range;
mod render;

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use revlens_core::{AppConfig, ConfigError};
use revlens_sentiment::CancellationToken;
use tracing_subscriber::EnvFilter;

use crate::range::RangeArgs;

#[derive(Debug, Parser)]
#[command(name = "revlens-cli")]
#[command(about = "Fetch place reviews, score their sentiment, and filter the results")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch and score the reviews of one location, then write them to CSV
    Analyze(AnalyzeArgs),
    /// Render a previously written reviews CSV through a range filter
    Filter(FilterArgs),
}

/// Which sentiment oracle scores the reviews.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OracleKind {
    /// Google Cloud Natural Language `analyzeSentiment`
    Google,
    /// Offline review lexicon
    Lexicon,
}

#[derive(Debug, Args)]
pub(crate) struct AnalyzeArgs {
    /// Free-text location, e.g. "blue bottle coffee mint plaza"
    #[arg(long)]
    pub location: String,

    #[arg(long, value_enum, default_value_t = OracleKind::Google)]
    pub oracle: OracleKind,

    /// Directory for the CSV output (defaults to `REVLENS_OUTPUT_DIR`)
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Call the oracle back to back with no minimum interval
    #[arg(long)]
    pub no_pacing: bool,

    /// Extra passes over reviews whose scoring failed
    #[arg(long, default_value_t = 0)]
    pub retry_failed: u32,

    #[command(flatten)]
    pub range: RangeArgs,

    /// Validate configuration and print the plan without calling any API
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Args)]
pub(crate) struct FilterArgs {
    /// CSV written by `analyze`
    #[arg(long)]
    pub input: PathBuf,

    #[command(flatten)]
    pub range: RangeArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let (cli, config) =
        match parse_and_configure(std::env::args_os(), revlens_core::load_app_config) {
            Ok(parsed) => parsed,
            Err(e) => match e.downcast::<clap::Error>() {
                Ok(usage) => usage.exit(),
                Err(e) => return Err(e),
            },
        };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    // stdout carries the rendered report.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Analyze(args) => {
            let cancel = CancellationToken::new();
            tokio::spawn(cancel_on_ctrl_c(cancel.clone()));
            analyze::run_analyze(&config, &args, cancel).await
        }
        Commands::Filter(args) => filter::run_filter(&args),
    }
}

/// Parse `args`, then load configuration with `load_config`.
///
/// Argument errors and `--help` surface as [`clap::Error`] before the
/// environment is read.
fn parse_and_configure<I, T, F>(args: I, load_config: F) -> anyhow::Result<(Cli, AppConfig)>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    F: FnOnce() -> Result<AppConfig, ConfigError>,
{
    let cli = Cli::try_parse_from(args)?;
    let config = load_config()?;
    Ok((cli, config))
}

/// Cancel `token` on the first Ctrl-C. Records already scored are kept.
async fn cancel_on_ctrl_c(token: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::warn!("received ctrl-c, stopping after the current review");
            token.cancel();
        }
        Err(e) => tracing::error!(error = %e, "failed to listen for ctrl-c"),
    }
}
