//! review-rank — CLI entrypoint.
//! Loads reviews and config, builds the product report and prints it as JSON.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use review_rank::config::{apply_env_overrides, load_config_default, load_config_from};
use review_rank::ingest::load_reviews_from;
use review_rank::{build_report, PartitionStrategy, SortKey};

#[derive(Debug, Parser)]
#[command(name = "review-rank", version, about = "Rank reviews and compute a time-weighted rating")]
struct Cli {
    /// Reviews file (JSON array or JSON Lines).
    reviews: PathBuf,

    /// Config file (TOML or JSON). Defaults to $REVIEW_RANK_CONFIG_PATH or config/review_rank.*
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of reviews to show.
    #[arg(long)]
    top_n: Option<usize>,

    /// Confidence level for the Wilson bound, in (0, 1).
    #[arg(long)]
    confidence: Option<f64>,

    /// Bucket partitioning: fixed | quantile.
    #[arg(long, value_parser = parse_strategy)]
    strategy: Option<PartitionStrategy>,

    /// Add a comparison list ranked by another score
    /// (wilson_lower_bound, average_rating, pos_neg_diff, net_ratio, total_vote).
    #[arg(long, value_parser = parse_sort_key)]
    compare_by: Option<SortKey>,

    /// Reference date (YYYY-MM-DD) for rows that carry a posting date. Defaults to today.
    #[arg(long)]
    reference_date: Option<NaiveDate>,
}

fn parse_strategy(s: &str) -> Result<PartitionStrategy, String> {
    match s.to_ascii_lowercase().as_str() {
        "fixed" => Ok(PartitionStrategy::Fixed),
        "quantile" => Ok(PartitionStrategy::Quantile),
        other => Err(format!("unknown strategy `{other}` (expected fixed|quantile)")),
    }
}

fn parse_sort_key(s: &str) -> Result<SortKey, String> {
    serde_json::from_value(serde_json::Value::String(s.to_ascii_lowercase()))
        .map_err(|_| format!("unknown sort key `{s}`"))
}

/// Logs go to stderr so stdout stays pure JSON.
/// `REVIEW_RANK_LOG_FORMAT=json` switches to structured output.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("review_rank=info,warn"));
    let json = std::env::var("REVIEW_RANK_LOG_FORMAT")
        .ok()
        .is_some_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();

    let mut cfg = match &cli.config {
        Some(p) => {
            let mut c = load_config_from(p)?;
            apply_env_overrides(&mut c);
            c
        }
        None => load_config_default()?,
    };

    // Flags win over file and env.
    if let Some(n) = cli.top_n {
        cfg.scoring.top_n = n;
    }
    if let Some(c) = cli.confidence {
        cfg.scoring.confidence = c;
    }
    if let Some(k) = cli.compare_by {
        cfg.scoring.compare_by = Some(k);
    }
    // Preset weights follow the strategy unless the file sets them explicitly.
    if let Some(s) = cli.strategy {
        cfg.aggregate.strategy = s;
    }

    let reviews = load_reviews_from(&cli.reviews, cli.reference_date)?;
    let report = build_report(&reviews, &cfg).context("building product report")?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
