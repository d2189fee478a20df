//! A tool to rate the trustworthiness of ML artifacts.
//!
//! # Overview
//!
//! `artifact-rank` assigns a composite trust/quality score to machine
//! learning artifacts hosted on a metadata hub. Eight independent metrics
//! (license clarity, deployability by size, ramp-up friendliness, bus
//! factor, performance claims, dataset and code availability, dataset
//! quality, code quality) are computed concurrently from sparse public
//! metadata and folded into a weighted net score.
//!
//! # Quick Start
//!
//! ```bash
//! artifact-rank openai/whisper-tiny
//! ```
//!
//! This prints one JSON rating per artifact, with every score in [0,1] and
//! per-metric latencies in milliseconds.
//!
//! # Basic Usage
//!
//! **Rate several artifacts in one run (each is rated at most once):**
//! ```bash
//! artifact-rank org/model-a org/model-b org/model-a
//! ```
//!
//! **Point at a different metadata hub:**
//! ```bash
//! artifact-rank --hub https://hub.example.com org/model
//! ARTIFACT_HUB_URL=https://hub.example.com artifact-rank org/model
//! ```
//!
//! **Human-readable output:**
//! ```bash
//! artifact-rank --pretty org/model
//! ```
//!
//! # Resilience
//!
//! A missing README, an unreachable hub, or a malformed record never fails
//! the run: affected metrics degrade to documented fallback scores and the
//! rating is still produced. The exit code is nonzero only for invalid
//! arguments or a rating cache failure.

use artifact_rank::{ArtifactDescriptor, FetchResult, MemoryCache, MetadataClient, RatingEngine, Result};
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, ValueEnum};
use ohno::IntoAppError;
use std::sync::Arc;

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "artifact-rank", version, about)]
#[command(styles = CLAP_STYLES)]
struct Args {
    /// Artifacts to rate, as `namespace/name` hub identifiers
    #[arg(required = true)]
    artifacts: Vec<String>,

    /// Base URL of the metadata hub
    #[arg(long, env = "ARTIFACT_HUB_URL")]
    hub: Option<String>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::None)]
    log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    None,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

fn init_logging(log_level: LogLevel) {
    let level = match log_level {
        LogLevel::None => return,
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_level);

    let client = Arc::new(MetadataClient::new(args.hub.as_deref())?);
    let engine = RatingEngine::new(client.clone(), Arc::new(MemoryCache::new()));

    for artifact_id in &args.artifacts {
        let descriptor = describe(&client, artifact_id).await;
        let rating = engine.rate(&descriptor).await?;

        let json = if args.pretty {
            serde_json::to_string_pretty(&rating).into_app_err("unable to serialize rating")?
        } else {
            serde_json::to_string(&rating).into_app_err("unable to serialize rating")?
        };

        println!("{json}");
    }

    Ok(())
}

/// Build the richest descriptor the hub allows: the structured record when
/// it can be fetched, a bare name-only descriptor otherwise.
async fn describe(client: &MetadataClient, artifact_id: &str) -> ArtifactDescriptor {
    let source_url = format!("{}/{artifact_id}", client.base_url());

    match client.model_record(artifact_id).await {
        FetchResult::Found(record) => ArtifactDescriptor::from_record(artifact_id, &source_url, &record),
        FetchResult::Unavailable => ArtifactDescriptor::new(artifact_id, &source_url),
    }
}
