//! sockrecord CLI
//!
//! Resolve runtime/image handles through the cache and inspect its files.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sockrecord_cache::{RecordConfig, ServiceRecord};
use sockrecord_core::constants::{
    DEFAULT_CONFIG_PATH, DEFAULT_FRESHNESS_SECS, DEFAULT_SNAPSHOT_PATH, ENV_CONFIG_PATH,
    ENV_SNAPSHOT_PATH,
};
use sockrecord_core::types::RecordSnapshot;
use sockrecord_transport::SocketConnector;

/// sockrecord - reuse runtime and image service handles
#[derive(Parser)]
#[command(name = "sockrecord")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Pre-registered endpoint list (JSON array of strings)
    #[arg(long, global = true, env = ENV_CONFIG_PATH, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Snapshot destination
    #[arg(long, global = true, env = ENV_SNAPSHOT_PATH, default_value = DEFAULT_SNAPSHOT_PATH)]
    snapshot: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve handles for an endpoint, dialing it on first use
    Resolve {
        /// Runtime endpoint (unix:///path, tcp://host:port, or /path)
        endpoint: String,
        /// Image endpoint; defaults to the runtime endpoint
        #[arg(long)]
        image_endpoint: Option<String>,
        /// Required freshness in seconds (also the dial timeout)
        #[arg(short, long, default_value_t = DEFAULT_FRESHNESS_SECS)]
        freshness_secs: u64,
        /// Number of lookups to perform
        #[arg(short, long, default_value = "1")]
        repeat: u32,
        /// Pause between lookups in milliseconds
        #[arg(long, default_value = "0")]
        interval_ms: u64,
        /// Write a snapshot afterwards
        #[arg(long)]
        save: bool,
    },

    /// Print a previously written snapshot
    Show,

    /// Load and print the pre-registered endpoint list
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "sockrecord=debug,info"
    } else {
        "sockrecord=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = RecordConfig::default()
        .with_config_path(&cli.config)
        .with_snapshot_path(&cli.snapshot);

    match cli.command {
        Commands::Resolve {
            endpoint,
            image_endpoint,
            freshness_secs,
            repeat,
            interval_ms,
            save,
        } => {
            let image_endpoint = image_endpoint.unwrap_or_else(|| endpoint.clone());
            cmd_resolve(
                config,
                &endpoint,
                &image_endpoint,
                Duration::from_secs(freshness_secs),
                repeat,
                Duration::from_millis(interval_ms),
                save,
            )
            .await
        }
        Commands::Show => cmd_show(&config.snapshot_path).await,
        Commands::CheckConfig => cmd_check_config(config).await,
    }
}

/// Resolve handles, optionally several times
async fn cmd_resolve(
    config: RecordConfig,
    endpoint: &str,
    image_endpoint: &str,
    freshness: Duration,
    repeat: u32,
    interval: Duration,
    save: bool,
) -> Result<()> {
    println!("{} {}", "🔌 Resolving:".cyan().bold(), endpoint);

    let mut record = ServiceRecord::new(config, SocketConnector::new()).await;
    if let Some(e) = record.startup_error() {
        println!("   {} {}", "No pre-registered endpoints:".dimmed(), e);
    }

    for attempt in 1..=repeat.max(1) {
        if attempt > 1 && !interval.is_zero() {
            tokio::time::sleep(interval).await;
        }

        match record
            .resolve_or_create(endpoint, image_endpoint, freshness)
            .await
        {
            Ok(handles) => {
                let entry = record
                    .entry(endpoint)
                    .context("Resolved endpoint has no entry")?;
                println!(
                    "   {} #{} runtime={} image={} since={} valid_for={:?}",
                    "✅".green(),
                    attempt,
                    handles.runtime().endpoint(),
                    handles.image().endpoint(),
                    entry.last_active_at.to_rfc3339(),
                    entry.valid_for,
                );
            }
            Err(e) if e.is_stale() => {
                println!("   {} #{} {}", "⏳".yellow(), attempt, e);
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to resolve '{}'", endpoint));
            }
        }
    }

    let stats = record.stats();
    info!(
        hits = stats.hits,
        created = stats.created,
        stale = stats.stale_rejections,
        "Resolve finished"
    );

    if save {
        record
            .save_service()
            .await
            .context("Failed to write snapshot")?;
        println!(
            "{} {}",
            "💾 Snapshot saved to:".green(),
            record.config().snapshot_path.display()
        );
    }

    Ok(())
}

/// Print a snapshot file
async fn cmd_show(path: &Path) -> Result<()> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    let snapshot = RecordSnapshot::from_json(&contents).context("Invalid snapshot")?;

    println!("{} {}", "📋 Snapshot:".cyan().bold(), path.display());
    println!("   {} {}", "Endpoints:".dimmed(), snapshot.endpoints.join(", "));
    for (endpoint, entry) in &snapshot.entries {
        println!("   {} {}", "•".green(), endpoint.bold());
        println!("      {} {}", "runtime:".dimmed(), entry.runtime);
        println!("      {} {}", "image:".dimmed(), entry.image);
        println!("      {} {}", "active since:".dimmed(), entry.last_active_at.to_rfc3339());
        println!("      {} {:?}", "valid for:".dimmed(), entry.valid_for);
    }

    Ok(())
}

/// Load the pre-registered endpoint list
async fn cmd_check_config(config: RecordConfig) -> Result<()> {
    let path = config.config_path.clone();
    let mut record = ServiceRecord::new(config, SocketConnector::new()).await;

    let count = record
        .load_config()
        .await
        .with_context(|| format!("Failed to load {}", path.display()))?;

    println!("{} {} endpoint(s) in {}", "✅".green(), count, path.display());
    for endpoint in record.endpoints() {
        println!("   {}", endpoint);
    }

    Ok(())
}
