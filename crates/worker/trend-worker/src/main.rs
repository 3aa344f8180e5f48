//! Worker binary entry point: loads configuration, wires adapters and the
//! store, then runs the scheduled ingestion loop. Ported from
//! `main.py`'s startup sequence and from `zoey-core`'s `tracing-subscriber`
//! init pattern.

use std::time::Duration;

use clap::Parser;
use trend_adapter_reels::{ReelsAdapter, ReelsAdapterConfig};
use trend_adapter_tiktok::{TikTokAdapter, TikTokAdapterConfig};
use trend_adapter_youtube::{YouTubeAdapter, YouTubeAdapterConfig};
use trend_core::adapter::{AdapterLimits, RetryPolicy};
use trend_core::{config, PassThroughClassifier, TrendConfig, TuningConfig};
use trend_store_supabase::{SupabaseConfig, SupabaseStore};
use trend_worker::{AdapterRegistry, TrendWorker};

/// Short-video trend detection worker.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Run a single ingestion cycle and exit, instead of looping on the
    /// configured interval. Useful for manual/on-demand triggers.
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    config::load_env().ok();
    let cfg = TrendConfig::from_env();

    let filter = if cfg.debug {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!(
        dry_run = cfg.dry_run,
        interval_minutes = cfg.worker_interval_minutes,
        "starting trend worker"
    );

    let limits = AdapterLimits {
        max_results: cfg.max_results_per_platform,
        timeout: cfg.request_timeout,
        retry: RetryPolicy { attempts: cfg.retry_count, base_delay: cfg.retry_delay },
    };

    let mut registry = AdapterRegistry::new();

    if cfg.tiktok.enabled {
        let tiktok_cfg = TikTokAdapterConfig {
            apify_token: cfg.tiktok.token.clone().unwrap_or_default(),
            actor_id: cfg.tiktok.actor.clone().unwrap_or_else(|| "clockworks/tiktok-scraper".to_string()),
            limits,
        };
        registry.register(Box::new(TikTokAdapter::new(tiktok_cfg)));
    }

    if cfg.reels.enabled {
        let reels_cfg = ReelsAdapterConfig {
            apify_token: cfg.reels.token.clone().unwrap_or_default(),
            actor_id: cfg.reels.actor.clone().unwrap_or_else(|| "apify/instagram-scraper".to_string()),
            limits,
        };
        registry.register(Box::new(ReelsAdapter::new(reels_cfg)));
    }

    if cfg.youtube.enabled {
        let youtube_cfg = YouTubeAdapterConfig { api_key: cfg.youtube.token.clone().unwrap_or_default(), limits };
        registry.register(Box::new(YouTubeAdapter::new(youtube_cfg)));
    }

    let (supabase_url, supabase_key) = cfg.supabase_credentials()?;
    let store = SupabaseStore::new(SupabaseConfig::new(supabase_url, supabase_key)).await?;

    let worker = TrendWorker::new(
        registry,
        Box::new(store),
        Box::new(PassThroughClassifier),
        TuningConfig::default(),
        cfg.dry_run,
    );

    if cli.once {
        let stats = worker.run_cycle().await;
        tracing::info!(
            processed = stats.processed,
            viral = stats.viral,
            skipped = stats.skipped,
            errors = stats.errors,
            rejected_filter = stats.rejected_filter,
            error_message = ?stats.error_message,
            "cycle complete"
        );
        return Ok(());
    }

    worker.run_forever(Duration::from_secs(cfg.worker_interval_minutes * 60)).await;
}
