//! Mini LRU - workload driver
//!
//! Hammers a shared LRU cache from several tokio tasks and reports the
//! resulting statistics.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinSet;
use tracing::{info, trace, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mini_lru::{Config, SharedLruCache};

/// Entry point for the workload driver.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the shared cache and register an eviction counter
/// 4. Run the worker tasks until they finish or Ctrl+C arrives
/// 5. Log the final statistics as JSON
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mini_lru=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Mini LRU workload driver");

    let config = Config::from_env().context("failed to load configuration")?;
    info!(
        "Configuration loaded: capacity={}, workers={}, ops_per_worker={}, key_space={}",
        config.capacity, config.workers, config.ops_per_worker, config.key_space
    );

    let cache = Arc::new(
        SharedLruCache::<u64, u64>::new(config.capacity).context("failed to create cache")?,
    );

    let evictions = Arc::new(AtomicU64::new(0));
    let counter = Arc::clone(&evictions);
    cache.on_eviction(move |key, value| {
        counter.fetch_add(1, Ordering::Relaxed);
        trace!(key, value, "entry evicted");
    });

    let mut workers = JoinSet::new();
    for worker in 0..config.workers {
        let cache = Arc::clone(&cache);
        let config = config.clone();
        workers.spawn(async move { run_worker(worker as u64, &cache, &config).await });
    }

    let worker_hits = tokio::select! {
        hits = join_all(&mut workers) => Some(hits),
        _ = shutdown_signal() => None,
    };

    match worker_hits {
        Some(hits) => info!(hits, "All workers finished"),
        None => {
            workers.abort_all();
            warn!("Workers aborted");
        }
    }

    let stats = cache.stats();
    info!(
        observed_evictions = evictions.load(Ordering::Relaxed),
        hit_rate = stats.hit_rate(),
        "Workload complete"
    );
    info!(
        "Final statistics: {}",
        serde_json::to_string_pretty(&stats).context("failed to render statistics")?
    );

    Ok(())
}

/// Issues a deterministic mix of gets and sets: reads first, writing on miss.
async fn run_worker(worker: u64, cache: &SharedLruCache<u64, u64>, config: &Config) -> u64 {
    let mut hits = 0;
    // Linear congruential walk over the key space, seeded per worker
    let mut state = worker.wrapping_mul(0x9E37_79B9_7F4A_7C15).wrapping_add(1);

    for op in 0..config.ops_per_worker {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        let key = (state >> 33) % config.key_space;

        match cache.get(&key) {
            Some(_) => hits += 1,
            None => cache.set(key, op),
        }

        if op % 1024 == 0 {
            tokio::task::yield_now().await;
        }
    }

    trace!(worker, hits, "worker finished");
    hits
}

/// Waits for every worker and sums the hits they report.
async fn join_all(workers: &mut JoinSet<u64>) -> u64 {
    let mut total = 0;
    while let Some(result) = workers.join_next().await {
        match result {
            Ok(hits) => total += hits,
            Err(err) => warn!("Worker task failed: {}", err),
        }
    }
    total
}

/// Waits for Ctrl+C.
async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        warn!("Failed to install Ctrl+C handler: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Received Ctrl+C, initiating shutdown...");
}
