use anyhow::Result;
use std::sync::Arc;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::info;

use phishwatch::cache::ResultCache;
use phishwatch::checker::{CheckSettings, UrlChecker};
use phishwatch::client::{HttpTransport, RetryPolicy, RetryingClassifierClient};
use phishwatch::config::Config;
use phishwatch::init::{init_cache_store, setup_logging};
use phishwatch::logger::{CheckLogger, MemoryLogSink};
use phishwatch::stats::StatsCollector;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load Config
    let config_path = std::env::args().nth(1).unwrap_or("config.toml".to_string());
    let config = if std::path::Path::new(&config_path).exists() {
        Config::load(&config_path).await?
    } else {
        Config::default()
    };

    // 2. Setup Logging
    setup_logging(&config);
    info!("Starting phishwatch ({:?} variant)...", config.variant);

    if !std::path::Path::new(&config_path).exists() {
        info!("Config file not found, using defaults.");
    }

    // 3. Init Stats
    let stats = StatsCollector::new(config.stats.log_interval_seconds);

    // 4. Init CheckLogger (console sink + memory ring for the API)
    let memory_sink = MemoryLogSink::new(config.logging.memory_capacity);
    let logs_buffer = memory_sink.clone_buffer();
    let logger = CheckLogger::new(config.logging.clone(), vec![Box::new(memory_sink)]);

    // 5. Init Result Cache
    let store = init_cache_store(&config)?;
    let cache = ResultCache::new(store, config.cache_ttl());

    // 6. Init Classifier Client
    let transport = Arc::new(HttpTransport::new(&config.classifier)?);
    let client = RetryingClassifierClient::new(
        transport,
        RetryPolicy {
            max_attempts: config.classifier.max_attempts,
            retry_delay: config.retry_delay(),
        },
    );

    // 7. Build Checker
    let shutdown = CancellationToken::new();
    let checker = UrlChecker::new(
        config.variant,
        CheckSettings::from(&config.check),
        cache,
        client,
        stats.clone(),
        logger,
        shutdown.clone(),
    );

    // 8. Start API Server
    let api_checker = checker.clone();
    let api_stats = stats.clone();
    let api_config = config.clone();
    let api_port = config.api_port;

    let api = tokio::spawn(async move {
        phishwatch::api::start_api_server(api_checker, api_stats, api_config, logs_buffer, api_port)
            .await;
    });

    // 9. Graceful Shutdown: cancel any pending retries, then exit.
    tokio::select! {
        _ = api => {},
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received.");
            shutdown.cancel();
        }
    }

    Ok(())
}
