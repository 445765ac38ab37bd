//! AFL Fantasy Manager — fantasy team management platform backend.
//!
//! Main entry point that initializes all subsystems and starts the server.

use clap::Parser;
use fantasy_advisor::{CaptainAdvisor, TradeAdvisor};
use fantasy_analytics::AnalyticsLogger;
use fantasy_api::{ApiContext, ApiServer};
use fantasy_cache::{RedisCache, RosterDirectory};
use fantasy_core::config::AppConfig;
use fantasy_ingest::IngestProcessor;
use fantasy_ops::StatusPageManager;
use fantasy_projection::{ProjectionEngine, ProjectionService};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "fantasy-manager")]
#[command(about = "AFL fantasy team management platform")]
#[command(version)]
struct Cli {
    /// HTTP port (overrides config)
    #[arg(long, env = "FANTASY_MANAGER__API__HTTP_PORT")]
    http_port: Option<u16>,

    /// Metrics port (overrides config)
    #[arg(long, env = "FANTASY_MANAGER__METRICS__PORT")]
    metrics_port: Option<u16>,

    /// Current round (overrides config)
    #[arg(long, env = "FANTASY_MANAGER__CURRENT_ROUND")]
    round: Option<u8>,

    /// Skip the ClickHouse analytics backend (events are dropped)
    #[arg(long, default_value_t = false)]
    api_only: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fantasy_manager=info,tower_http=info".into()),
        )
        .json()
        .init();

    let cli = Cli::parse();

    info!("Fantasy Manager starting up");

    // Load configuration
    let mut config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Apply CLI overrides
    if let Some(port) = cli.http_port {
        config.api.http_port = port;
    }
    if let Some(port) = cli.metrics_port {
        config.metrics.port = port;
    }
    if let Some(round) = cli.round {
        config.current_round = round;
    }

    info!(
        round = config.current_round,
        http_port = config.api.http_port,
        metrics_port = config.metrics.port,
        "Configuration loaded"
    );

    // Initialize projection engine
    let engine = Arc::new(ProjectionEngine::new(&config.projection)?);

    // Initialize Redis cache
    let cache = Arc::new(RedisCache::new(&config.redis).await.map_err(|e| {
        error!(error = %e, "Failed to connect to Redis");
        e
    })?);

    // Initialize analytics logger
    let analytics = if cli.api_only {
        info!("Running in API-only mode (no ClickHouse analytics)");
        Arc::new(AnalyticsLogger::disabled())
    } else {
        match AnalyticsLogger::new(&config.clickhouse).await {
            Ok(logger) => Arc::new(logger),
            Err(e) => {
                error!(error = %e, "Failed to connect to ClickHouse, analytics disabled");
                Arc::new(AnalyticsLogger::disabled())
            }
        }
    };

    // Shared directories and status page
    let roster = Arc::new(RosterDirectory::new());
    let status_page = Arc::new(StatusPageManager::new());

    // Wire the pipelines
    let service = Arc::new(ProjectionService::new(
        engine.clone(),
        cache.clone(),
        analytics.clone(),
    ));
    let ingest = Arc::new(IngestProcessor::new(
        cache.clone(),
        roster.clone(),
        analytics.clone(),
        config.pricing.clone(),
        config.ingest.clone(),
    ));
    let trade = Arc::new(TradeAdvisor::new(
        service.clone(),
        cache.clone(),
        analytics.clone(),
    ));
    let captain = Arc::new(CaptainAdvisor::new(
        service.clone(),
        cache.clone(),
        analytics.clone(),
        config.projection.captain_suggestions,
    ));

    // Start API server
    let api_server = ApiServer::new(
        config.clone(),
        ApiContext {
            service,
            cache: cache.clone(),
            roster,
            ingest,
            trade,
            captain,
            status_page,
        },
    );

    // Start metrics exporter
    if let Err(e) = api_server.start_metrics().await {
        error!(error = %e, "Failed to start metrics exporter");
    }

    // Spawn cache maintenance task
    let cache_for_maintenance = cache.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(60));
        loop {
            interval.tick().await;
            cache_for_maintenance.maintenance().await;
        }
    });

    info!("Fantasy Manager is ready to serve traffic");

    // Start HTTP server (blocks until shutdown)
    api_server.start_http().await?;

    Ok(())
}
