//! API server — builds the router, mounts Swagger UI, and starts HTTP
//! and metrics listeners.

use crate::advisor_rest::{self, AdvisorState};
use crate::ingest_rest::{self, IngestState};
use crate::rest::{self, AppState};
use crate::swagger::ApiDoc;
use axum::routing::{get, post};
use axum::Router;
use fantasy_advisor::{CaptainAdvisor, TradeAdvisor};
use fantasy_cache::{RedisCache, RosterDirectory};
use fantasy_core::config::AppConfig;
use fantasy_ingest::IngestProcessor;
use fantasy_ops::StatusPageManager;
use fantasy_projection::ProjectionService;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Wired subsystems the API serves.
pub struct ApiContext {
    pub service: Arc<ProjectionService>,
    pub cache: Arc<RedisCache>,
    pub roster: Arc<RosterDirectory>,
    pub ingest: Arc<IngestProcessor>,
    pub trade: Arc<TradeAdvisor>,
    pub captain: Arc<CaptainAdvisor>,
    pub status_page: Arc<StatusPageManager>,
}

/// Main API server managing the REST endpoints.
pub struct ApiServer {
    config: AppConfig,
    ctx: ApiContext,
}

impl ApiServer {
    pub fn new(config: AppConfig, ctx: ApiContext) -> Self {
        Self { config, ctx }
    }

    /// Start the HTTP REST server (blocks until shutdown).
    pub async fn start_http(&self) -> anyhow::Result<()> {
        let state = AppState {
            service: self.ctx.service.clone(),
            cache: self.ctx.cache.clone(),
            roster: self.ctx.roster.clone(),
            status_page: self.ctx.status_page.clone(),
            current_round: self.config.current_round,
            max_batch: self.config.projection.max_batch,
            start_time: Instant::now(),
        };

        let advisor_state = AdvisorState {
            trade: self.ctx.trade.clone(),
            captain: self.ctx.captain.clone(),
            squad_size: self.config.squad.squad_size(),
        };

        let ingest_state = IngestState {
            ingest: self.ctx.ingest.clone(),
        };

        let app = Router::new()
            // Players & projections
            .route("/api/players", get(rest::list_players))
            .route("/api/players/:id", get(rest::get_player))
            .route("/api/projections", post(rest::project_batch))
            .route("/api/projections/:id", get(rest::project_player))
            // Operational endpoints
            .route("/api/health", get(rest::health_check))
            .route("/api/ready", get(rest::readiness))
            .route("/api/live", get(rest::liveness))
            .route("/api/status", get(rest::status_page))
            .with_state(state)
            // Advisor tools
            .merge(
                Router::new()
                    .route("/api/trade/evaluate", post(advisor_rest::evaluate_trade))
                    .route("/api/captain/suggest", post(advisor_rest::suggest_captain))
                    .with_state(advisor_state),
            )
            // Stats feed
            .merge(
                Router::new()
                    .route("/api/stats/ingest", post(ingest_rest::ingest_stats))
                    .with_state(ingest_state),
            )
            // API docs
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
            // Middleware
            .layer(CompressionLayer::new())
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http());

        let addr = SocketAddr::new(self.config.api.host.parse()?, self.config.api.http_port);

        info!(addr = %addr, "Starting HTTP server");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    /// Start the metrics server on a separate port.
    pub async fn start_metrics(&self) -> anyhow::Result<()> {
        let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
        let handle = builder
            .with_http_listener(SocketAddr::new(
                self.config.api.host.parse()?,
                self.config.metrics.port,
            ))
            .install_recorder()?;

        info!(port = self.config.metrics.port, "Metrics exporter started");

        // Keep the handle alive
        std::mem::forget(handle);
        Ok(())
    }
}
