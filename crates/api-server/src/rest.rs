//! REST API handlers for player, projection, and operational endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use fantasy_cache::{RedisCache, RosterDirectory};
use fantasy_core::error::FantasyError;
use fantasy_core::types::{PlayerProfile, PlayerSummary, Position, Projection, RoundContext};
use fantasy_ops::StatusPageManager;
use fantasy_projection::ProjectionService;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, warn};
use utoipa::{IntoParams, ToSchema};

/// Final home-and-away round.
const LAST_ROUND: u8 = 24;

/// Shared application state for REST handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ProjectionService>,
    pub cache: Arc<RedisCache>,
    pub roster: Arc<RosterDirectory>,
    pub status_page: Arc<StatusPageManager>,
    pub current_round: u8,
    pub max_batch: usize,
    pub start_time: Instant,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub model_version: String,
    pub uptime_secs: u64,
    pub current_round: u8,
}

pub(crate) fn bad_request(code: &str, message: String) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: code.to_string(),
            message,
        }),
    )
}

pub(crate) fn not_found(message: String) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "not_found".to_string(),
            message,
        }),
    )
}

pub(crate) fn internal_error() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "internal_error".to_string(),
            message: "Internal processing error".to_string(),
        }),
    )
}

/// GET /api/health — Health check endpoint.
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Operations",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model_version: state.service.model_version(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        current_round: state.current_round,
    })
}

/// GET /api/ready — Readiness probe.
/// Returns 200 only when the service is ready to accept traffic.
#[utoipa::path(
    get,
    path = "/api/ready",
    tag = "Operations",
    responses(
        (status = 200, description = "Ready to serve"),
        (status = 503, description = "Still starting"),
    )
)]
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.start_time.elapsed().as_secs() > 0 {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /api/live — Liveness probe.
#[utoipa::path(
    get,
    path = "/api/live",
    tag = "Operations",
    responses((status = 200, description = "Process is alive"))
)]
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /api/status — Platform component status page.
#[utoipa::path(
    get,
    path = "/api/status",
    tag = "Operations",
    responses((status = 200, description = "Component status grouped by service area"))
)]
pub async fn status_page(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(state.status_page.get_status_page())
}

#[derive(Deserialize, IntoParams)]
pub struct PlayersQuery {
    /// Filter by field position.
    pub position: Option<Position>,
    /// Filter by AFL club abbreviation.
    pub club: Option<String>,
}

/// GET /api/players — Roster listing for squad pickers.
#[utoipa::path(
    get,
    path = "/api/players",
    tag = "Players",
    params(PlayersQuery),
    responses(
        (status = 200, description = "Roster rows, price descending", body = [PlayerSummary]),
    )
)]
pub async fn list_players(
    State(state): State<AppState>,
    Query(query): Query<PlayersQuery>,
) -> Json<Vec<PlayerSummary>> {
    let rows = state.roster.list(query.position, query.club.as_deref());
    metrics::counter!("api.player_listings").increment(1);
    Json(rows)
}

/// GET /api/players/:id — Full player profile with season history.
#[utoipa::path(
    get,
    path = "/api/players/{id}",
    tag = "Players",
    params(("id" = u32, Path, description = "Player id")),
    responses(
        (status = 200, description = "Player profile", body = PlayerProfile),
        (status = 404, description = "Unknown player", body = ErrorResponse),
    )
)]
pub async fn get_player(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<PlayerProfile>, (StatusCode, Json<ErrorResponse>)> {
    match state.cache.get_player(id).await {
        Ok(Some(profile)) => Ok(Json(profile)),
        Ok(None) => Err(not_found(format!("no player with id {id}"))),
        Err(e) => {
            error!(error = %e, player_id = id, "Player lookup failed");
            metrics::counter!("api.errors").increment(1);
            Err(internal_error())
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct ProjectionBatchRequest {
    pub player_ids: Vec<u32>,
    /// Round context; neutral context for the current round when omitted.
    #[serde(default)]
    pub context: Option<RoundContext>,
}

/// Validate a projection batch request at the API boundary.
fn validate_projection_request(
    request: &ProjectionBatchRequest,
    max_batch: usize,
) -> Result<(), String> {
    if request.player_ids.is_empty() {
        return Err("request must contain at least one player id".to_string());
    }
    if request.player_ids.len() > max_batch {
        return Err(format!("request exceeds maximum of {max_batch} players"));
    }
    if let Some(ctx) = &request.context {
        if ctx.round == 0 || ctx.round > LAST_ROUND {
            return Err(format!("round must be 1..={LAST_ROUND}"));
        }
    }
    Ok(())
}

/// POST /api/projections — Batch projections.
#[utoipa::path(
    post,
    path = "/api/projections",
    tag = "Projections",
    request_body = ProjectionBatchRequest,
    responses(
        (status = 200, description = "Projections for known players", body = [Projection]),
        (status = 400, description = "Invalid batch", body = ErrorResponse),
    )
)]
pub async fn project_batch(
    State(state): State<AppState>,
    Json(request): Json<ProjectionBatchRequest>,
) -> Result<Json<Vec<Projection>>, (StatusCode, Json<ErrorResponse>)> {
    if let Err(msg) = validate_projection_request(&request, state.max_batch) {
        warn!(error = %msg, "Projection batch validation failed");
        metrics::counter!("api.validation_errors").increment(1);
        return Err(bad_request("invalid_projection_request", msg));
    }

    let ctx = request
        .context
        .unwrap_or_else(|| RoundContext::neutral(state.current_round));

    match state.service.project_batch(&request.player_ids, &ctx).await {
        Ok(projections) => Ok(Json(projections)),
        Err(e) => {
            error!(error = %e, "Projection batch failed");
            metrics::counter!("api.errors").increment(1);
            Err(internal_error())
        }
    }
}

#[derive(Deserialize, IntoParams)]
pub struct ProjectionQuery {
    /// Round to project; defaults to the current round.
    pub round: Option<u8>,
}

/// GET /api/projections/:id — Single-player projection.
#[utoipa::path(
    get,
    path = "/api/projections/{id}",
    tag = "Projections",
    params(
        ("id" = u32, Path, description = "Player id"),
        ProjectionQuery,
    ),
    responses(
        (status = 200, description = "Projection", body = Projection),
        (status = 400, description = "Invalid round", body = ErrorResponse),
        (status = 404, description = "Unknown player", body = ErrorResponse),
    )
)]
pub async fn project_player(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Query(query): Query<ProjectionQuery>,
) -> Result<Json<Projection>, (StatusCode, Json<ErrorResponse>)> {
    let round = query.round.unwrap_or(state.current_round);
    if round == 0 || round > LAST_ROUND {
        metrics::counter!("api.validation_errors").increment(1);
        return Err(bad_request(
            "invalid_round",
            format!("round must be 1..={LAST_ROUND}"),
        ));
    }

    match state
        .service
        .project_player(id, &RoundContext::neutral(round))
        .await
    {
        Ok(projection) => Ok(Json(projection)),
        Err(FantasyError::UnknownPlayer(id)) => Err(not_found(format!("no player with id {id}"))),
        Err(e) => {
            error!(error = %e, player_id = id, "Projection failed");
            metrics::counter!("api.errors").increment(1);
            Err(internal_error())
        }
    }
}
