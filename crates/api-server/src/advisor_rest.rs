//! Trade and captain tool REST API endpoints.

use crate::rest::{bad_request, internal_error, not_found, ErrorResponse};
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use fantasy_advisor::{CaptainAdvisor, TradeAdvisor};
use fantasy_core::error::FantasyError;
use fantasy_core::types::{CaptainRequest, CaptainSuggestion, TradeRequest, TradeVerdict};
use std::sync::Arc;
use tracing::{error, warn};

/// Shared state for advisor endpoints.
#[derive(Clone)]
pub struct AdvisorState {
    pub trade: Arc<TradeAdvisor>,
    pub captain: Arc<CaptainAdvisor>,
    /// Full squad size; caps captain request payloads.
    pub squad_size: usize,
}

/// POST /api/trade/evaluate — Evaluate a proposed trade.
#[utoipa::path(
    post,
    path = "/api/trade/evaluate",
    tag = "Advisor",
    request_body = TradeRequest,
    responses(
        (status = 200, description = "Trade verdict", body = TradeVerdict),
        (status = 400, description = "Trade rejected", body = ErrorResponse),
        (status = 404, description = "Unknown player", body = ErrorResponse),
    )
)]
pub async fn evaluate_trade(
    State(state): State<AdvisorState>,
    Json(request): Json<TradeRequest>,
) -> Result<Json<TradeVerdict>, (StatusCode, Json<ErrorResponse>)> {
    match state.trade.evaluate(&request).await {
        Ok(verdict) => {
            metrics::counter!("api.trades_evaluated").increment(1);
            Ok(Json(verdict))
        }
        Err(FantasyError::TradeValidation(msg)) => {
            warn!(owner_id = %request.owner_id, error = %msg, "Trade rejected");
            metrics::counter!("api.validation_errors").increment(1);
            Err(bad_request("invalid_trade", msg))
        }
        Err(FantasyError::UnknownPlayer(id)) => Err(not_found(format!("no player with id {id}"))),
        Err(e) => {
            error!(error = %e, "Trade evaluation failed");
            metrics::counter!("api.errors").increment(1);
            Err(internal_error())
        }
    }
}

/// POST /api/captain/suggest — Rank squad players for the captaincy.
#[utoipa::path(
    post,
    path = "/api/captain/suggest",
    tag = "Advisor",
    request_body = CaptainRequest,
    responses(
        (status = 200, description = "Ranked suggestions", body = [CaptainSuggestion]),
        (status = 400, description = "Invalid request", body = ErrorResponse),
    )
)]
pub async fn suggest_captain(
    State(state): State<AdvisorState>,
    Json(request): Json<CaptainRequest>,
) -> Result<Json<Vec<CaptainSuggestion>>, (StatusCode, Json<ErrorResponse>)> {
    if request.player_ids.is_empty() {
        metrics::counter!("api.validation_errors").increment(1);
        return Err(bad_request(
            "invalid_captain_request",
            "request must contain at least one player id".to_string(),
        ));
    }
    if request.player_ids.len() > state.squad_size {
        metrics::counter!("api.validation_errors").increment(1);
        return Err(bad_request(
            "invalid_captain_request",
            format!("request exceeds squad size of {}", state.squad_size),
        ));
    }

    match state.captain.suggest(&request).await {
        Ok(suggestions) => Ok(Json(suggestions)),
        Err(e) => {
            error!(error = %e, "Captain suggestion failed");
            metrics::counter!("api.errors").increment(1);
            Err(internal_error())
        }
    }
}
