//! Stats feed ingest REST API endpoint.

use crate::rest::{bad_request, internal_error, ErrorResponse};
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use fantasy_core::error::FantasyError;
use fantasy_core::types::{IngestSummary, RoundIngestBatch};
use fantasy_ingest::IngestProcessor;
use std::sync::Arc;
use tracing::{error, warn};

/// Shared state for ingest endpoints.
#[derive(Clone)]
pub struct IngestState {
    pub ingest: Arc<IngestProcessor>,
}

/// POST /api/stats/ingest — Ingest a round stats batch from the feed.
#[utoipa::path(
    post,
    path = "/api/stats/ingest",
    tag = "Ingest",
    request_body = RoundIngestBatch,
    responses(
        (status = 200, description = "Batch applied", body = IngestSummary),
        (status = 400, description = "Batch rejected", body = ErrorResponse),
    )
)]
pub async fn ingest_stats(
    State(state): State<IngestState>,
    Json(batch): Json<RoundIngestBatch>,
) -> Result<Json<IngestSummary>, (StatusCode, Json<ErrorResponse>)> {
    let round = batch.round;
    match state.ingest.ingest_round(batch).await {
        Ok(summary) => Ok(Json(summary)),
        Err(FantasyError::IngestValidation(msg)) => {
            warn!(round = round, error = %msg, "Ingest batch rejected");
            metrics::counter!("api.validation_errors").increment(1);
            Err(bad_request("invalid_ingest_batch", msg))
        }
        Err(e) => {
            error!(error = %e, round = round, "Ingest failed");
            metrics::counter!("api.errors").increment(1);
            Err(internal_error())
        }
    }
}
