//! OpenAPI specification and Swagger UI configuration.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "AFL Fantasy Manager API",
        version = "3.4.4",
        description = "Fantasy team management platform.\n\nServes player profiles, score projections, trade and captain tools, and the round stats ingest pipeline.",
        license(name = "MIT"),
    ),
    tags(
        (name = "Operations", description = "Health, readiness, liveness, and platform status"),
        (name = "Players", description = "Roster listings and player profiles"),
        (name = "Projections", description = "Score projections (model v3.4.4)"),
        (name = "Advisor", description = "Trade evaluation and captain suggestions"),
        (name = "Ingest", description = "Round stats feed ingestion"),
    ),
    paths(
        // Operations
        crate::rest::health_check,
        crate::rest::readiness,
        crate::rest::liveness,
        crate::rest::status_page,
        // Players
        crate::rest::list_players,
        crate::rest::get_player,
        // Projections
        crate::rest::project_batch,
        crate::rest::project_player,
        // Advisor
        crate::advisor_rest::evaluate_trade,
        crate::advisor_rest::suggest_captain,
        // Ingest
        crate::ingest_rest::ingest_stats,
    ),
    components(schemas(
        // Domain types
        fantasy_core::types::Position,
        fantasy_core::types::PlayerStatus,
        fantasy_core::types::RoundStats,
        fantasy_core::types::RoundScore,
        fantasy_core::types::PlayerProfile,
        fantasy_core::types::PlayerSummary,
        fantasy_core::types::RoundContext,
        fantasy_core::types::Projection,
        fantasy_core::types::TradeRequest,
        fantasy_core::types::TradeRating,
        fantasy_core::types::TradeVerdict,
        fantasy_core::types::CaptainRequest,
        fantasy_core::types::CaptainSuggestion,
        fantasy_core::types::PlayerRoundLine,
        fantasy_core::types::RoundIngestBatch,
        fantasy_core::types::IngestSummary,
        // REST envelope types
        crate::rest::ErrorResponse,
        crate::rest::HealthResponse,
        crate::rest::ProjectionBatchRequest,
    ))
)]
pub struct ApiDoc;
