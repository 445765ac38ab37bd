use thiserror::Error;

pub type FantasyResult<T> = Result<T, FantasyError>;

#[derive(Error, Debug)]
pub enum FantasyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Projection error: {0}")]
    Projection(String),

    #[error("Weights loading error: {0}")]
    WeightsLoad(String),

    #[error("Redis cache error: {0}")]
    Cache(String),

    #[error("ClickHouse analytics error: {0}")]
    Analytics(String),

    #[error("Ingest validation error: {0}")]
    IngestValidation(String),

    #[error("Trade validation error: {0}")]
    TradeValidation(String),

    #[error("Unknown player: {0}")]
    UnknownPlayer(u32),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
