use serde::Deserialize;

/// Root application configuration. Loaded from environment variables
/// with the prefix `FANTASY_MANAGER__` and TOML config files.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Current home-and-away round (1..=24).
    #[serde(default = "default_current_round")]
    pub current_round: u8,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub redis: RedisConfig,
    #[serde(default)]
    pub clickhouse: ClickHouseConfig,
    #[serde(default)]
    pub projection: ProjectionConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub squad: SquadConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    #[serde(default = "default_redis_urls")]
    pub urls: Vec<String>,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClickHouseConfig {
    #[serde(default = "default_clickhouse_url")]
    pub url: String,
    #[serde(default = "default_clickhouse_db")]
    pub database: String,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_flush_interval_ms")]
    pub flush_interval_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectionConfig {
    /// Optional weights file; baked-in v3.4.4 weights are used when absent.
    #[serde(default = "default_weights_path")]
    pub weights_path: String,
    #[serde(default = "default_max_batch")]
    pub max_batch: usize,
    /// Suggestions returned by the captain advisor.
    #[serde(default = "default_captain_suggestions")]
    pub captain_suggestions: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PricingConfig {
    /// Dollars-per-point conversion used by the price recurrence.
    #[serde(default = "default_magic_number")]
    pub magic_number: u32,
    /// Hard floor under the price recurrence.
    #[serde(default = "default_price_floor")]
    pub price_floor: u32,
    #[serde(default = "default_salary_cap")]
    pub salary_cap: u64,
    /// First-seen price for players without a history.
    #[serde(default = "default_rookie_price")]
    pub rookie_price: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SquadConfig {
    #[serde(default = "default_defenders")]
    pub defenders: usize,
    #[serde(default = "default_midfielders")]
    pub midfielders: usize,
    #[serde(default = "default_rucks")]
    pub rucks: usize,
    #[serde(default = "default_forwards")]
    pub forwards: usize,
    #[serde(default = "default_interchange")]
    pub interchange: usize,
    #[serde(default = "default_season_trades")]
    pub season_trades: u8,
    #[serde(default = "default_trades_per_round")]
    pub max_trades_per_round: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IngestConfig {
    /// Upper bound on players in a single round batch.
    #[serde(default = "default_max_batch_players")]
    pub max_batch_players: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

// Default functions
fn default_current_round() -> u8 {
    13
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_http_port() -> u16 {
    5173
}
fn default_redis_urls() -> Vec<String> {
    vec!["redis://localhost:6379".to_string()]
}
fn default_pool_size() -> u32 {
    32
}
fn default_ttl_secs() -> u64 {
    3600
}
fn default_connect_timeout_ms() -> u64 {
    5000
}
fn default_clickhouse_url() -> String {
    "http://localhost:8123".to_string()
}
fn default_clickhouse_db() -> String {
    "fantasy_manager".to_string()
}
fn default_batch_size() -> usize {
    10000
}
fn default_flush_interval_ms() -> u64 {
    1000
}
fn default_weights_path() -> String {
    "/models/projection-v3.json".to_string()
}
fn default_max_batch() -> usize {
    50
}
fn default_captain_suggestions() -> usize {
    5
}
fn default_magic_number() -> u32 {
    9750
}
fn default_price_floor() -> u32 {
    123_000
}
fn default_salary_cap() -> u64 {
    15_000_000
}
fn default_rookie_price() -> u32 {
    123_000
}
fn default_defenders() -> usize {
    6
}
fn default_midfielders() -> usize {
    8
}
fn default_rucks() -> usize {
    2
}
fn default_forwards() -> usize {
    6
}
fn default_interchange() -> usize {
    8
}
fn default_season_trades() -> u8 {
    36
}
fn default_trades_per_round() -> u8 {
    3
}
fn default_max_batch_players() -> usize {
    700
}
fn default_metrics_port() -> u16 {
    9091
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
        }
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            urls: default_redis_urls(),
            pool_size: default_pool_size(),
            ttl_secs: default_ttl_secs(),
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }
}

impl Default for ClickHouseConfig {
    fn default() -> Self {
        Self {
            url: default_clickhouse_url(),
            database: default_clickhouse_db(),
            batch_size: default_batch_size(),
            flush_interval_ms: default_flush_interval_ms(),
        }
    }
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            weights_path: default_weights_path(),
            max_batch: default_max_batch(),
            captain_suggestions: default_captain_suggestions(),
        }
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            magic_number: default_magic_number(),
            price_floor: default_price_floor(),
            salary_cap: default_salary_cap(),
            rookie_price: default_rookie_price(),
        }
    }
}

impl Default for SquadConfig {
    fn default() -> Self {
        Self {
            defenders: default_defenders(),
            midfielders: default_midfielders(),
            rucks: default_rucks(),
            forwards: default_forwards(),
            interchange: default_interchange(),
            season_trades: default_season_trades(),
            max_trades_per_round: default_trades_per_round(),
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_batch_players: default_max_batch_players(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            port: default_metrics_port(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            current_round: default_current_round(),
            api: ApiConfig::default(),
            redis: RedisConfig::default(),
            clickhouse: ClickHouseConfig::default(),
            projection: ProjectionConfig::default(),
            pricing: PricingConfig::default(),
            squad: SquadConfig::default(),
            ingest: IngestConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl SquadConfig {
    /// On-field player count (6-8-2-6 in the default structure).
    pub fn field_size(&self) -> usize {
        self.defenders + self.midfielders + self.rucks + self.forwards
    }

    /// Full squad size including the interchange bench.
    pub fn squad_size(&self) -> usize {
        self.field_size() + self.interchange
    }
}

impl AppConfig {
    /// Load configuration from environment variables and optional config file.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("FANTASY_MANAGER")
                .separator("__")
                .try_parsing(true)
                .list_separator(","),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api.http_port, 5173);
        assert_eq!(config.current_round, 13);
        assert_eq!(config.squad.field_size(), 22);
        assert_eq!(config.squad.squad_size(), 30);
        assert_eq!(config.pricing.magic_number, 9750);
    }
}
