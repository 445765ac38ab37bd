//! Asynchronous platform event logger that batches events and writes to
//! ClickHouse. Uses a channel-based architecture for non-blocking event
//! submission.

use chrono::Utc;
use fantasy_core::config::ClickHouseConfig;
use fantasy_core::types::{EventType, FantasyEvent};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Event fields beyond the identifying type/round pair. Everything is
/// optional; handlers fill in what they have.
#[derive(Debug, Default, Clone)]
pub struct EventFields {
    pub player_id: Option<u32>,
    pub owner_id: Option<String>,
    pub points: Option<i32>,
    pub price: Option<u32>,
    pub detail: Option<String>,
    pub latency_us: Option<u64>,
}

/// Analytics logger with background batch writer.
///
/// In API-only mode (`disabled`) events are counted and dropped without a
/// ClickHouse connection.
pub struct AnalyticsLogger {
    sender: Option<mpsc::Sender<FantasyEvent>>,
}

impl AnalyticsLogger {
    /// Create a new analytics logger and spawn the background writer.
    pub async fn new(config: &ClickHouseConfig) -> anyhow::Result<Self> {
        let (sender, receiver) = mpsc::channel::<FantasyEvent>(100_000);

        let writer = BatchWriter::new(config).await?;
        let batch_size = config.batch_size;
        let flush_interval = std::time::Duration::from_millis(config.flush_interval_ms);

        // Spawn background batch writer
        tokio::spawn(async move {
            writer.run(receiver, batch_size, flush_interval).await;
        });

        info!("Analytics logger initialized with ClickHouse backend");

        Ok(Self {
            sender: Some(sender),
        })
    }

    /// Logger that drops events instead of writing them. Used when the
    /// service runs without an analytics backend.
    pub fn disabled() -> Self {
        info!("Analytics logger running in drop mode (no ClickHouse backend)");
        Self { sender: None }
    }

    /// Log a platform event (non-blocking).
    pub fn log_event(&self, event_type: EventType, round: u8, fields: EventFields) {
        let event = FantasyEvent {
            event_id: Uuid::new_v4(),
            event_type,
            round,
            player_id: fields.player_id,
            owner_id: fields.owner_id,
            points: fields.points,
            price: fields.price,
            detail: fields.detail,
            latency_us: fields.latency_us,
            timestamp: Utc::now(),
        };

        let Some(sender) = &self.sender else {
            metrics::counter!("analytics.skipped").increment(1);
            debug!(event_type = ?event.event_type, "Analytics disabled, event skipped");
            return;
        };

        if let Err(e) = sender.try_send(event) {
            metrics::counter!("analytics.dropped").increment(1);
            warn!("Analytics event dropped: {}", e);
        } else {
            metrics::counter!("analytics.queued").increment(1);
        }
    }
}

/// Background writer that batches events and flushes to ClickHouse.
struct BatchWriter {
    client: clickhouse::Client,
}

impl BatchWriter {
    async fn new(config: &ClickHouseConfig) -> anyhow::Result<Self> {
        let client = clickhouse::Client::default()
            .with_url(&config.url)
            .with_database(&config.database);

        // Create the events table if it doesn't exist
        Self::ensure_schema(&client).await?;

        Ok(Self { client })
    }

    async fn ensure_schema(client: &clickhouse::Client) -> anyhow::Result<()> {
        client
            .query(
                "CREATE TABLE IF NOT EXISTS fantasy_events (
                    event_id UUID,
                    event_type String,
                    round UInt8,
                    player_id Nullable(UInt32),
                    owner_id Nullable(String),
                    points Nullable(Int32),
                    price Nullable(UInt32),
                    detail Nullable(String),
                    latency_us Nullable(UInt64),
                    timestamp DateTime64(3)
                ) ENGINE = MergeTree()
                ORDER BY (timestamp, event_type, round)
                PARTITION BY toYYYYMM(timestamp)
                TTL timestamp + INTERVAL 90 DAY",
            )
            .execute()
            .await?;

        info!("ClickHouse schema verified");
        Ok(())
    }

    async fn run(
        self,
        mut receiver: mpsc::Receiver<FantasyEvent>,
        batch_size: usize,
        flush_interval: std::time::Duration,
    ) {
        let mut buffer: Vec<FantasyEvent> = Vec::with_capacity(batch_size);
        let mut interval = tokio::time::interval(flush_interval);

        loop {
            tokio::select! {
                Some(event) = receiver.recv() => {
                    buffer.push(event);
                    if buffer.len() >= batch_size {
                        self.flush(&mut buffer).await;
                    }
                }
                _ = interval.tick() => {
                    if !buffer.is_empty() {
                        self.flush(&mut buffer).await;
                    }
                }
            }
        }
    }

    async fn flush(&self, buffer: &mut Vec<FantasyEvent>) {
        let count = buffer.len();
        debug!(count = count, "Flushing event batch to ClickHouse");

        // Serialize events as NDJSON and insert
        let mut json_rows = Vec::with_capacity(buffer.len());
        for e in buffer.iter() {
            if let Ok(json) = serde_json::to_string(e) {
                json_rows.push(json);
            }
        }

        if json_rows.is_empty() {
            buffer.clear();
            return;
        }

        let insert_sql = format!(
            "INSERT INTO fantasy_events FORMAT JSONEachRow {}",
            json_rows.join("\n")
        );

        match self.client.query(&insert_sql).execute().await {
            Ok(_) => {
                metrics::counter!("analytics.flushed").increment(count as u64);
                debug!(count = count, "Event batch flushed successfully");
            }
            Err(e) => {
                metrics::counter!("analytics.flush_errors").increment(1);
                error!(error = %e, count = count, "Failed to flush event batch");
            }
        }

        buffer.clear();
    }
}
