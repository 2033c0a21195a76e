//! Forwards transformed metric records to the MoogSoft ingestion endpoint.

use std::time::{Duration, Instant};

use http::header::CONTENT_TYPE;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::Error;
use crate::transform::OutputRecord;

// One reusable connection pool per forward call, bounded so a large batch
// does not fan out into unbounded connections.
const POOL_MAX_IDLE_PER_HOST: usize = 10;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// MoogSoft acknowledges ingestion with any of these.
const ACCEPTED_STATUSES: [u16; 3] = [200, 201, 202];

/// Sends each transformed record to the configured endpoint, one POST per
/// record. When forwarding is disabled the serialized batch is logged instead
/// and nothing is sent. The first non-accepted status aborts remaining sends;
/// the connection pool is dropped on every exit path.
pub async fn forward(groups: &[Vec<OutputRecord>], config: &Config) -> Result<(), Error> {
    if !config.forwarding_enabled {
        info!("MoogSoft forwarding is disabled - nothing sent");
        info!("{}", serde_json::to_string_pretty(groups)?);
        return Ok(());
    }

    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
        .timeout(REQUEST_TIMEOUT)
        .build()?;

    for record in groups.iter().flatten() {
        debug!("json to MoogSoft: {}", serde_json::to_string(record)?);

        let start = Instant::now();
        let response = client
            .post(&config.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header("apiKey", &config.api_key)
            .json(record)
            .send()
            .await?;

        let status = response.status();
        info!(
            status = %status,
            elapsed_ms = start.elapsed().as_millis(),
            metric = %record.metric,
            "MoogSoft HTTP request completed"
        );

        if !ACCEPTED_STATUSES.contains(&status.as_u16()) {
            return Err(Error::Forwarding {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("unknown").to_string(),
            });
        }
    }

    Ok(())
}
