use std::env;
use std::path::Path;

use serde_json::Value;
use tracing::level_filters::LevelFilter;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::error::Error;

pub mod config;
pub mod error;
pub mod moogsoft;
pub mod transform;

/// Sets all logging to the LOGGING_LEVEL configuration option (default INFO);
/// RUST_LOG directives still take precedence when set.
pub fn set_up_logging() {
    let default_level = env::var("LOGGING_LEVEL")
        .ok()
        .and_then(|level| level.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::INFO);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy(),
        )
        .init();
}

/// Invocation entry point. The payload is a JSON array of raw metric records
/// delivered by the host; the return value is the plain-text response handed
/// back to it. Every error is logged and folded into the response text - the
/// invocation itself never fails from the host's point of view.
pub async fn function_handler(config: &Config, payload: &[u8]) -> String {
    match handle_payload(config, payload).await {
        Ok(count) => format!("processed {} metric records", count),
        Err(err) => {
            error!("error handling metrics payload: {}", err);
            format!("error handling metrics payload: {}", err)
        }
    }
}

async fn handle_payload(config: &Config, payload: &[u8]) -> Result<usize, Error> {
    let metrics_list: Vec<Value> = serde_json::from_slice(payload)?;
    info!(
        "event count = {} / forwarding to MoogSoft = {}",
        metrics_list.len(),
        config.forwarding_enabled
    );

    let transformed = transform::transform_batch(&metrics_list, config)?;
    moogsoft::forward(&transformed, config).await?;

    Ok(metrics_list.len())
}

/// Offline mode: runs a newline-delimited JSON metrics file (e.g. exported
/// from the OCI Monitoring UI or CLI) through the same transform-and-forward
/// path as a live invocation.
pub async fn local_test_mode(config: &Config, path: &Path) -> Result<(), Error> {
    info!("local testing started");

    let contents = tokio::fs::read_to_string(path).await?;

    let mut transformed = Vec::new();
    for line in contents.lines().filter(|line| !line.trim().is_empty()) {
        let record: Value = serde_json::from_str(line)?;
        debug!("read record: {}", record);
        transformed.push(transform::transform_record(&record, config)?);
    }

    moogsoft::forward(&transformed, config).await?;

    info!("local testing completed");
    Ok(())
}
