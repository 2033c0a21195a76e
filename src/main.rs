use std::path::PathBuf;

use oci_metrics_shipper::config::Config;
use oci_metrics_shipper::{local_test_mode, set_up_logging};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    set_up_logging();

    info!(
        "Initializing {} version {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::load_from_env()?;
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("oci-metrics-test-file.json"));

    local_test_mode(&config, &path).await?;
    Ok(())
}
