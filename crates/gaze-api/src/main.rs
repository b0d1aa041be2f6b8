//! Gaze Estimation Server - Main Entry Point
//!
//! Usage: gaze-server [CONFIG]   (defaults to ./gaze.toml when present)

use gaze_api::{init_logging, run_server, Settings};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    info!("=== Gaze Estimation v{} ===", env!("CARGO_PKG_VERSION"));

    let path = std::env::args().nth(1);
    let settings = Settings::load(path.as_deref())?;
    run_server(settings).await?;

    Ok(())
}
