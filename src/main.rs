use anyhow::Result;
use cam_analytics::api::rest::{AppState, RestApi};
use cam_analytics::{config, db};
use log::info;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();
    info!("Starting Analytics Event Lifecycle Service");

    // Optional config file as the first argument, defaults otherwise
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = config::load_config(config_path.as_deref())?;
    info!("Configuration loaded");

    // Connect to the database and run migrations
    let database = db::DatabaseService::new(&config.database).await?;

    // Upload and report directories must exist before the first request
    std::fs::create_dir_all(&config.upload.root)?;
    std::fs::create_dir_all(&config.report.output_dir)?;

    let state = AppState::new(database.pool.clone(), &config);

    let http_server = RestApi::new(&config.api, state, config.upload.max_payload_mb)?;
    http_server.run().await?;

    Ok(())
}
