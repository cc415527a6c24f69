#![allow(clippy::result_large_err)]

use dotenvy::dotenv;
use soundboard_bot::{
    bot,
    config::{AppConfig, storage},
    errors::Result,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; variables may also come from the real environment
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the application configuration
    let app_config = AppConfig::load()
        .inspect_err(|e| error!("Critical error loading application configuration: {}", e))?;
    info!("Successfully processed application configuration.");

    // 4. Make sure the sounds directory exists before any community needs it
    storage::ensure_dir(&app_config.sounds_directory)
        .await
        .inspect(|_| info!("Sounds directory ready at {}", app_config.sounds_directory.display()))
        .inspect_err(|e| error!("Failed to prepare sounds directory: {}", e))?;

    // 5. Run the bot
    bot::run_bot(Arc::new(app_config)).await
}
