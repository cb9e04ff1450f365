use anyhow::{Context, Result};
use glossary_server::{LoggingConfig, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    dotenv::dotenv().ok();

    // Logging first, so configuration warnings are visible
    glossary_server::init_logging(&LoggingConfig::from_env())?;

    // Load configuration from environment variables
    let config = ServerConfig::load().context("Failed to load configuration")?;

    glossary_server::run(config).await.context("Server error")?;

    Ok(())
}
