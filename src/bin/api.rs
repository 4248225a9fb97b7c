use complaint_triage::{api::start_server, config::AppConfig, service::TriageService};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;

    info!("Complaint Triage - API Server");
    info!("Port: {}", config.port);
    info!("Database: {}", config.database_url);
    if config.mail_relay_url.is_none() {
        info!("MAIL_RELAY_URL not set, customer notifications will only be logged");
    }

    let service = Arc::new(TriageService::from_config(&config).await?);

    info!("Triage service initialized");
    info!("Starting API server...");

    start_server(service, config.port).await?;

    Ok(())
}
