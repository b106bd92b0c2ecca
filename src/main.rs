use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tracing::info;

use banking_engine::config::Settings;
use banking_engine::observability::{init_logging, init_metrics, LogConfig, LogFormat};
use banking_engine::services::{
    ApplicationWorkflow, LedgerEngine, ReportingService, ValidationRules,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;

    init_logging(&LogConfig {
        level: settings.application.log_level.clone(),
        format: LogFormat::Compact,
    });
    info!("Configuration loaded");

    // Connect to PostgreSQL
    info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(settings.database.pool_size)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&settings.database.url)
        .await?;
    info!("Database connection established");

    // Run migrations
    info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Migrations applied successfully");

    // Install the Prometheus recorder
    let _metrics_handle = init_metrics();
    info!("Metrics recorder installed");

    let rules = ValidationRules::new(settings.limits.clone());
    let _ledger = LedgerEngine::new(pool.clone(), rules);
    let _workflow = ApplicationWorkflow::new(pool.clone());
    let _reporting = ReportingService::new(pool);

    info!(
        port = settings.application.port,
        "System startup verification complete: banking engine ready."
    );

    Ok(())
}
