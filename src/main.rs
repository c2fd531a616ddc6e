//! Familjebudget server entry point.

use dotenvy::dotenv;
use familjebudget::{api, config::database, core::settings, errors::Result};
use std::env;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (non-fatal, env vars can be set externally)
    dotenv().ok();

    // 3. Initialize database and schema
    let db = database::create_connection().await?;
    database::create_tables(&db).await?;
    info!("Database initialized successfully.");

    // 4. Seed default settings (person names) if missing
    settings::seed_default_settings(&db).await?;
    info!("Default settings seeded.");

    // 5. Serve the API
    let port = env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    info!("Listening on port {port}");

    axum::serve(listener, api::router(db)).await?;

    Ok(())
}
