use std::sync::Arc;

use anyhow::Context;
use storage::{
    Database,
    services::{aggregation::ScoreAggregator, trending::spawn_trending_sweep},
    store::PgStore,
};
use web::{app, config::Config, middleware::auth::ApiKeys, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting company score API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let store = Arc::new(PgStore::new(db.pool().clone()));

    let (aggregator, retry_worker) = ScoreAggregator::new(store.clone(), config.retry_policy);
    tokio::spawn(retry_worker.run());
    tracing::info!(policy = ?aggregator.policy(), "Score retry worker started");

    spawn_trending_sweep(store.clone(), config.trending_interval);
    tracing::info!(
        interval_secs = config.trending_interval.as_secs(),
        "Trending sweep scheduled"
    );

    let state = AppState::new(store.clone(), store, aggregator);
    let api_keys = ApiKeys::from_comma_separated(&config.api_keys);

    let bind_address = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {bind_address}"))?;
    axum::serve(listener, app(state, api_keys))
        .await
        .context("Server error")?;

    Ok(())
}
