use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use bikerental::config::AppConfig;
use bikerental::db::{self, SqliteStore, Store};
use bikerental::handlers;
use bikerental::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let mut conn = db::init_db(&config.database_url)?;
    tracing::info!("using database at {}", config.database_url);

    if config.seed_data && !db::seed::seed_demo_data(&mut conn)? {
        tracing::info!("database already has bikes, skipping demo seed");
    }

    let store: Arc<dyn Store> = Arc::new(SqliteStore::new(conn));
    let state = Arc::new(AppState::new(store));
    let app = handlers::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
