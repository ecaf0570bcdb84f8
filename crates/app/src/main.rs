use std::sync::Arc;
use std::time::Duration;

use migration::{Migrator, MigratorTrait};
use settings::Database;
use tokio::sync::RwLock;

mod rates;
mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;
    let mut tasks = tokio::task::JoinSet::new();

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "gospodar={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let rate_cache = Arc::new(RwLock::new(engine::RateCache::default()));

    {
        let rates_settings = settings.rates;
        let cache = rate_cache.clone();
        tasks.spawn(async move {
            let url = rates_settings
                .as_ref()
                .and_then(|r| r.url.clone())
                .unwrap_or_else(|| rates::DEFAULT_URL.to_string());
            let poll_minutes = rates_settings
                .as_ref()
                .and_then(|r| r.refresh_minutes)
                .unwrap_or(60);
            rates::refresh_loop(url, Duration::from_secs(poll_minutes * 60), cache).await;
        });
    }

    if let Some(server) = settings.server {
        let cache = rate_cache.clone();
        tasks.spawn(async move {
            tracing::info!("Found server settings...");
            let db = match parse_database(&server.database).await {
                Ok(db) => db,
                Err(err) => {
                    tracing::error!("failed to initialize database: {err}");
                    return;
                }
            };

            let engine = engine::Engine::builder().database(db.clone()).build();
            let bind = server.bind.unwrap_or_else(|| "127.0.0.1".to_string());
            let addr = format!("{}:{}", bind, server.port);
            let listener = match tokio::net::TcpListener::bind(addr).await {
                Ok(listener) => listener,
                Err(err) => {
                    tracing::error!("failed to bind server listener: {err}");
                    return;
                }
            };
            if let Err(err) = server::run_with_listener(engine, db, cache, listener).await {
                tracing::error!("server failed: {err}");
            }
        });
    }

    while tasks.join_next().await.is_some() {
        tasks.shutdown().await;
    }

    Ok(())
}

async fn parse_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
