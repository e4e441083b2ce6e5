use rusty_library_records::{
    adapters::{memory::MemoryStore, postgres::PgStore},
    api::{handlers::AppState, router::create_router},
    application::{ServiceDependencies, accounts},
    config::{Config, StorageConfig},
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // .env is optional
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "rusty_library_records=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // Initialize the record store
    let service_deps = match &config.storage {
        StorageConfig::Memory => {
            tracing::warn!("Using in-memory storage; records are lost on shutdown");
            ServiceDependencies::from_store(MemoryStore::new())
        }
        StorageConfig::Postgres {
            database_url,
            max_connections,
        } => {
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(*max_connections)
                .connect(database_url)
                .await?;

            sqlx::migrate!("./migrations").run(&pool).await?;
            tracing::info!("Database migrations applied");

            ServiceDependencies::from_store(PgStore::new(pool))
        }
    };

    if let Some(admin) = &config.bootstrap_admin {
        match accounts::ensure_admin(&service_deps, &admin.username, &admin.password).await? {
            Some(user) => tracing::info!(username = %user.username, "Bootstrap admin created"),
            None => tracing::debug!(username = %admin.username, "Bootstrap admin already exists"),
        }
    }

    // Create application state and router
    let app_state = Arc::new(AppState { service_deps });
    let app = create_router(app_state);

    // Server configuration
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    // Start server
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
