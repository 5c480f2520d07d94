use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

mod error;
mod middleware;
mod models;
mod receipts;
mod repositories;
mod routes;
mod settings;
mod state;
mod store;

use auth::provider::AuthProviderConfig;
use auth::users::UserAdmin;
use auth::{HttpAuthProvider, PgRoleResolver, SessionManager};
use common::cache::{RedisConfig, RedisPool};
use common::database::{DatabaseConfig, init_pool};

use crate::receipts::ReceiptDispatcher;
use crate::settings::Settings;
use crate::state::AppState;
use crate::store::ChurchStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting church administration service");

    let settings = Settings::new()?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if common::database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    // The cache is optional; without it sign-out simply skips the flush.
    let cache = match RedisConfig::from_env() {
        Ok(config) => match RedisPool::new(&config).await {
            Ok(pool) => Some(pool),
            Err(e) => {
                warn!("Cache unavailable, continuing without it: {}", e);
                None
            }
        },
        Err(e) => {
            warn!("Cache not configured, continuing without it: {}", e);
            None
        }
    };

    // Auth provider and the single process-wide session
    let provider = Arc::new(HttpAuthProvider::new(AuthProviderConfig::from_env()?));
    let resolver = Arc::new(PgRoleResolver::new(pool.clone()));
    let session = Arc::new(SessionManager::new(provider.clone(), resolver, cache));
    session.initialize().await?;

    let store = Arc::new(ChurchStore::new(pool.clone()));
    if session.is_authenticated() {
        if let Err(e) = store.load_all().await {
            warn!("Initial data load failed: {}", e);
        }
    }

    let receipts = Arc::new(ReceiptDispatcher::with_delay(Duration::from_secs(
        settings.receipts.delay_seconds,
    )));
    let user_admin = Arc::new(UserAdmin::new(provider, pool.clone()));

    let app_state = AppState {
        db_pool: pool,
        session: session.clone(),
        store,
        receipts,
        user_admin,
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let bind_address = settings.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Church administration service listening on {}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down");
    session.shutdown();

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
}
