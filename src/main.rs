use anyhow::Result;
use authloop::{app, config, db, handlers::AppState};
use clap::Parser;
use config::Config;
use std::sync::Arc;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "authloop=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Parse configuration from CLI args and environment variables
    let config = Config::parse();
    let database_url = config.get_database_url();

    tokio::fs::create_dir_all(&config.data_dir).await?;
    tracing::info!("📁 Data directory: {}", config.data_dir.display());

    // Initialize database (this will also create the database file)
    let db = db::Database::new(&database_url).await?;
    tracing::info!("💾 Database initialized: {}", database_url);

    // Set up session store
    let session_store = SqliteStore::new(db.pool().clone());
    session_store.migrate().await?;

    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(config.secure_cookies)
        .with_expiry(Expiry::OnInactivity(time::Duration::days(
            config.session_days,
        )));

    let app_state = Arc::new(AppState {
        backend: Arc::new(db),
    });

    let app = app::router(app_state, session_layer, &config.static_dir);

    // Start server
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("🚀 authloop listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
