//! Forgemart Server: application entry point.

use std::time::Duration;

use forgemart_auth::SessionService;
use forgemart_db::repository::{SurrealSessionRepository, SurrealUserRepository};
use forgemart_db::{DbConfig, DbManager};
use forgemart_server::{AppState, CookiePolicy, ServerConfig, create_app};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("forgemart=info".parse().unwrap()),
        )
        .json()
        .init();

    let config = ServerConfig::from_env();
    tracing::info!(bind = %config.bind, "Starting Forgemart server");

    let db_config = DbConfig::from_env();
    let manager = DbManager::connect(&db_config)
        .await
        .expect("database connection failed");
    let db = manager.client().clone();

    forgemart_db::run_migrations(&db)
        .await
        .expect("migrations failed");

    let sessions = SessionService::new(
        SurrealUserRepository::new(db.clone()),
        SurrealSessionRepository::new(db),
        config.session.clone(),
    );
    let state = AppState::new(
        sessions,
        CookiePolicy {
            secure: config.cookie_secure,
            max_age_secs: config.session.lifetime_secs(),
        },
    );

    // Hygiene sweep. Validation re-checks expiry itself, so this only
    // keeps the session table small.
    let sweep_state = state.clone();
    let sweep_interval = config.sweep_interval_secs;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(sweep_interval));
        loop {
            interval.tick().await;
            match sweep_state.sessions.sweep_expired().await {
                Ok(0) => {}
                Ok(removed) => tracing::info!(removed, "Swept expired sessions"),
                Err(e) => tracing::warn!(error = %e, "Expired-session sweep failed"),
            }
        }
    });

    let app = create_app(state);
    let listener = TcpListener::bind(&config.bind)
        .await
        .expect("failed to bind listen address");

    tracing::info!(bind = %config.bind, "Forgemart server listening");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "Server error");
    }

    tracing::info!("Forgemart server stopped.");
}
