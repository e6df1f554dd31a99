//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use auth::application::AuthConfig;
use auth::domain::repository::RefreshTokenRepository;
use auth::domain::value_object::email::Email;
use auth::presentation::csrf::{CSRF_HEADER_NAME, CsrfState, csrf_guard};
use auth::presentation::middleware::{AuthGateState, require_auth, require_reviewer};
use auth::presentation::router::auth_router;
use auth::store::AuthStore;
use axum::{
    Router, http,
    http::{Method, header},
    middleware::{from_fn, from_fn_with_state},
};
use platform::password::ClearTextPassword;
use sqlx::sqlite::SqlitePoolOptions;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use verification::store::VerificationStore;

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

const SWEEP_INTERVAL_SECS: u64 = 3600;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,auth=info,verification=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://portal.db?mode=rwc".to_string());

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let auth_config = Arc::new(AuthConfig::from_env()?);

    let auth_store = AuthStore::new(pool.clone());
    let verification_store = VerificationStore::new(pool.clone());

    seed_admin(&auth_store).await?;

    // Startup cleanup: drop revoked and expired refresh tokens.
    // Errors here should not prevent server startup.
    match auth_store.sweep_expired().await {
        Ok(removed) => {
            tracing::info!(tokens_removed = removed, "Session sweep completed");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Session sweep failed, continuing anyway");
        }
    }

    // Periodic sweep keeps the refresh token table bounded
    let sweeper_store = auth_store.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(SWEEP_INTERVAL_SECS));
        ticker.tick().await; // first tick fires immediately
        loop {
            ticker.tick().await;
            match sweeper_store.sweep_expired().await {
                Ok(removed) if removed > 0 => {
                    tracing::info!(tokens_removed = removed, "Session sweep completed");
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "Session sweep failed");
                }
            }
        }
    });

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:5173,http://127.0.0.1:5173".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            http::HeaderName::from_static(CSRF_HEADER_NAME),
        ]))
        .allow_credentials(true);

    let gate = AuthGateState {
        config: auth_config.clone(),
    };
    let csrf = CsrfState {
        config: auth_config.clone(),
    };

    // Build router. The auth gate wraps the verification surfaces; the
    // validator surface adds a role check inside the gate. The CSRF guard
    // sits over everything and lets safe methods through on its own.
    let app = Router::new()
        .nest("/api/auth", auth_router(auth_store, auth_config))
        .nest(
            "/api/verification",
            verification::verification_router(verification_store.clone())
                .route_layer(from_fn_with_state(gate.clone(), require_auth)),
        )
        .nest(
            "/api/validator",
            verification::validator_router(verification_store)
                .route_layer(from_fn(require_reviewer))
                .route_layer(from_fn_with_state(gate, require_auth)),
        )
        .layer(from_fn_with_state(csrf, csrf_guard))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(31113);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Seed the initial admin when the users table is empty.
async fn seed_admin(store: &AuthStore) -> anyhow::Result<()> {
    let email = env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".to_string());
    let password = env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "ChangeMe123!".to_string());

    let email = Email::new(&email).map_err(|e| anyhow::anyhow!("invalid ADMIN_EMAIL: {e}"))?;
    let password_hash = ClearTextPassword::new_unchecked(password)
        .hash()
        .map_err(|e| anyhow::anyhow!("failed to hash admin password: {e}"))?;

    store
        .ensure_default_admin(&email, &password_hash, "Portal Admin")
        .await?;

    Ok(())
}
