//! Auth Router

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::infra::sqlite::SqliteAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{AuthGateState, require_auth};

/// Create the Auth router with the SQLite repository
pub fn auth_router(repo: SqliteAuthRepository, config: Arc<AuthConfig>) -> Router {
    auth_router_generic(repo, config)
}

/// Create a generic Auth router for any repository implementation
pub fn auth_router_generic<R>(repo: R, config: Arc<AuthConfig>) -> Router
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    let state = AuthAppState {
        repo: Arc::new(repo),
        config: config.clone(),
    };
    let gate = AuthGateState { config };

    let protected = Router::new()
        .route("/logout-all", post(handlers::logout_all::<R>))
        .route("/me", get(handlers::me::<R>))
        .route("/sessions", get(handlers::sessions::<R>))
        .route("/sessions/{id}", delete(handlers::revoke_session::<R>))
        .route_layer(from_fn_with_state(gate, require_auth));

    Router::new()
        .route("/login", post(handlers::login::<R>))
        .route("/refresh", post(handlers::refresh::<R>))
        .route("/logout", post(handlers::logout::<R>))
        .route("/csrf-token", get(handlers::csrf_token::<R>))
        .merge(protected)
        .with_state(state)
}
