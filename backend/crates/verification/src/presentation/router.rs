//! Verification Routers
//!
//! Two surfaces: citizen self-service and the validator queue. Auth and
//! role middleware are layered on by the binary when composing the app.

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::domain::repository::VerificationRepository;
use crate::infra::sqlite::SqliteVerificationRepository;
use crate::presentation::handlers::{self, VerificationAppState};

/// Citizen-facing router with the SQLite repository
pub fn verification_router(repo: SqliteVerificationRepository) -> Router {
    verification_router_generic(repo)
}

/// Citizen-facing router for any repository implementation
pub fn verification_router_generic<R>(repo: R) -> Router
where
    R: VerificationRepository + Clone + Send + Sync + 'static,
{
    let state = VerificationAppState {
        repo: Arc::new(repo),
    };

    Router::new()
        .route(
            "/application",
            post(handlers::submit_application::<R>).get(handlers::own_application::<R>),
        )
        .with_state(state)
}

/// Validator-facing router with the SQLite repository
pub fn validator_router(repo: SqliteVerificationRepository) -> Router {
    validator_router_generic(repo)
}

/// Validator-facing router for any repository implementation
pub fn validator_router_generic<R>(repo: R) -> Router
where
    R: VerificationRepository + Clone + Send + Sync + 'static,
{
    let state = VerificationAppState {
        repo: Arc::new(repo),
    };

    Router::new()
        .route("/queue", get(handlers::list_applications::<R>))
        .route("/application/{id}", get(handlers::application_detail::<R>))
        .route(
            "/application/{id}/reopen",
            post(handlers::reopen_application::<R>),
        )
        .route("/action", post(handlers::apply_action::<R>))
        .route("/history", get(handlers::action_history::<R>))
        .with_state(state)
}
