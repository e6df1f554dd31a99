//! Auth (Authentication & Session Security) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - Email + password login with uniform credential errors
//! - Rotating opaque refresh tokens (one browser session per row)
//! - Short-lived signed access tokens (JWT, 1 hour)
//! - Double-submit CSRF protection for state-changing requests
//! - Session management (list, revoke one, revoke all)
//!
//! ## Security Model
//! - Passwords hashed with Argon2id
//! - Only SHA-256 digests of refresh secrets are persisted
//! - Refresh tokens rotate on every use; replay is detected and rejected
//! - Role-based access (Citizen, Validator, Admin), closed enum

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::sqlite::SqliteAuthRepository;
pub use presentation::middleware::Identity;
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod store {
    pub use crate::infra::sqlite::SqliteAuthRepository as AuthStore;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
