//! Identity Verification Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, routers
//!
//! ## Workflow
//! - Citizens submit identity documents; one application per user
//! - Validators work the pending queue: approve, reject, or request info
//! - Rejected and needs-info applications may be resubmitted
//! - A validator may reopen a resolved application for re-review
//! - Every decision is recorded in an append-only audit log
//!
//! State transitions are atomic: the application row, the user's
//! verification status, and the audit log move together.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use error::{VerificationError, VerificationResult};
pub use infra::sqlite::SqliteVerificationRepository;
pub use presentation::router::{validator_router, verification_router};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entities::*;
    pub use crate::domain::value_objects::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod store {
    pub use crate::infra::sqlite::SqliteVerificationRepository as VerificationStore;
}

pub mod router {
    pub use crate::presentation::router::*;
}
