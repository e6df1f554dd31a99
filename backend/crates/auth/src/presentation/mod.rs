//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod csrf;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use csrf::{CsrfState, csrf_guard, mint_csrf_token};
pub use handlers::AuthAppState;
pub use middleware::{AuthGateState, Identity, require_auth, require_reviewer};
pub use router::{auth_router, auth_router_generic};
