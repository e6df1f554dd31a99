//! Presentation Layer

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::VerificationAppState;
pub use router::{
    validator_router, validator_router_generic, verification_router, verification_router_generic,
};
