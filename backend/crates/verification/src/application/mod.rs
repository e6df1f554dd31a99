//! Application Layer
//!
//! Use cases for the identity verification workflow.

pub mod review_queue;
pub mod submit_application;
pub mod validator_action;

// Re-exports
pub use review_queue::ReviewQueueUseCase;
pub use submit_application::SubmitApplicationUseCase;
pub use validator_action::ValidatorActionUseCase;
