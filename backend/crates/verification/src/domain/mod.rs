//! Domain Layer

pub mod entities;
pub mod repository;
pub mod value_objects;

pub use entities::{Application, ApplicationDraft, ValidatorActionRecord};
pub use repository::VerificationRepository;
pub use value_objects::{ApplicationStatus, ValidatorActionKind};
