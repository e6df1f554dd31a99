//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.
//! State transitions are atomic at this boundary: a decision updates the
//! application, the user's verification status, and the audit log together
//! or not at all.

use crate::domain::entities::{Application, ApplicationDraft, ValidatorActionRecord};
use crate::domain::value_objects::{ApplicationStatus, ValidatorActionKind};
use crate::error::VerificationResult;
use kernel::id::{ApplicationId, UserId};

/// Verification repository trait
#[trait_variant::make(VerificationRepository: Send)]
pub trait LocalVerificationRepository {
    /// Submit or resubmit an application. A first submission inserts the
    /// row; a resubmission after rejection or an info request resets the
    /// existing row to pending. Pending and approved states conflict.
    async fn submit(&self, draft: &ApplicationDraft) -> VerificationResult<Application>;

    /// Find an application by id
    async fn find_by_id(&self, id: ApplicationId) -> VerificationResult<Option<Application>>;

    /// Find a user's application, if any
    async fn find_by_user(&self, user_id: UserId) -> VerificationResult<Option<Application>>;

    /// List applications, optionally filtered by status, oldest first
    async fn list(
        &self,
        status: Option<ApplicationStatus>,
    ) -> VerificationResult<Vec<Application>>;

    /// Apply a validator decision atomically: guard the expected state,
    /// update the application and the user row, and append to the audit
    /// log. Exactly one concurrent decision on the same application wins.
    async fn apply_action(
        &self,
        application_id: ApplicationId,
        validator_id: UserId,
        action: ValidatorActionKind,
        notes: Option<String>,
    ) -> VerificationResult<Application>;

    /// Audit trail, newest first, optionally scoped to one application
    async fn history(
        &self,
        application_id: Option<ApplicationId>,
    ) -> VerificationResult<Vec<ValidatorActionRecord>>;
}
