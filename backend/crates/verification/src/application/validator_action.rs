//! Validator Action Use Case
//!
//! Applies a validator decision (approve, reject, request-info) to a
//! pending application, or reopens a resolved one, recording it in the
//! audit log either way.

use std::sync::Arc;

use crate::domain::entities::Application;
use crate::domain::repository::VerificationRepository;
use crate::domain::value_objects::ValidatorActionKind;
use crate::error::VerificationResult;
use kernel::id::{ApplicationId, UserId};

/// Validator action use case
pub struct ValidatorActionUseCase<R>
where
    R: VerificationRepository,
{
    repo: Arc<R>,
}

impl<R> ValidatorActionUseCase<R>
where
    R: VerificationRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        application_id: ApplicationId,
        validator_id: UserId,
        action: ValidatorActionKind,
        notes: Option<String>,
    ) -> VerificationResult<Application> {
        // Blank notes are the same as no notes
        let notes = notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());

        self.repo
            .apply_action(application_id, validator_id, action, notes)
            .await
    }

    /// Reset a resolved application back to pending.
    pub async fn reopen(
        &self,
        application_id: ApplicationId,
        validator_id: UserId,
    ) -> VerificationResult<Application> {
        self.execute(application_id, validator_id, ValidatorActionKind::Reopen, None)
            .await
    }
}
