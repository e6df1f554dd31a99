//! Submit Application Use Case
//!
//! Citizens submit (or resubmit) their identity documents for review.

use std::sync::Arc;

use crate::domain::entities::{Application, ApplicationDraft};
use crate::domain::repository::VerificationRepository;
use crate::error::VerificationResult;
use kernel::id::UserId;

/// Submit application use case
pub struct SubmitApplicationUseCase<R>
where
    R: VerificationRepository,
{
    repo: Arc<R>,
}

impl<R> SubmitApplicationUseCase<R>
where
    R: VerificationRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// First submissions create the application; resubmissions after a
    /// rejection or info request reset it to pending. A pending or
    /// approved application conflicts.
    pub async fn execute(&self, draft: ApplicationDraft) -> VerificationResult<Application> {
        let application = self.repo.submit(&draft).await?;

        tracing::info!(
            application_id = %application.id,
            user_id = %application.user_id,
            "Identity application submitted"
        );

        Ok(application)
    }

    /// The citizen's own view of their application.
    pub async fn status(&self, user_id: UserId) -> VerificationResult<Option<Application>> {
        self.repo.find_by_user(user_id).await
    }
}
