//! Review Queue Use Case
//!
//! Read-side of the validator workflow: the pending queue, single
//! applications, and their audit trails.

use std::sync::Arc;

use crate::domain::entities::{Application, ValidatorActionRecord};
use crate::domain::repository::VerificationRepository;
use crate::domain::value_objects::ApplicationStatus;
use crate::error::{VerificationError, VerificationResult};
use kernel::id::ApplicationId;

/// Review queue use case
pub struct ReviewQueueUseCase<R>
where
    R: VerificationRepository,
{
    repo: Arc<R>,
}

impl<R> ReviewQueueUseCase<R>
where
    R: VerificationRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Applications awaiting review, oldest first.
    pub async fn queue(
        &self,
        status: Option<ApplicationStatus>,
    ) -> VerificationResult<Vec<Application>> {
        self.repo
            .list(status.or(Some(ApplicationStatus::Pending)))
            .await
    }

    pub async fn detail(&self, id: ApplicationId) -> VerificationResult<Application> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(VerificationError::ApplicationNotFound)
    }

    /// Audit trail, newest first. Scoped to one application when a filter
    /// is given; 404 for an unknown application rather than an empty trail.
    pub async fn history(
        &self,
        id: Option<ApplicationId>,
    ) -> VerificationResult<Vec<ValidatorActionRecord>> {
        if let Some(id) = id {
            self.detail(id).await?;
        }
        self.repo.history(id).await
    }
}
