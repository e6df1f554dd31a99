//! Current User Use Case
//!
//! Serves `GET /auth/me`. Reads the user row fresh rather than trusting the
//! access-token snapshot, so this endpoint is the source of truth for
//! verification status between refreshes.

use std::sync::Arc;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};
use kernel::id::UserId;

/// Current user use case
pub struct CurrentUserUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
}

impl<R> CurrentUserUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// A valid token whose user row has vanished is treated as
    /// unauthenticated, not as an internal error.
    pub async fn execute(&self, user_id: UserId) -> AuthResult<User> {
        self.repo
            .find_user_by_id(user_id)
            .await?
            .ok_or(AuthError::Unauthenticated)
    }
}
