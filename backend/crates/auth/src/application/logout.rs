//! Logout Use Cases
//!
//! A logout revokes the presented refresh token; the logout-all variant
//! revokes every live session of the authenticated user. Both are
//! idempotent.

use std::sync::Arc;

use platform::token;

use crate::domain::repository::RefreshTokenRepository;
use crate::error::AuthResult;
use kernel::id::UserId;

/// Logout use case
pub struct LogoutUseCase<R>
where
    R: RefreshTokenRepository,
{
    repo: Arc<R>,
}

impl<R> LogoutUseCase<R>
where
    R: RefreshTokenRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Revoke the session behind a refresh cookie. An unknown or already
    /// revoked token is not an error; cookie clearing happens regardless.
    pub async fn execute(&self, presented_secret: &str) -> AuthResult<()> {
        let hash = token::hash_secret(presented_secret);
        let revoked = self.repo.revoke_token(&hash).await?;

        if revoked {
            tracing::debug!("Session revoked on logout");
        }

        Ok(())
    }

    /// Revoke every live session for the user. Returns how many were live.
    pub async fn execute_all(&self, user_id: UserId) -> AuthResult<u64> {
        let count = self.repo.revoke_all_for_user(user_id).await?;

        tracing::info!(user_id = %user_id, revoked = count, "All sessions revoked");

        Ok(count)
    }
}
