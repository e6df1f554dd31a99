//! Session Management Use Case
//!
//! Lists a user's live sessions for self-service review and revokes single
//! sessions by id.

use std::sync::Arc;

use platform::token;

use crate::domain::entity::refresh_token::SessionInfo;
use crate::domain::repository::RefreshTokenRepository;
use crate::error::{AuthError, AuthResult};
use kernel::id::{RefreshTokenId, UserId};

/// Session management use case
pub struct SessionsUseCase<R>
where
    R: RefreshTokenRepository,
{
    repo: Arc<R>,
}

impl<R> SessionsUseCase<R>
where
    R: RefreshTokenRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// List live sessions, marking the one behind the caller's own cookie.
    pub async fn list(
        &self,
        user_id: UserId,
        current_secret: Option<&str>,
    ) -> AuthResult<Vec<SessionInfo>> {
        let current_hash = current_secret.map(token::hash_secret);

        let tokens = self.repo.list_active_for_user(user_id).await?;

        Ok(tokens
            .iter()
            .map(|t| {
                let mut info = SessionInfo::from(t);
                info.is_current = current_hash.as_deref() == Some(t.token_hash.as_str());
                info
            })
            .collect())
    }

    /// Revoke one session by id, scoped to the owner.
    pub async fn revoke(&self, user_id: UserId, token_id: RefreshTokenId) -> AuthResult<()> {
        let revoked = self.repo.revoke_by_id(user_id, token_id).await?;
        if !revoked {
            return Err(AuthError::SessionNotFound);
        }

        tracing::info!(user_id = %user_id, session_id = %token_id, "Session revoked by owner");

        Ok(())
    }
}
