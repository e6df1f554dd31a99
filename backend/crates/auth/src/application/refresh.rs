//! Refresh Use Case
//!
//! Rotate-on-use: the presented refresh token is revoked and replaced in a
//! single atomic step, then a fresh access token is issued. Presenting an
//! already-rotated token is treated as replay and rejected.

use std::sync::Arc;

use platform::client::DeviceMeta;
use platform::token;

use crate::application::config::AuthConfig;
use crate::application::token_issuer::TokenIssuer;
use crate::domain::entity::user::User;
use crate::domain::repository::{RefreshTokenRepository, RotationOutcome, UserRepository};
use crate::error::{AuthError, AuthResult};

/// Refresh output
pub struct RefreshOutput {
    pub user: User,
    pub access_token: String,
    /// Raw successor secret for the new cookie
    pub refresh_secret: String,
}

/// Refresh use case
pub struct RefreshUseCase<R>
where
    R: UserRepository + RefreshTokenRepository,
{
    repo: Arc<R>,
    issuer: TokenIssuer,
    config: Arc<AuthConfig>,
}

impl<R> RefreshUseCase<R>
where
    R: UserRepository + RefreshTokenRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self {
            repo,
            issuer: TokenIssuer::new(config.clone()),
            config,
        }
    }

    pub async fn execute(
        &self,
        presented_secret: &str,
        device: &DeviceMeta,
    ) -> AuthResult<RefreshOutput> {
        let presented_hash = token::hash_secret(presented_secret);
        let refresh_secret = token::generate_opaque_secret();
        let successor_hash = token::hash_secret(&refresh_secret);

        let outcome = self
            .repo
            .rotate_token(
                &presented_hash,
                &successor_hash,
                device,
                self.config.refresh_token_ttl,
            )
            .await?;

        let user_id = match outcome {
            RotationOutcome::Rotated { user_id, .. } => user_id,
            RotationOutcome::Replayed { user_id } => {
                tracing::warn!(
                    user_id = %user_id,
                    "Revoked refresh token presented again; possible token theft"
                );
                return Err(AuthError::SessionInvalid);
            }
            RotationOutcome::Invalid => return Err(AuthError::SessionInvalid),
        };

        let user = self
            .repo
            .find_user_by_id(user_id)
            .await?
            .ok_or(AuthError::SessionInvalid)?;

        // Claims are re-read here, so role and verification changes
        // propagate at most one access-token lifetime late
        let access_token = self.issuer.issue(&user)?;

        tracing::debug!(user_id = %user.id, "Session rotated");

        Ok(RefreshOutput {
            user,
            access_token,
            refresh_secret,
        })
    }
}
