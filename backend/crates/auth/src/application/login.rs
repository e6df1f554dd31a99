//! Login Use Case
//!
//! Verifies credentials and opens a session: one refresh token row plus a
//! signed access token.

use std::sync::Arc;

use platform::client::DeviceMeta;
use platform::password::ClearTextPassword;
use platform::token;

use crate::application::config::AuthConfig;
use crate::application::token_issuer::TokenIssuer;
use crate::domain::entity::refresh_token::NewRefreshToken;
use crate::domain::entity::user::User;
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// Login input
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Login output
pub struct LoginOutput {
    pub user: User,
    /// Signed access token for the body and cookie
    pub access_token: String,
    /// Raw refresh secret; goes into the cookie and is never stored
    pub refresh_secret: String,
}

/// Login use case
pub struct LoginUseCase<R>
where
    R: UserRepository + RefreshTokenRepository,
{
    repo: Arc<R>,
    issuer: TokenIssuer,
    config: Arc<AuthConfig>,
}

impl<R> LoginUseCase<R>
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

    /// Every failure path returns `InvalidCredentials`; the response never
    /// reveals whether the email exists.
    pub async fn execute(&self, input: LoginInput, device: &DeviceMeta) -> AuthResult<LoginOutput> {
        let email = Email::new(&input.email).map_err(|_| AuthError::InvalidCredentials)?;

        let user = self
            .repo
            .find_user_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        // Stored passwords predate any policy change, so skip policy checks here
        let password = ClearTextPassword::new_unchecked(input.password);
        if !user.password_hash.verify(&password) {
            return Err(AuthError::InvalidCredentials);
        }

        let refresh_secret = token::generate_opaque_secret();
        let draft = NewRefreshToken::new(
            token::hash_secret(&refresh_secret),
            user.id,
            device,
            self.config.refresh_token_ttl,
        );
        let stored = self.repo.create_token(&draft).await?;

        let access_token = self.issuer.issue(&user)?;

        tracing::info!(
            user_id = %user.id,
            session_id = %stored.id,
            "User logged in"
        );

        Ok(LoginOutput {
            user,
            access_token,
            refresh_secret,
        })
    }
}
