//! Access Token Issuer
//!
//! Signs and verifies short-lived JWT access tokens (HS256). The token is
//! a point-in-time snapshot of the user; role or verification changes only
//! take effect at the next refresh.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::value_object::{role::Role, verification_status::VerificationStatus};
use crate::error::{AuthError, AuthResult};
use kernel::id::UserId;

/// Claims carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// User id
    pub sub: i64,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub verification_status: VerificationStatus,
    /// Issued-at (Unix seconds)
    pub iat: i64,
    /// Expiry (Unix seconds)
    pub exp: i64,
}

impl AccessClaims {
    pub fn user_id(&self) -> UserId {
        UserId::from_i64(self.sub)
    }
}

/// Signs and verifies access tokens with the configured secret
#[derive(Clone)]
pub struct TokenIssuer {
    config: Arc<AuthConfig>,
}

impl TokenIssuer {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self { config }
    }

    /// Issue a signed access token snapshotting the user's current state.
    pub fn issue(&self, user: &User) -> AuthResult<String> {
        let now = Utc::now();
        let claims = AccessClaims {
            sub: user.id.as_i64(),
            email: user.email.as_str().to_string(),
            name: user.display_name.clone(),
            role: user.role,
            verification_status: user.verification_status,
            iat: now.timestamp(),
            exp: (now + self.config.access_token_ttl).timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(&self.config.token_secret),
        )
        .map_err(|e| AuthError::Internal(format!("Failed to sign access token: {e}")))
    }

    /// Verify signature and expiry. Any failure maps to `Unauthenticated`;
    /// callers never learn whether the token was malformed, forged, or stale.
    pub fn verify(&self, token: &str) -> AuthResult<AccessClaims> {
        decode::<AccessClaims>(
            token,
            &DecodingKey::from_secret(&self.config.token_secret),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| AuthError::Unauthenticated)
    }
}
