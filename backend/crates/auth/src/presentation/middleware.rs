//! Auth Middleware
//!
//! The authentication gate verifies the access token and attaches the
//! caller's identity to the request. It never touches the database; claims
//! are trusted for the token's one-hour lifetime.

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::application::config::{ACCESS_COOKIE_NAME, AuthConfig};
use crate::application::token_issuer::{AccessClaims, TokenIssuer};
use crate::domain::value_object::{role::Role, verification_status::VerificationStatus};
use crate::error::AuthError;
use kernel::id::UserId;

/// Verified caller identity, attached to request extensions by the gate
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: UserId,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub verification_status: VerificationStatus,
}

impl From<AccessClaims> for Identity {
    fn from(claims: AccessClaims) -> Self {
        Self {
            user_id: claims.user_id(),
            email: claims.email,
            name: claims.name,
            role: claims.role,
            verification_status: claims.verification_status,
        }
    }
}

/// Gate state: only the signing config, no store handle
#[derive(Clone)]
pub struct AuthGateState {
    pub config: Arc<AuthConfig>,
}

/// Pull the access token off a request: cookie first, then Bearer header.
///
/// Cookie precedence means a stale Authorization header cannot shadow a
/// fresher browser session.
fn extract_access_token(req: &Request<Body>) -> Option<String> {
    if let Some(token) = platform::cookie::extract_cookie(req.headers(), ACCESS_COOKIE_NAME) {
        return Some(token);
    }

    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
}

/// Middleware that requires a valid access token
pub async fn require_auth(
    State(state): State<AuthGateState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let Some(token) = extract_access_token(&req) else {
        return Err(AuthError::Unauthenticated.into_response());
    };

    let issuer = TokenIssuer::new(state.config.clone());
    let claims = match issuer.verify(&token) {
        Ok(claims) => claims,
        Err(e) => return Err(e.into_response()),
    };

    req.extensions_mut().insert(Identity::from(claims));

    Ok(next.run(req).await)
}

/// Middleware that additionally requires a reviewer role (validator or
/// admin). Must run inside `require_auth`.
pub async fn require_reviewer(req: Request<Body>, next: Next) -> Result<Response, Response> {
    let Some(identity) = req.extensions().get::<Identity>() else {
        return Err(AuthError::Unauthenticated.into_response());
    };

    match identity.role {
        Role::Validator | Role::Admin => Ok(next.run(req).await),
        Role::Citizen => Err(AuthError::Forbidden.into_response()),
    }
}
