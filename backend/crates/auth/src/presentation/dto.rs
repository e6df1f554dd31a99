//! Data Transfer Objects
//!
//! Request/response types for the auth API. JSON fields are camelCase.

use serde::{Deserialize, Serialize};

use crate::domain::entity::refresh_token::SessionInfo;
use crate::domain::entity::user::User;
use crate::domain::value_object::{role::Role, verification_status::VerificationStatus};

/// POST /auth/login request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// User payload shared by login, refresh, and me responses
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub verification_status: VerificationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.as_i64(),
            email: user.email.as_str().to_string(),
            name: user.display_name.clone(),
            role: user.role,
            verification_status: user.verification_status,
            rejection_reason: user.rejection_reason.clone(),
        }
    }
}

/// Login and refresh response; the token mirrors the access cookie for
/// non-browser clients
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
}

/// One live session row in GET /auth/sessions
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: i64,
    pub user_agent: Option<String>,
    pub ip: Option<String>,
    pub created_at_ms: i64,
    pub expires_at_ms: i64,
    pub current: bool,
}

impl From<SessionInfo> for SessionResponse {
    fn from(info: SessionInfo) -> Self {
        Self {
            id: info.id.as_i64(),
            user_agent: info.user_agent,
            ip: info.ip,
            created_at_ms: info.created_at_ms,
            expires_at_ms: info.expires_at_ms,
            current: info.is_current,
        }
    }
}

/// POST /auth/logout-all response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutAllResponse {
    pub revoked: u64,
}

/// GET /auth/csrf-token response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsrfTokenResponse {
    pub csrf_token: String,
}
