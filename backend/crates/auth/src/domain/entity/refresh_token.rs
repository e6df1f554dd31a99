//! Refresh Token Entity
//!
//! One row per browser session. Only the SHA-256 digest of the opaque
//! secret is stored; the raw secret lives exclusively in the client cookie.

use chrono::{Duration, Utc};
use platform::client::DeviceMeta;

use kernel::id::{RefreshTokenId, UserId};

/// Refresh token entity
#[derive(Debug, Clone)]
pub struct RefreshToken {
    pub id: RefreshTokenId,
    /// Hex SHA-256 digest of the opaque secret
    pub token_hash: String,
    /// Reference to User
    pub user_id: UserId,
    /// User agent string (for session management display)
    pub user_agent: Option<String>,
    /// Client IP (optional, for session management display)
    pub ip: Option<String>,
    /// Expiration (Unix timestamp ms)
    pub expires_at_ms: i64,
    /// Created timestamp (Unix timestamp ms)
    pub created_at_ms: i64,
    /// Set when the token is rotated or revoked; valid tokens have None
    pub revoked_at_ms: Option<i64>,
}

/// Fields for a token row about to be inserted. The id is assigned by
/// the store.
#[derive(Debug, Clone)]
pub struct NewRefreshToken {
    pub token_hash: String,
    pub user_id: UserId,
    pub user_agent: Option<String>,
    pub ip: Option<String>,
    pub expires_at_ms: i64,
    pub created_at_ms: i64,
}

impl NewRefreshToken {
    /// Build a fresh token row from a digest and client metadata.
    ///
    /// TTL is provided by the application layer (config), not hard-coded here.
    pub fn new(token_hash: String, user_id: UserId, device: &DeviceMeta, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            token_hash,
            user_id,
            user_agent: device.user_agent.clone(),
            ip: device.ip_string(),
            expires_at_ms: (now + ttl).timestamp_millis(),
            created_at_ms: now.timestamp_millis(),
        }
    }
}

impl RefreshToken {
    /// A token is usable only while unrevoked and unexpired.
    pub fn is_valid(&self, now_ms: i64) -> bool {
        self.revoked_at_ms.is_none() && self.expires_at_ms > now_ms
    }
}

/// Session info for API responses (non-sensitive)
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub id: RefreshTokenId,
    pub user_agent: Option<String>,
    pub ip: Option<String>,
    pub created_at_ms: i64,
    pub expires_at_ms: i64,
    pub is_current: bool,
}

impl From<&RefreshToken> for SessionInfo {
    fn from(token: &RefreshToken) -> Self {
        Self {
            id: token.id,
            user_agent: token.user_agent.clone(),
            ip: token.ip.clone(),
            created_at_ms: token.created_at_ms,
            expires_at_ms: token.expires_at_ms,
            is_current: false, // Set by caller
        }
    }
}
