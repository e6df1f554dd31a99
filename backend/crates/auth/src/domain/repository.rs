//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use crate::domain::entity::{
    refresh_token::{NewRefreshToken, RefreshToken},
    user::User,
};
use crate::domain::value_object::email::Email;
use crate::error::AuthResult;
use chrono::Duration;
use kernel::id::{RefreshTokenId, UserId};
use platform::client::DeviceMeta;

/// Outcome of an atomic rotate-on-use attempt.
#[derive(Debug)]
pub enum RotationOutcome {
    /// The presented digest matched a live token; it is now revoked and
    /// the successor row has been inserted.
    Rotated {
        user_id: UserId,
        successor: RefreshToken,
    },
    /// The digest matched a row that was already revoked. Replay signal.
    Replayed { user_id: UserId },
    /// No live token matched (unknown digest or expired).
    Invalid,
}

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user, returning the stored row
    async fn create_user(&self, user: &User) -> AuthResult<User>;

    /// Find user by ID
    async fn find_user_by_id(&self, user_id: UserId) -> AuthResult<Option<User>>;

    /// Find user by email (lowercased login identifier)
    async fn find_user_by_email(&self, email: &Email) -> AuthResult<Option<User>>;
}

/// Refresh token repository trait
#[trait_variant::make(RefreshTokenRepository: Send)]
pub trait LocalRefreshTokenRepository {
    /// Insert a new token row
    async fn create_token(&self, token: &NewRefreshToken) -> AuthResult<RefreshToken>;

    /// Atomically revoke the live token matching `presented_hash` and insert
    /// a successor row with `successor_hash` for the same owner. Exactly one
    /// concurrent caller presenting the same digest can win; all others
    /// observe `Invalid` or `Replayed`.
    async fn rotate_token(
        &self,
        presented_hash: &str,
        successor_hash: &str,
        device: &DeviceMeta,
        ttl: Duration,
    ) -> AuthResult<RotationOutcome>;

    /// Look up the live token matching a digest. None when the digest is
    /// unknown, revoked, or expired.
    async fn find_valid(&self, token_hash: &str) -> AuthResult<Option<RefreshToken>>;

    /// Revoke the live token matching `token_hash`, if any. Idempotent.
    async fn revoke_token(&self, token_hash: &str) -> AuthResult<bool>;

    /// Revoke every live token belonging to a user. Returns the count.
    async fn revoke_all_for_user(&self, user_id: UserId) -> AuthResult<u64>;

    /// List unrevoked, unexpired tokens for a user, newest first
    async fn list_active_for_user(&self, user_id: UserId) -> AuthResult<Vec<RefreshToken>>;

    /// Revoke a single session by row id, scoped to its owner
    async fn revoke_by_id(&self, user_id: UserId, token_id: RefreshTokenId) -> AuthResult<bool>;

    /// Delete expired and revoked rows. Returns the count removed.
    async fn sweep_expired(&self) -> AuthResult<u64>;
}
