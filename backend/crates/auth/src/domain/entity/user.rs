//! User Entity
//!
//! Portal account. The password is stored only as an Argon2 PHC string.

use kernel::id::UserId;
use platform::password::HashedPassword;

use crate::domain::value_object::{
    email::Email, role::Role, verification_status::VerificationStatus,
};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub display_name: String,
    pub password_hash: HashedPassword,
    pub role: Role,
    pub verification_status: VerificationStatus,
    /// Present only while status is Rejected or NeedsInfo
    pub rejection_reason: Option<String>,
    pub rejected_at_ms: Option<i64>,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

impl User {
    /// Whether this user may use community features (approved identity).
    pub fn has_community_access(&self) -> bool {
        self.verification_status.grants_community_access()
    }
}
