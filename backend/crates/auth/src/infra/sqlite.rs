//! SQLite Repository Implementations

use chrono::Utc;
use sqlx::SqlitePool;

use crate::domain::entity::{
    refresh_token::{NewRefreshToken, RefreshToken},
    user::User,
};
use crate::domain::repository::{
    RefreshTokenRepository, RotationOutcome, UserRepository,
};
use crate::domain::value_object::{
    email::Email, role::Role, verification_status::VerificationStatus,
};
use crate::error::{AuthError, AuthResult};
use chrono::Duration;
use kernel::id::{RefreshTokenId, UserId};
use platform::client::DeviceMeta;
use platform::password::HashedPassword;

/// SQLite-backed auth repository
#[derive(Clone)]
pub struct SqliteAuthRepository {
    pool: SqlitePool,
}

impl SqliteAuthRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Seed the default admin account when the users table is empty.
    ///
    /// Returns true if the account was created.
    pub async fn ensure_default_admin(
        &self,
        email: &Email,
        password_hash: &HashedPassword,
        display_name: &str,
    ) -> AuthResult<bool> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        if count > 0 {
            return Ok(false);
        }

        let now_ms = Utc::now().timestamp_millis();
        sqlx::query(
            r#"
            INSERT INTO users (
                email, display_name, password_hash, role,
                verification_status, created_at_ms, updated_at_ms
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
            "#,
        )
        .bind(email.as_str())
        .bind(display_name)
        .bind(password_hash.as_phc_string())
        .bind(Role::Admin.code())
        .bind(VerificationStatus::Approved.code())
        .bind(now_ms)
        .execute(&self.pool)
        .await?;

        tracing::warn!(
            email = %email,
            "Seeded default admin account; change its password immediately"
        );

        Ok(true)
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

const USER_COLUMNS: &str = r#"
    id, email, display_name, password_hash, role, verification_status,
    rejection_reason, rejected_at_ms, created_at_ms, updated_at_ms
"#;

impl UserRepository for SqliteAuthRepository {
    async fn create_user(&self, user: &User) -> AuthResult<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (
                email, display_name, password_hash, role,
                verification_status, rejection_reason, rejected_at_ms,
                created_at_ms, updated_at_ms
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.email.as_str())
        .bind(&user.display_name)
        .bind(user.password_hash.as_phc_string())
        .bind(user.role.code())
        .bind(user.verification_status.code())
        .bind(&user.rejection_reason)
        .bind(user.rejected_at_ms)
        .bind(user.created_at_ms)
        .bind(user.updated_at_ms)
        .fetch_one(&self.pool)
        .await?;

        row.into_user()
    }

    async fn find_user_by_id(&self, user_id: UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?1"
        ))
        .bind(user_id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_user_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?1"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }
}

// ============================================================================
// Refresh Token Repository Implementation
// ============================================================================

const TOKEN_COLUMNS: &str = r#"
    id, token_hash, user_id, user_agent, ip,
    expires_at_ms, created_at_ms, revoked_at_ms
"#;

impl RefreshTokenRepository for SqliteAuthRepository {
    async fn create_token(&self, token: &NewRefreshToken) -> AuthResult<RefreshToken> {
        let row = sqlx::query_as::<_, RefreshTokenRow>(&format!(
            r#"
            INSERT INTO refresh_tokens (
                token_hash, user_id, user_agent, ip,
                expires_at_ms, created_at_ms
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING {TOKEN_COLUMNS}
            "#
        ))
        .bind(&token.token_hash)
        .bind(token.user_id.as_i64())
        .bind(&token.user_agent)
        .bind(&token.ip)
        .bind(token.expires_at_ms)
        .bind(token.created_at_ms)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_token())
    }

    async fn rotate_token(
        &self,
        presented_hash: &str,
        successor_hash: &str,
        device: &DeviceMeta,
        ttl: Duration,
    ) -> AuthResult<RotationOutcome> {
        let now = Utc::now();
        let now_ms = now.timestamp_millis();

        let mut tx = self.pool.begin().await?;

        // Guarded revoke: only a live row matches, so exactly one of any
        // concurrent callers presenting the same digest gets a row back.
        let revoked: Option<(i64,)> = sqlx::query_as(
            r#"
            UPDATE refresh_tokens
            SET revoked_at_ms = ?1
            WHERE token_hash = ?2
              AND revoked_at_ms IS NULL
              AND expires_at_ms > ?1
            RETURNING user_id
            "#,
        )
        .bind(now_ms)
        .bind(presented_hash)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((user_id,)) = revoked else {
            // Distinguish replay (digest exists but revoked) from a plain
            // miss, for the security log only. Nothing was mutated.
            let replayed: Option<(i64,)> = sqlx::query_as(
                "SELECT user_id FROM refresh_tokens WHERE token_hash = ?1 AND revoked_at_ms IS NOT NULL",
            )
            .bind(presented_hash)
            .fetch_optional(&mut *tx)
            .await?;

            tx.rollback().await?;

            return Ok(match replayed {
                Some((user_id,)) => RotationOutcome::Replayed {
                    user_id: UserId::from_i64(user_id),
                },
                None => RotationOutcome::Invalid,
            });
        };

        let successor = sqlx::query_as::<_, RefreshTokenRow>(&format!(
            r#"
            INSERT INTO refresh_tokens (
                token_hash, user_id, user_agent, ip,
                expires_at_ms, created_at_ms
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING {TOKEN_COLUMNS}
            "#
        ))
        .bind(successor_hash)
        .bind(user_id)
        .bind(&device.user_agent)
        .bind(device.ip_string())
        .bind((now + ttl).timestamp_millis())
        .bind(now_ms)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(RotationOutcome::Rotated {
            user_id: UserId::from_i64(user_id),
            successor: successor.into_token(),
        })
    }

    async fn find_valid(&self, token_hash: &str) -> AuthResult<Option<RefreshToken>> {
        let now_ms = Utc::now().timestamp_millis();

        let row = sqlx::query_as::<_, RefreshTokenRow>(&format!(
            r#"
            SELECT {TOKEN_COLUMNS} FROM refresh_tokens
            WHERE token_hash = ?1 AND revoked_at_ms IS NULL AND expires_at_ms > ?2
            "#
        ))
        .bind(token_hash)
        .bind(now_ms)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_token()))
    }

    async fn revoke_token(&self, token_hash: &str) -> AuthResult<bool> {
        let now_ms = Utc::now().timestamp_millis();

        let affected = sqlx::query(
            "UPDATE refresh_tokens SET revoked_at_ms = ?1 WHERE token_hash = ?2 AND revoked_at_ms IS NULL",
        )
        .bind(now_ms)
        .bind(token_hash)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(affected > 0)
    }

    async fn revoke_all_for_user(&self, user_id: UserId) -> AuthResult<u64> {
        let now_ms = Utc::now().timestamp_millis();

        let affected = sqlx::query(
            "UPDATE refresh_tokens SET revoked_at_ms = ?1 WHERE user_id = ?2 AND revoked_at_ms IS NULL",
        )
        .bind(now_ms)
        .bind(user_id.as_i64())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(affected)
    }

    async fn list_active_for_user(&self, user_id: UserId) -> AuthResult<Vec<RefreshToken>> {
        let now_ms = Utc::now().timestamp_millis();

        let rows = sqlx::query_as::<_, RefreshTokenRow>(&format!(
            r#"
            SELECT {TOKEN_COLUMNS} FROM refresh_tokens
            WHERE user_id = ?1 AND revoked_at_ms IS NULL AND expires_at_ms > ?2
            ORDER BY created_at_ms DESC
            "#
        ))
        .bind(user_id.as_i64())
        .bind(now_ms)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_token()).collect())
    }

    async fn revoke_by_id(&self, user_id: UserId, token_id: RefreshTokenId) -> AuthResult<bool> {
        let now_ms = Utc::now().timestamp_millis();

        let affected = sqlx::query(
            r#"
            UPDATE refresh_tokens SET revoked_at_ms = ?1
            WHERE id = ?2 AND user_id = ?3 AND revoked_at_ms IS NULL
            "#,
        )
        .bind(now_ms)
        .bind(token_id.as_i64())
        .bind(user_id.as_i64())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(affected > 0)
    }

    async fn sweep_expired(&self) -> AuthResult<u64> {
        let now_ms = Utc::now().timestamp_millis();

        let deleted = sqlx::query(
            "DELETE FROM refresh_tokens WHERE revoked_at_ms IS NOT NULL OR expires_at_ms < ?1",
        )
        .bind(now_ms)
        .execute(&self.pool)
        .await?
        .rows_affected();

        tracing::info!(tokens_deleted = deleted, "Swept expired refresh tokens");

        Ok(deleted)
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    display_name: String,
    password_hash: String,
    role: String,
    verification_status: String,
    rejection_reason: Option<String>,
    rejected_at_ms: Option<i64>,
    created_at_ms: i64,
    updated_at_ms: i64,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let role = Role::from_code(&self.role)
            .ok_or_else(|| AuthError::Internal(format!("Invalid role code: {}", self.role)))?;

        let verification_status =
            VerificationStatus::from_code(&self.verification_status).ok_or_else(|| {
                AuthError::Internal(format!(
                    "Invalid verification status code: {}",
                    self.verification_status
                ))
            })?;

        let password_hash = HashedPassword::from_phc_string(self.password_hash)
            .map_err(|e| AuthError::Internal(format!("Invalid password hash: {e}")))?;

        Ok(User {
            id: UserId::from_i64(self.id),
            email: Email::from_db(self.email),
            display_name: self.display_name,
            password_hash,
            role,
            verification_status,
            rejection_reason: self.rejection_reason,
            rejected_at_ms: self.rejected_at_ms,
            created_at_ms: self.created_at_ms,
            updated_at_ms: self.updated_at_ms,
        })
    }
}

#[derive(sqlx::FromRow)]
struct RefreshTokenRow {
    id: i64,
    token_hash: String,
    user_id: i64,
    user_agent: Option<String>,
    ip: Option<String>,
    expires_at_ms: i64,
    created_at_ms: i64,
    revoked_at_ms: Option<i64>,
}

impl RefreshTokenRow {
    fn into_token(self) -> RefreshToken {
        RefreshToken {
            id: RefreshTokenId::from_i64(self.id),
            token_hash: self.token_hash,
            user_id: UserId::from_i64(self.user_id),
            user_agent: self.user_agent,
            ip: self.ip,
            expires_at_ms: self.expires_at_ms,
            created_at_ms: self.created_at_ms,
            revoked_at_ms: self.revoked_at_ms,
        }
    }
}
