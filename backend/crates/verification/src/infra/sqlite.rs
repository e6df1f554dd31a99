//! SQLite Repository Implementation
//!
//! Every state transition runs in one transaction covering the application
//! row, the owner's verification status, and the audit log.

use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::domain::entities::{Application, ApplicationDraft, ValidatorActionRecord};
use crate::domain::repository::VerificationRepository;
use crate::domain::value_objects::{ApplicationStatus, ValidatorActionKind};
use crate::error::{VerificationError, VerificationResult};
use kernel::id::{ApplicationId, UserId, ValidatorActionId};

/// SQLite-backed verification repository
#[derive(Clone)]
pub struct SqliteVerificationRepository {
    pool: SqlitePool,
}

const APPLICATION_COLUMNS: &str = r#"
    id, user_id, full_name, document_number, address, phone,
    id_front_image, id_back_image, selfie_image, analysis, status,
    submitted_at_ms, updated_at_ms
"#;

impl SqliteVerificationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Mirror an application status onto the owner's user row.
    async fn sync_user_status(
        tx: &mut Transaction<'_, Sqlite>,
        user_id: i64,
        status: ApplicationStatus,
        reason: Option<&str>,
        now_ms: i64,
    ) -> VerificationResult<()> {
        let rejected_at_ms = match status {
            ApplicationStatus::Rejected => Some(now_ms),
            _ => None,
        };

        sqlx::query(
            r#"
            UPDATE users
            SET verification_status = ?1,
                rejection_reason = ?2,
                rejected_at_ms = ?3,
                updated_at_ms = ?4
            WHERE id = ?5
            "#,
        )
        .bind(status.code())
        .bind(reason)
        .bind(rejected_at_ms)
        .bind(now_ms)
        .bind(user_id)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}

impl VerificationRepository for SqliteVerificationRepository {
    async fn submit(&self, draft: &ApplicationDraft) -> VerificationResult<Application> {
        let now_ms = Utc::now().timestamp_millis();
        let analysis_text = draft
            .analysis
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| VerificationError::Internal(format!("Invalid analysis payload: {e}")))?;

        let mut tx = self.pool.begin().await?;

        let existing: Option<(i64, String)> =
            sqlx::query_as("SELECT id, status FROM applications WHERE user_id = ?1")
                .bind(draft.user_id.as_i64())
                .fetch_optional(&mut *tx)
                .await?;

        let row = match existing {
            None => {
                sqlx::query_as::<_, ApplicationRow>(&format!(
                    r#"
                    INSERT INTO applications (
                        user_id, full_name, document_number, address, phone,
                        id_front_image, id_back_image, selfie_image, analysis,
                        status, submitted_at_ms, updated_at_ms
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)
                    RETURNING {APPLICATION_COLUMNS}
                    "#
                ))
                .bind(draft.user_id.as_i64())
                .bind(&draft.full_name)
                .bind(&draft.document_number)
                .bind(&draft.address)
                .bind(&draft.phone)
                .bind(&draft.id_front_image)
                .bind(&draft.id_back_image)
                .bind(&draft.selfie_image)
                .bind(&analysis_text)
                .bind(ApplicationStatus::Pending.code())
                .bind(now_ms)
                .fetch_one(&mut *tx)
                .await?
            }
            Some((id, status_code)) => {
                let status = ApplicationStatus::from_code(&status_code).ok_or_else(|| {
                    VerificationError::Internal(format!("Invalid status code: {status_code}"))
                })?;

                match status {
                    ApplicationStatus::Pending => return Err(VerificationError::AlreadyPending),
                    ApplicationStatus::Approved => return Err(VerificationError::AlreadyApproved),
                    _ => {}
                }

                // Resubmission reuses the row; the audit log keeps the
                // earlier decisions attached to the same application id
                sqlx::query_as::<_, ApplicationRow>(&format!(
                    r#"
                    UPDATE applications
                    SET full_name = ?1, document_number = ?2, address = ?3,
                        phone = ?4, id_front_image = ?5, id_back_image = ?6,
                        selfie_image = ?7, analysis = ?8, status = ?9,
                        submitted_at_ms = ?10, updated_at_ms = ?10
                    WHERE id = ?11
                    RETURNING {APPLICATION_COLUMNS}
                    "#
                ))
                .bind(&draft.full_name)
                .bind(&draft.document_number)
                .bind(&draft.address)
                .bind(&draft.phone)
                .bind(&draft.id_front_image)
                .bind(&draft.id_back_image)
                .bind(&draft.selfie_image)
                .bind(&analysis_text)
                .bind(ApplicationStatus::Pending.code())
                .bind(now_ms)
                .bind(id)
                .fetch_one(&mut *tx)
                .await?
            }
        };

        Self::sync_user_status(
            &mut tx,
            draft.user_id.as_i64(),
            ApplicationStatus::Pending,
            None,
            now_ms,
        )
        .await?;

        tx.commit().await?;

        row.into_application()
    }

    async fn find_by_id(&self, id: ApplicationId) -> VerificationResult<Option<Application>> {
        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications WHERE id = ?1"
        ))
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_application()).transpose()
    }

    async fn find_by_user(&self, user_id: UserId) -> VerificationResult<Option<Application>> {
        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications WHERE user_id = ?1"
        ))
        .bind(user_id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_application()).transpose()
    }

    async fn list(
        &self,
        status: Option<ApplicationStatus>,
    ) -> VerificationResult<Vec<Application>> {
        let rows = match status {
            Some(status) => {
                sqlx::query_as::<_, ApplicationRow>(&format!(
                    r#"
                    SELECT {APPLICATION_COLUMNS} FROM applications
                    WHERE status = ?1 ORDER BY submitted_at_ms ASC
                    "#
                ))
                .bind(status.code())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, ApplicationRow>(&format!(
                    "SELECT {APPLICATION_COLUMNS} FROM applications ORDER BY submitted_at_ms ASC"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.into_iter().map(|r| r.into_application()).collect()
    }

    async fn apply_action(
        &self,
        application_id: ApplicationId,
        validator_id: UserId,
        action: ValidatorActionKind,
        notes: Option<String>,
    ) -> VerificationResult<Application> {
        let now_ms = Utc::now().timestamp_millis();
        let next_status = action.resulting_status();

        let mut tx = self.pool.begin().await?;

        // Guarded transition: a decision only lands on a pending row, a
        // reopen only on a resolved one. Concurrent validators race on
        // this UPDATE and exactly one wins.
        let guard = match action {
            ValidatorActionKind::Reopen => "status != 'pending'",
            _ => "status = 'pending'",
        };

        let row: Option<ApplicationRow> = sqlx::query_as(&format!(
            r#"
            UPDATE applications
            SET status = ?1, updated_at_ms = ?2
            WHERE id = ?3 AND {guard}
            RETURNING {APPLICATION_COLUMNS}
            "#
        ))
        .bind(next_status.code())
        .bind(now_ms)
        .bind(application_id.as_i64())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            // Lost the race or wrong state; figure out which for the caller
            let exists: Option<(String,)> =
                sqlx::query_as("SELECT status FROM applications WHERE id = ?1")
                    .bind(application_id.as_i64())
                    .fetch_optional(&mut *tx)
                    .await?;

            tx.rollback().await?;

            return Err(match exists {
                None => VerificationError::ApplicationNotFound,
                Some(_) if matches!(action, ValidatorActionKind::Reopen) => {
                    VerificationError::StillPending
                }
                Some(_) => VerificationError::NotPending,
            });
        };

        // Only a rejection stamps the reason; everything else clears it
        let reason = if action.stamps_rejection() {
            notes.as_deref()
        } else {
            None
        };
        Self::sync_user_status(&mut tx, row.user_id, next_status, reason, now_ms).await?;

        sqlx::query(
            r#"
            INSERT INTO validator_actions (
                application_id, validator_id, action, notes, created_at_ms
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(application_id.as_i64())
        .bind(validator_id.as_i64())
        .bind(action.code())
        .bind(&notes)
        .bind(now_ms)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            application_id = %application_id,
            validator_id = %validator_id,
            action = %action,
            "Validator decision applied"
        );

        row.into_application()
    }

    async fn history(
        &self,
        application_id: Option<ApplicationId>,
    ) -> VerificationResult<Vec<ValidatorActionRecord>> {
        let rows = match application_id {
            Some(id) => {
                sqlx::query_as::<_, ActionRow>(
                    r#"
                    SELECT id, application_id, validator_id, action, notes, created_at_ms
                    FROM validator_actions
                    WHERE application_id = ?1
                    ORDER BY created_at_ms DESC, id DESC
                    "#,
                )
                .bind(id.as_i64())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, ActionRow>(
                    r#"
                    SELECT id, application_id, validator_id, action, notes, created_at_ms
                    FROM validator_actions
                    ORDER BY created_at_ms DESC, id DESC
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.into_iter().map(|r| r.into_record()).collect()
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct ApplicationRow {
    id: i64,
    user_id: i64,
    full_name: String,
    document_number: String,
    address: String,
    phone: Option<String>,
    id_front_image: String,
    id_back_image: Option<String>,
    selfie_image: String,
    analysis: Option<String>,
    status: String,
    submitted_at_ms: i64,
    updated_at_ms: i64,
}

impl ApplicationRow {
    fn into_application(self) -> VerificationResult<Application> {
        let status = ApplicationStatus::from_code(&self.status).ok_or_else(|| {
            VerificationError::Internal(format!("Invalid status code: {}", self.status))
        })?;

        let analysis = self
            .analysis
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(|e| VerificationError::Internal(format!("Invalid analysis JSON: {e}")))?;

        Ok(Application {
            id: ApplicationId::from_i64(self.id),
            user_id: UserId::from_i64(self.user_id),
            full_name: self.full_name,
            document_number: self.document_number,
            address: self.address,
            phone: self.phone,
            id_front_image: self.id_front_image,
            id_back_image: self.id_back_image,
            selfie_image: self.selfie_image,
            analysis,
            status,
            submitted_at_ms: self.submitted_at_ms,
            updated_at_ms: self.updated_at_ms,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ActionRow {
    id: i64,
    application_id: i64,
    validator_id: i64,
    action: String,
    notes: Option<String>,
    created_at_ms: i64,
}

impl ActionRow {
    fn into_record(self) -> VerificationResult<ValidatorActionRecord> {
        let action = ValidatorActionKind::from_code(&self.action).ok_or_else(|| {
            VerificationError::Internal(format!("Invalid action code: {}", self.action))
        })?;

        Ok(ValidatorActionRecord {
            id: ValidatorActionId::from_i64(self.id),
            application_id: ApplicationId::from_i64(self.application_id),
            validator_id: UserId::from_i64(self.validator_id),
            action,
            notes: self.notes,
            created_at_ms: self.created_at_ms,
        })
    }
}
